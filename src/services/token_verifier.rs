//! Verificación remota de tokens
//!
//! El catálogo de usuarios delega la validación del token y la lista de
//! permisos al servicio de seguridad (`/api/validate` y `/api/permits`).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::dto::auth_dto::UsuarioToken;
use crate::utils::errors::{AppError, AppResult};

/// Portador del token y sus permisos
#[derive(Debug, Clone)]
pub struct Autorizacion {
    pub usuario: UsuarioToken,
    pub permisos: Vec<String>,
}

impl Autorizacion {
    pub fn tiene_permiso(&self, permiso: &str) -> bool {
        self.permisos.iter().any(|p| p == permiso)
    }
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verificar(&self, token: &str) -> AppResult<Autorizacion>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    error: bool,
    #[serde(default)]
    message: String,
    response: Option<T>,
}

pub struct HttpTokenVerifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTokenVerifier {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("🔐 Verificando token contra {}", url);

        let envelope: Envelope<T> = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| no_verificado(e.to_string()))?
            .json()
            .await
            .map_err(|e| no_verificado(e.to_string()))?;

        match envelope {
            Envelope { error: false, response: Some(response), .. } => Ok(response),
            Envelope { message, .. } => Err(no_verificado(message)),
        }
    }
}

fn no_verificado(detalle: impl Into<String>) -> AppError {
    AppError::unauthorized("No se logró Verificar el Token.", "token", detalle)
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verificar(&self, token: &str) -> AppResult<Autorizacion> {
        let usuario: UsuarioToken = self.post("/api/validate", json!({ "token": token })).await?;
        let permisos: Vec<String> = self
            .post("/api/permits", json!({ "funcionarioId": usuario.funcionario_id }))
            .await?;

        Ok(Autorizacion { usuario, permisos })
    }
}
