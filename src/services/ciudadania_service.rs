//! Cliente de Ciudadanía Digital
//!
//! Resuelve el número de documento de un ciudadano a partir del
//! identificador de bitácora devuelto por el proveedor de identidad.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn numero_documento(&self, binnacle_id: &str) -> AppResult<String>;
}

pub struct CiudadaniaClient {
    client: reqwest::Client,
    url: Option<String>,
}

impl CiudadaniaClient {
    pub fn new(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl IdentityVerifier for CiudadaniaClient {
    async fn numero_documento(&self, binnacle_id: &str) -> AppResult<String> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| AppError::ExternalApi("CIUDADANIA_URL no configurada".to_string()))?;

        let body: Value = self
            .client
            .post(url)
            .json(&json!({ "binnacleId": binnacle_id }))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error consultando Ciudadanía Digital: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta inválida de Ciudadanía Digital: {}", e)))?;

        numero_documento_de(&body)
    }
}

/// Extrae `response.ciudadanoDigital.documento_identidad.numero_documento`
pub fn numero_documento_de(body: &Value) -> AppResult<String> {
    if body.get("error").and_then(Value::as_bool).unwrap_or(false) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Ciudadanía Digital rechazó la solicitud.");
        return Err(AppError::rejected(
            "Los datos del funcionario son incorrectos.",
            "ciudadania",
            message,
        ));
    }

    match body.pointer("/response/ciudadanoDigital/documento_identidad/numero_documento") {
        Some(Value::String(numero)) if !numero.is_empty() => Ok(numero.clone()),
        Some(Value::Number(numero)) => Ok(numero.to_string()),
        _ => Err(AppError::rejected(
            "Los datos del funcionario son incorrectos.",
            "ciudadania",
            "Ciudadanía Digital no devolvió un documento de identidad.",
        )),
    }
}
