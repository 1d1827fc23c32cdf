//! Middleware de autorización
//!
//! Extrae el token Bearer, lo verifica contra el servicio de seguridad y
//! expone el portador con sus permisos a los handlers.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::services::token_verifier::Autorizacion;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::extract_bearer;

/// Permisos del catálogo de usuarios
pub mod permisos {
    pub const VIEW_CATALOGO: &str = "VIEW_CATALOGO";
    pub const VIEW_LIST_CATALOGOS: &str = "VIEW_LIST_CATALOGOS";
    pub const INSERT_CATALOGO: &str = "INSERT_CATALOGO";
    pub const EDIT_CATALOGO: &str = "EDIT_CATALOGO";
    pub const DELETE_CATALOGO: &str = "DELETE_CATALOGO";
}

/// Portador autenticado de la petición
#[derive(Debug, Clone)]
pub struct Autorizado(pub Autorizacion);

impl Autorizado {
    /// Exige un permiso y devuelve el funcionario que opera
    pub fn requerir(&self, permiso: &str) -> AppResult<i32> {
        if !self.0.tiene_permiso(permiso) {
            return Err(AppError::rejected("No tiene permisos.", "permiso", permiso));
        }
        Ok(self.0.usuario.funcionario_id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Autorizado {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer)
            .ok_or_else(|| {
                AppError::unauthorized("No autorizado.", "token", "Token de autorización requerido.")
            })?;

        let autorizacion = state.token_verifier.verificar(token).await?;
        Ok(Autorizado(autorizacion))
    }
}
