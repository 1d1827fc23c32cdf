//! Sistema de manejo de errores
//!
//! Este módulo define los errores del sistema y su conversión al sobre
//! de respuesta `{error, message, response, status}`.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Errores por campo lógico, tal como los consume el cliente
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Datos de entrada inválidos (422)
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    /// Regla de negocio rechazada: credenciales, acceso, códigos, permisos (422)
    #[error("{message}")]
    Rejected { message: String, errors: FieldErrors },

    /// Token ausente, inválido, caducado o sin sesión (401)
    #[error("{message}")]
    Unauthorized { message: String, errors: FieldErrors },

    /// Límite de sesiones activas alcanzado (423)
    #[error("{message}")]
    SessionLimit { message: String, errors: FieldErrors },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn rejected(message: impl Into<String>, field: &str, detail: impl Into<String>) -> Self {
        AppError::Rejected {
            message: message.into(),
            errors: single(field, detail),
        }
    }

    pub fn unauthorized(message: impl Into<String>, field: &str, detail: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
            errors: single(field, detail),
        }
    }

    pub fn session_limit(message: impl Into<String>) -> Self {
        let message = message.into();
        AppError::SessionLimit {
            errors: single("sessions", message.clone()),
            message,
        }
    }

    /// Código HTTP que corresponde al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::Rejected { .. } | AppError::Database(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::SessionLimit { .. } => StatusCode::LOCKED,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Jwt(_) | AppError::Hash(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Mensaje y mapa de errores que viajan en el sobre
    pub fn message_and_errors(&self) -> (String, FieldErrors) {
        match self {
            AppError::Validation { message, errors }
            | AppError::Rejected { message, errors }
            | AppError::Unauthorized { message, errors }
            | AppError::SessionLimit { message, errors } => (message.clone(), errors.clone()),
            AppError::Database(e) => (
                "No se pudo realizar la solicitud.".to_string(),
                single("solicitud", e.to_string()),
            ),
            AppError::ExternalApi(msg) => (
                "No se logró comunicar con el servicio externo.".to_string(),
                single("servicio", msg.clone()),
            ),
            AppError::Jwt(msg) | AppError::Hash(msg) | AppError::Internal(msg) => (
                "Existen problemas con el servicio.".to_string(),
                single("solicitud", msg.clone()),
            ),
        }
    }

    /// Sobre JSON del error
    pub fn envelope(&self) -> Value {
        let status = self.status_code();
        let (message, errors) = self.message_and_errors();
        json!({
            "error": true,
            "message": message,
            "response": { "errors": errors },
            "status": status.as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, field_errors) in e.field_errors() {
            let messages = field_errors
                .iter()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("El campo {} no es válido.", field),
                })
                .collect();
            errors.insert(nombre_json(field), messages);
        }
        AppError::Validation {
            message: "Error de validación.".to_string(),
            errors,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("Error de serialización: {}", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() || matches!(self, AppError::Database(_)) {
            tracing::error!("❌ {}", self);
        } else {
            tracing::warn!("⚠️ {} ({})", self, status.as_u16());
        }
        (status, Json(self.envelope())).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

fn single(field: &str, detail: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![detail.into()]);
    errors
}

/// Nombre del campo tal como viaja en el JSON (`new_password` -> `newPassword`)
fn nombre_json(field: &str) -> String {
    let mut nombre = String::with_capacity(field.len());
    let mut mayuscula = false;
    for c in field.chars() {
        if c == '_' {
            mayuscula = !nombre.is_empty();
        } else if mayuscula {
            nombre.extend(c.to_uppercase());
            mayuscula = false;
        } else {
            nombre.push(c);
        }
    }
    nombre
}

/// Función helper para crear errores de validación de un solo campo
pub fn validation_error(field: &str, message: impl Into<String>) -> AppError {
    AppError::Validation {
        message: "Error de validación.".to_string(),
        errors: single(field, message),
    }
}
