//! Sobre de respuesta
//!
//! Toda respuesta exitosa viaja como `{error: false, message, response, status}`
//! y el mismo `status` se usa como código HTTP. Los errores usan el mismo
//! sobre a través de `AppError`.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub error: bool,
    pub message: String,
    pub response: T,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    pub fn with_status(status: StatusCode, message: impl Into<String>, response: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            response,
            status: status.as_u16(),
        }
    }

    /// Respuesta 201, la que devuelven las operaciones de seguridad
    pub fn created(message: impl Into<String>, response: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, response)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
