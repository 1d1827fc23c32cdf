//! Cifrado de contraseñas con bcrypt
//!
//! bcrypt es costoso en CPU; se ejecuta fuera del runtime async.

use crate::utils::errors::{AppError, AppResult};

/// Costo usado para toda contraseña nueva
pub const BCRYPT_COST: u32 = 12;

pub async fn cifrar_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de cifrado cancelada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

pub async fn verificar_password(password: &str, hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de verificación cancelada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}
