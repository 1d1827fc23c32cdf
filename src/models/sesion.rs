//! Modelo de Sesión
//!
//! Sesiones emitidas por aplicación y su registro de auditoría.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const SESION_ACTIVA: i16 = 1;
pub const SESION_CERRADA: i16 = 0;

/// Sesión - mapea a la tabla sesiones
#[derive(Debug, Clone, FromRow)]
pub struct Sesion {
    pub id: i64,
    pub funcionario_id: i32,
    pub aplicacion_id: i32,
    pub token: String,
    pub estado: i16,
    /// Sesión central de la que depende una sesión de aplicación acompañante
    pub sesion_padre_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NuevaSesion {
    pub funcionario_id: i32,
    pub aplicacion_id: i32,
    pub token: String,
}

/// Origen de la petición de login
#[derive(Debug, Clone, Default)]
pub struct Origen {
    pub ip: String,
    pub user_agent: String,
}

/// Entrada de auditoría escrita en cada emisión de token nueva
#[derive(Debug, Clone)]
pub struct LogSesion {
    pub funcionario_id: i32,
    pub ci: String,
    pub aplicacion: String,
    pub codigo: i32,
    pub origen: Origen,
}
