//! Modelo de Código de verificación
//!
//! Códigos numéricos enviados por SMS para la doble autenticación y para
//! la recuperación de contraseña.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Tipo de código, cada uno en su propia tabla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipoCodigo {
    Confirmacion,
    Recuperacion,
}

impl TipoCodigo {
    pub fn tabla(&self) -> &'static str {
        match self {
            TipoCodigo::Confirmacion => "doble_autenticacion",
            TipoCodigo::Recuperacion => "recuperacion_password",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CodigoVerificacion {
    pub id: i64,
    pub funcionario_id: i32,
    pub aplicacion_id: i32,
    pub codigo: i32,
    pub fecha: DateTime<Utc>,
    pub usado: bool,
}

#[derive(Debug, Clone)]
pub struct NuevoCodigo {
    pub funcionario_id: i32,
    pub aplicacion_id: i32,
    pub codigo: i32,
    pub fecha: DateTime<Utc>,
}
