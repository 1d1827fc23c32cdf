//! Modelo de Aplicación
//!
//! Aplicaciones cliente registradas y el acceso de cada funcionario a ellas.

use serde::Serialize;
use sqlx::FromRow;

/// Aplicación - mapea a la tabla aplicaciones
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Aplicacion {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
    pub url: Option<String>,
    /// Máximo de sesiones activas por funcionario
    pub cantidad_sesiones: i32,
    /// Vida del token en segundos
    pub tiempo_token: i64,
    pub doble_autenticacion: bool,
    pub ciudadania: bool,
    pub estado: i16,
}

/// Acceso de un funcionario a una aplicación
#[derive(Debug, Clone, FromRow)]
pub struct FuncionarioAplicacion {
    pub id: i32,
    pub funcionario_id: i32,
    pub aplicacion_id: i32,
    pub estado: i16,
}

impl FuncionarioAplicacion {
    pub fn habilitado(&self) -> bool {
        self.estado == 1
    }
}

/// Banderas globales consultadas durante el login
pub mod banderas {
    pub const DOBLE_AUTENTICACION: &str = "dobleAutenticacion";
    pub const CIUDADANIA: &str = "ciudadania";
}
