//! Modelo de Rol
//!
//! Roles asignados a funcionarios, con alcance por aplicación.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rol {
    pub id: i32,
    pub nombre: String,
    pub aplicacion_id: i32,
    /// Si es falso, el rol exime de la doble autenticación
    pub doble_autenticacion: bool,
}
