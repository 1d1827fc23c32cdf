//! DTOs del catálogo de usuarios

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usuario::{DatosUsuario, Usuario};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UsuarioRequest {
    #[validate(length(min = 3, message = "El usuario debe tener al menos 3 caracteres."))]
    pub usuario: Option<String>,

    pub password: Option<String>,

    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido paterno es obligatorio."))]
    pub paterno: String,

    #[serde(default)]
    pub materno: String,

    #[validate(length(min = 4, message = "El número de documento no es válido."))]
    pub ci: String,

    #[validate(length(min = 1, message = "La dirección es obligatoria."))]
    pub direccion: String,

    #[validate(range(min = 1, message = "El celular no es válido."))]
    pub celular: i64,

    #[validate(email(message = "El correo electrónico no es válido."))]
    pub email: String,
}

impl UsuarioRequest {
    pub fn datos(&self) -> DatosUsuario {
        DatosUsuario {
            nombre: self.nombre.trim().to_string(),
            paterno: self.paterno.trim().to_string(),
            materno: self.materno.trim().to_string(),
            numero_documento: self.ci.trim().to_string(),
            direccion: self.direccion.trim().to_string(),
            celular: self.celular,
            email: self.email.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(rename = "type", default)]
    pub direction: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnFilters {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub estado: Option<i16>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListFilterRequest {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1_000_000, message = "La página debe estar entre 1 y 1000000."))]
    pub page: i64,

    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "La cantidad por página debe estar entre 1 y 100."))]
    pub per_page: i64,

    #[serde(default)]
    pub sort: Vec<SortField>,

    #[serde(default)]
    pub column_filters: ColumnFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListFilterResponse {
    pub records: Vec<Usuario>,
    pub total: i64,
}
