//! Modelo de Funcionario
//!
//! Funcionario con sus credenciales, la persona asociada y la vista de
//! perfil que viaja en los tokens.

use serde::Serialize;
use sqlx::FromRow;

/// Funcionario - mapea a la tabla funcionarios
#[derive(Debug, Clone, FromRow)]
pub struct Funcionario {
    pub id: i32,
    pub usuario: String,
    pub password: String,
    pub perfil_persona_id: i32,
    pub doble_autenticacion: bool,
    pub estado: i16,
}

/// Persona - mapea a la tabla perfil_personas
#[derive(Debug, Clone, FromRow)]
pub struct Persona {
    pub id: i32,
    pub nombre: String,
    pub paterno: Option<String>,
    pub materno: Option<String>,
    pub ci: String,
    pub celular: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
}

/// Datos del funcionario devueltos en el login y en la validación del token
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FuncionarioPerfil {
    pub funcionario_id: i32,
    pub persona_id: i32,
    pub usuario: String,
    pub nombre: String,
    pub paterno: Option<String>,
    pub materno: Option<String>,
    pub ci: String,
    pub celular: Option<String>,
    pub email: Option<String>,
    pub cargo: Option<String>,
    pub institucion_id: Option<i32>,
    pub institucion: Option<String>,
}

impl FuncionarioPerfil {
    pub fn nombre_completo(&self) -> String {
        [Some(self.nombre.as_str()), self.paterno.as_deref(), self.materno.as_deref()]
            .into_iter()
            .flatten()
            .filter(|parte| !parte.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
