//! DTOs de autenticación
//!
//! Requests validadas con `validator` y las respuestas del flujo de login.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::funcionario::FuncionarioPerfil;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El usuario es obligatorio."))]
    pub usuario: String,

    #[validate(length(min = 3, message = "La contraseña debe tener al menos 3 caracteres."))]
    pub password: String,

    #[validate(length(min = 2, message = "El código de aplicación debe tener al menos 2 caracteres."))]
    pub aplicacion: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CiudadaniaLoginRequest {
    #[validate(length(min = 1, message = "El identificador de Ciudadanía Digital es obligatorio."))]
    pub binnacle_id: String,

    #[validate(length(min = 2, message = "El código de aplicación debe tener al menos 2 caracteres."))]
    pub aplicacion: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    #[validate(range(min = 1, message = "El funcionario no es válido."))]
    pub funcionario_id: i32,

    #[validate(range(min = 1, message = "La aplicación no es válida."))]
    pub aplicacion_id: i32,

    pub code: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "El token es obligatorio."))]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PermitRequest {
    #[validate(range(min = 1, message = "El funcionario no es válido."))]
    pub funcionario_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecoverRequest {
    #[validate(length(min = 1, message = "El usuario es obligatorio."))]
    pub usuario: String,

    #[validate(length(min = 2, message = "El código de aplicación debe tener al menos 2 caracteres."))]
    pub aplicacion: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmCodeRequest {
    #[validate(length(min = 1, message = "El usuario es obligatorio."))]
    pub usuario: String,

    #[validate(length(min = 2, message = "El código de aplicación debe tener al menos 2 caracteres."))]
    pub aplicacion: String,

    pub code: i32,

    pub codigoid: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 3, message = "El usuario debe tener al menos 3 caracteres."))]
    pub usuario: String,

    #[validate(length(min = 2, message = "El código de aplicación debe tener al menos 2 caracteres."))]
    pub aplicacion: String,

    pub code: i32,

    #[validate(length(min = 3, message = "La contraseña debe tener al menos 3 caracteres."))]
    pub new_password: String,

    #[validate(length(min = 3, message = "La confirmación debe tener al menos 3 caracteres."))]
    pub confirm_password: String,
}

/// Perfil del funcionario dentro del bundle de login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(flatten)]
    pub perfil: FuncionarioPerfil,
    pub nombre_completo: String,
}

impl From<FuncionarioPerfil> for UserData {
    fn from(perfil: FuncionarioPerfil) -> Self {
        Self {
            nombre_completo: perfil.nombre_completo(),
            perfil,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppLink {
    pub aplicacion_id: i32,
    pub nombre_aplicacion: String,
    pub url: String,
}

/// Token emitido junto con usuario, aplicaciones, roles y permisos
#[derive(Debug, Clone, Serialize)]
pub struct TokenBundle {
    pub user: Vec<UserData>,
    pub apps: Vec<AppLink>,
    pub roles: Vec<String>,
    pub permisos: Vec<String>,
    pub token: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodigoPendiente {
    pub funcionario_id: i32,
    pub aplicacion_id: i32,
}

/// Resultado de un login: token emitido o segundo factor pendiente
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Token(TokenBundle),
    CodigoEnviado(CodigoPendiente),
}

/// Datos del portador de un token válido
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioToken {
    pub aplicacion_id: i32,
    pub funcionario_id: i32,
    pub persona_id: i32,
    pub ci: String,
    pub nombre_completo: String,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default)]
    pub institucion_id: Option<i32>,
    #[serde(default)]
    pub institucion: Option<String>,
    #[serde(default)]
    pub celular: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecoverResponse {
    pub celular: String,
    pub codigoid: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AplicacionResumen {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermisosAplicacion {
    pub app: AplicacionResumen,
    pub roles: Vec<String>,
    pub permisos: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CiudadaniaFlags {
    pub aplicacion: bool,
    pub ciudadania: bool,
    pub doble_autenticacion: bool,
}
