//! Modelo de Usuario
//!
//! Catálogo de usuarios administrado por el CRUD de `/api/usuario`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Usuario - mapea a la tabla usuarios
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: i32,
    pub usuario: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub nombre_completo: String,
    pub nombre: String,
    pub paterno: String,
    pub materno: String,
    pub numero_documento: String,
    pub direccion: String,
    pub celular: i64,
    pub email: String,
    pub estado: i16,
    pub funcionario_id_create: i32,
    pub funcionario_id_update: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos de perfil para alta y modificación
#[derive(Debug, Clone)]
pub struct DatosUsuario {
    pub nombre: String,
    pub paterno: String,
    pub materno: String,
    pub numero_documento: String,
    pub direccion: String,
    pub celular: i64,
    pub email: String,
}

impl DatosUsuario {
    pub fn nombre_completo(&self) -> String {
        format!("{} {} {}", self.nombre, self.paterno, self.materno)
    }
}

/// Alta de usuario con la contraseña ya cifrada
#[derive(Debug, Clone)]
pub struct NuevoUsuario {
    pub usuario: String,
    pub password_hash: String,
    pub datos: DatosUsuario,
}

/// Columnas por las que se permite ordenar el listado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdenUsuario {
    Id,
    Usuario,
    NombreCompleto,
    NumeroDocumento,
    Estado,
    CreatedAt,
}

impl OrdenUsuario {
    pub fn desde_campo(campo: &str) -> Option<Self> {
        match campo {
            "id" => Some(Self::Id),
            "usuario" => Some(Self::Usuario),
            "nombreCompleto" => Some(Self::NombreCompleto),
            "numeroDocumento" | "ci" => Some(Self::NumeroDocumento),
            "estado" => Some(Self::Estado),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn columna(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Usuario => "usuario",
            Self::NombreCompleto => "nombre_completo",
            Self::NumeroDocumento => "numero_documento",
            Self::Estado => "estado",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Filtros y paginación del listado de usuarios
#[derive(Debug, Clone)]
pub struct FiltroUsuarios {
    pub page: i64,
    pub per_page: i64,
    pub orden: OrdenUsuario,
    pub descendente: bool,
    pub busqueda: Option<String>,
    pub estado: Option<i16>,
}

impl FiltroUsuarios {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.per_page.max(0))
    }
}
