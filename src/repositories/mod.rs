//! Repositorios de acceso a datos
//!
//! Cada entidad expone un trait asíncrono y su implementación PostgreSQL.

pub mod aplicacion_repository;
pub mod auth_repository;
pub mod funcionario_repository;
pub mod rol_repository;
pub mod sesion_repository;
pub mod usuario_repository;

use std::sync::Arc;

use sqlx::PgPool;

pub use aplicacion_repository::{AplicacionRepository, PgAplicacionRepository};
pub use auth_repository::{AuthRepository, PgAuthRepository};
pub use funcionario_repository::{FuncionarioRepository, PgFuncionarioRepository};
pub use rol_repository::{PgRolRepository, RolRepository};
pub use sesion_repository::{PgSesionRepository, SesionRepository};
pub use usuario_repository::{PgUsuarioRepository, UsuarioRepository};

/// Repositorios que consume el servicio de autenticación
#[derive(Clone)]
pub struct Repositories {
    pub funcionarios: Arc<dyn FuncionarioRepository>,
    pub aplicaciones: Arc<dyn AplicacionRepository>,
    pub sesiones: Arc<dyn SesionRepository>,
    pub roles: Arc<dyn RolRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Repositories {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            funcionarios: Arc::new(PgFuncionarioRepository::new(pool.clone())),
            aplicaciones: Arc::new(PgAplicacionRepository::new(pool.clone())),
            sesiones: Arc::new(PgSesionRepository::new(pool.clone())),
            roles: Arc::new(PgRolRepository::new(pool.clone())),
            auth: Arc::new(PgAuthRepository::new(pool.clone())),
        }
    }
}
