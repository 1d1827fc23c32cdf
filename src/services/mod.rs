//! Servicios de negocio
//!
//! Autenticación y emisión de tokens, catálogo de usuarios y clientes de
//! servicios externos (SMS, Ciudadanía Digital, verificación de tokens).

pub mod auth_service;
pub mod ciudadania_service;
pub mod sms_service;
pub mod token_service;
pub mod token_verifier;
pub mod usuario_service;

pub use auth_service::{AuthService, AuthSettings, LoginStrategy};
pub use usuario_service::UsuarioService;
