//! Controladores HTTP

pub mod auth_controller;
pub mod usuario_controller;

pub use auth_controller::AuthController;
pub use usuario_controller::UsuarioController;
