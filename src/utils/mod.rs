//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! cifrado de contraseñas y JWT.

pub mod errors;
pub mod hash;
pub mod jwt;
pub mod validation;
