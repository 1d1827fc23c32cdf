//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema
//! PostgreSQL de seguridad.

pub mod aplicacion;
pub mod codigo;
pub mod funcionario;
pub mod rol;
pub mod sesion;
pub mod usuario;
