//! Servicio de seguridad
//!
//! Autenticación de funcionarios por aplicación, emisión y control de
//! tokens de sesión, recuperación de contraseñas y catálogo de usuarios.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
