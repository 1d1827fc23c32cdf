//! DTOs de la API

pub mod auth_dto;
pub mod response_dto;
pub mod usuario_dto;

pub use response_dto::ApiResponse;
