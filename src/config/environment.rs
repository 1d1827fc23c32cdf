//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::env;
use std::str::FromStr;

lazy_static! {
    static ref TAMANO: Regex = Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(b|kb|mb|gb)?$").expect("patrón de tamaño válido");
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    /// Minutos de validez del código de doble autenticación
    pub time_code_autenticacion: i64,
    /// Minutos de validez del código de recuperación de contraseña
    pub time_code_recover: i64,
    /// Aplicación central usada por el login v2
    pub app_login_code: Option<String>,
    /// Servicio de seguridad que valida tokens para el catálogo de usuarios
    pub service_login_url: String,
    pub sms_service_url: Option<String>,
    pub ciudadania_url: Option<String>,
    pub max_payload_size: usize,
    pub code_single_use: bool,
    pub http_timeout_secs: u64,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: optional("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parsed_or("PORT", 3000)?,
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            cors_origins: optional("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            time_code_autenticacion: parsed_or("TIME_CODE_AUTENTICATION", 5)?,
            time_code_recover: parsed_or("TIME_CODE_RECOVER", 10)?,
            app_login_code: optional("APP_LOGIN_CODE"),
            service_login_url: optional("SERVICE_LOGIN_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            sms_service_url: optional("SMS_SERVICE_URL"),
            ciudadania_url: optional("CIUDADANIA_URL"),
            max_payload_size: match optional("APP_FILE_MAX_SIZE") {
                Some(value) => tamano_en_bytes(&value)
                    .with_context(|| format!("APP_FILE_MAX_SIZE must be a size like '50mb', got '{}'", value))?,
                None => 50 * 1024 * 1024,
            },
            code_single_use: parsed_or("CODE_SINGLE_USE", false)?,
            http_timeout_secs: parsed_or("HTTP_TIMEOUT_SECS", 15)?,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(key: &str) -> Result<String> {
    optional(key).with_context(|| format!("{} must be set", key))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got '{}'", key, value)),
        None => Ok(default),
    }
}

/// Tamaño en bytes a partir de `1024`, `100kb` o `50mb`; sin unidad son bytes
fn tamano_en_bytes(value: &str) -> Option<usize> {
    let captures = TAMANO.captures(value.trim())?;
    let cantidad: f64 = captures.get(1)?.as_str().parse().ok()?;
    let unidad = captures
        .get(2)
        .map(|u| u.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let factor = match unidad.as_str() {
        "kb" => 1024.0,
        "mb" => 1024.0 * 1024.0,
        "gb" => 1024.0 * 1024.0 * 1024.0,
        _ => 1.0,
    };
    let bytes = (cantidad * factor).floor();
    (bytes <= usize::MAX as f64).then_some(bytes as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_size_accepts_units() {
        assert_eq!(tamano_en_bytes("50mb"), Some(50 * 1024 * 1024));
        assert_eq!(tamano_en_bytes("100KB"), Some(100 * 1024));
        assert_eq!(tamano_en_bytes("1.5mb"), Some(1_572_864));
        assert_eq!(tamano_en_bytes("2048"), Some(2048));
        assert_eq!(tamano_en_bytes("mucho"), None);
    }

    #[test]
    fn test_parsed_or_uses_default_when_missing() {
        let value: i64 = parsed_or("SEGURIDAD_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig {
            environment: "test".to_string(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            database_url: "postgres://localhost/seguridad".to_string(),
            jwt_secret: "secret".to_string(),
            cors_origins: vec![],
            time_code_autenticacion: 5,
            time_code_recover: 10,
            app_login_code: None,
            service_login_url: "http://localhost:3000".to_string(),
            sms_service_url: None,
            ciudadania_url: None,
            max_payload_size: 1024,
            code_single_use: false,
            http_timeout_secs: 5,
        };
        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert!(!config.is_production());
    }
}
