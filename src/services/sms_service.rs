//! Envío de códigos por SMS
//!
//! `HttpSmsSender` publica el mensaje en el gateway configurado;
//! `LogSmsSender` solo lo registra en los logs.

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::utils::errors::{AppError, AppResult};

/// Prefijo internacional de los celulares registrados
const PREFIJO_PAIS: &str = "591";

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn enviar(&self, celular: &str, mensaje: &str) -> AppResult<()>;
}

pub struct HttpSmsSender {
    client: reqwest::Client,
    url: String,
}

impl HttpSmsSender {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn enviar(&self, celular: &str, mensaje: &str) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "numero": destinatario(celular), "mensaje": mensaje }))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error enviando SMS: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "El gateway de SMS respondió {}",
                response.status()
            )));
        }

        info!("📱 SMS enviado a {}", destinatario(celular));
        Ok(())
    }
}

/// Sin gateway configurado: el mensaje solo se registra
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn enviar(&self, celular: &str, _mensaje: &str) -> AppResult<()> {
        warn!("📱 SMS_SERVICE_URL no configurada, SMS para {} no enviado", destinatario(celular));
        Ok(())
    }
}

pub fn destinatario(celular: &str) -> String {
    format!("{}{}", PREFIJO_PAIS, celular.trim())
}

pub fn mensaje_login(aplicacion: &str, nombre: &str, codigo: i32, minutos: i64) -> String {
    format!(
        "*{}* \n\n Buenos días _{}_ \n 🔑 Este es tu código para ingresar al sistema: *{}* \n ⏰ El tiempo de validez del código es: *{} min*",
        aplicacion, nombre, codigo, minutos
    )
}

pub fn mensaje_recuperacion(aplicacion: &str, nombre: &str, codigo: i32, minutos: i64) -> String {
    format!(
        "*{}* \n\n Buenos días _{}_ \n 🔑 Este es tu código para recuperar tu contraseña: *{}* \n ⏰ El tiempo de validez del código es: *{} min*",
        aplicacion, nombre, codigo, minutos
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destinatario_adds_country_prefix() {
        assert_eq!(destinatario("71234567"), "59171234567");
    }

    #[test]
    fn test_login_message_names_app_and_window() {
        let mensaje = mensaje_login("Sistema", "Juan", 123456, 5);
        assert!(mensaje.contains("*Sistema*"));
        assert!(mensaje.contains("123456"));
        assert!(mensaje.contains("5 min"));
    }
}
