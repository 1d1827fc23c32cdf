//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{PgUsuarioRepository, Repositories};
use crate::services::ciudadania_service::CiudadaniaClient;
use crate::services::sms_service::{HttpSmsSender, LogSmsSender, SmsSender};
use crate::services::token_verifier::{HttpTokenVerifier, TokenVerifier};
use crate::services::{AuthService, AuthSettings, UsuarioService};
use crate::utils::jwt::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub auth: Arc<AuthService>,
    pub usuarios: Arc<UsuarioService>,
    pub token_verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let sms: Arc<dyn SmsSender> = match &config.sms_service_url {
            Some(url) => Arc::new(HttpSmsSender::new(http_client.clone(), url.clone())),
            None => Arc::new(LogSmsSender),
        };

        let auth = AuthService::new(
            Repositories::postgres(&pool),
            JwtService::new(&config.jwt_secret),
            sms,
            Arc::new(CiudadaniaClient::new(http_client.clone(), config.ciudadania_url.clone())),
            AuthSettings::from(&config),
        );

        Ok(Self {
            auth: Arc::new(auth),
            usuarios: Arc::new(UsuarioService::new(Arc::new(PgUsuarioRepository::new(pool)))),
            token_verifier: Arc::new(HttpTokenVerifier::new(
                http_client,
                config.service_login_url.clone(),
            )),
            config,
        })
    }
}
