//! Emisión de tokens
//!
//! Un único constructor para el bundle de login de todas las estrategias:
//! firma el JWT, abre o renueva la sesión, registra la auditoría y agrega
//! aplicaciones, roles y permisos.

use chrono::Utc;
use tracing::{info, warn};

use crate::dto::auth_dto::{AppLink, TokenBundle};
use crate::models::aplicacion::Aplicacion;
use crate::models::funcionario::FuncionarioPerfil;
use crate::models::sesion::{LogSesion, NuevaSesion, Origen};
use crate::repositories::Repositories;
use crate::services::auth_service::LoginStrategy;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{JwtClaims, JwtService};

/// Código de auditoría de un login
const CODIGO_LOG_LOGIN: i32 = 0;

/// Cómo se persiste el token emitido
#[derive(Debug, Clone)]
pub enum Emision {
    /// Login: abre una sesión nueva y registra la auditoría
    Nueva(Origen),
    /// Refresh: reemplaza el token de una sesión existente
    Refresh { sesion_id: i64 },
}

#[derive(Clone)]
pub struct TokenService {
    repos: Repositories,
    jwt: JwtService,
}

impl TokenService {
    pub fn new(repos: Repositories, jwt: JwtService) -> Self {
        Self { repos, jwt }
    }

    pub async fn emitir(
        &self,
        funcionario_id: i32,
        aplicacion: &Aplicacion,
        estrategia: LoginStrategy,
        emision: Emision,
    ) -> AppResult<TokenBundle> {
        let perfil = self
            .repos
            .funcionarios
            .perfil(funcionario_id)
            .await?
            .ok_or_else(datos_incorrectos)?;

        let iat = Utc::now().timestamp();
        let (token, claims) = self.firmar(&perfil, aplicacion, iat)?;

        let sesion_nueva = match emision {
            Emision::Nueva(origen) => {
                let sesion_id = self.abrir_sesion(funcionario_id, aplicacion, &token).await?;
                self.auditar(&perfil, aplicacion, origen).await;
                Some(sesion_id)
            }
            Emision::Refresh { sesion_id } => {
                self.repos.sesiones.renovar_token(sesion_id, &token).await?;
                None
            }
        };

        let (roles, permisos) = self.roles_y_permisos(funcionario_id, aplicacion.id).await?;
        let central = sesion_nueva.filter(|_| estrategia == LoginStrategy::PerAppToken);
        let apps = self.aplicaciones(&perfil, aplicacion, &token, central).await?;

        info!(
            "🔑 Token emitido para funcionario {} en {} (exp {})",
            funcionario_id, aplicacion.codigo, claims.exp
        );

        Ok(TokenBundle {
            user: vec![perfil.into()],
            apps,
            roles,
            permisos,
            token,
            iat,
            exp: claims.exp,
        })
    }

    /// Roles del funcionario en la aplicación y sus permisos sin duplicados
    pub async fn roles_y_permisos(
        &self,
        funcionario_id: i32,
        aplicacion_id: i32,
    ) -> AppResult<(Vec<String>, Vec<String>)> {
        let roles = self.repos.roles.roles_de(funcionario_id, Some(aplicacion_id)).await?;
        let ids: Vec<i32> = roles.iter().map(|rol| rol.id).collect();
        let permisos = sin_duplicados(self.repos.roles.permisos_de_roles(&ids).await?);

        Ok((roles.into_iter().map(|rol| rol.nombre).collect(), permisos))
    }

    fn firmar(
        &self,
        perfil: &FuncionarioPerfil,
        aplicacion: &Aplicacion,
        iat: i64,
    ) -> AppResult<(String, JwtClaims)> {
        let claims = JwtClaims::new(
            perfil.funcionario_id,
            perfil.persona_id,
            aplicacion.id,
            &perfil.ci,
            iat,
            aplicacion.tiempo_token,
        );
        let token = self.jwt.firmar(&claims)?;
        Ok((token, claims))
    }

    async fn abrir_sesion(&self, funcionario_id: i32, aplicacion: &Aplicacion, token: &str) -> AppResult<i64> {
        let sesion = NuevaSesion {
            funcionario_id,
            aplicacion_id: aplicacion.id,
            token: token.to_string(),
        };

        self.repos
            .sesiones
            .insertar_con_cupo(&sesion, aplicacion.cantidad_sesiones)
            .await?
            .ok_or_else(|| limite_sesiones(&aplicacion.nombre))
    }

    async fn auditar(&self, perfil: &FuncionarioPerfil, aplicacion: &Aplicacion, origen: Origen) {
        let log = LogSesion {
            funcionario_id: perfil.funcionario_id,
            ci: perfil.ci.clone(),
            aplicacion: aplicacion.codigo.clone(),
            codigo: CODIGO_LOG_LOGIN,
            origen,
        };

        if let Err(e) = self.repos.sesiones.registrar_log(&log).await {
            warn!("⚠️ No se pudo registrar el log de sesión: {}", e);
        }
    }

    /// Aplicaciones del funcionario; con una sesión central cada enlace lleva
    /// un token propio cuya sesión se cierra junto con la central
    async fn aplicaciones(
        &self,
        perfil: &FuncionarioPerfil,
        actual: &Aplicacion,
        token_actual: &str,
        sesion_central: Option<i64>,
    ) -> AppResult<Vec<AppLink>> {
        let aplicaciones = self.repos.aplicaciones.aplicaciones_de(perfil.funcionario_id).await?;

        let Some(central_id) = sesion_central else {
            return Ok(aplicaciones
                .into_iter()
                .map(|app| AppLink {
                    aplicacion_id: app.id,
                    nombre_aplicacion: app.nombre,
                    url: app.url.unwrap_or_default(),
                })
                .collect());
        };

        let iat = Utc::now().timestamp();
        let mut apps = Vec::with_capacity(aplicaciones.len());
        for app in aplicaciones {
            let token = if app.id == actual.id {
                token_actual.to_string()
            } else {
                let (token, _) = self.firmar(perfil, &app, iat)?;
                let sesion = NuevaSesion {
                    funcionario_id: perfil.funcionario_id,
                    aplicacion_id: app.id,
                    token: token.clone(),
                };
                self.repos.sesiones.insertar_vinculada(&sesion, central_id).await?;
                token
            };

            apps.push(AppLink {
                aplicacion_id: app.id,
                nombre_aplicacion: app.nombre,
                url: format!("{}login/token={}", app.url.unwrap_or_default(), token),
            });
        }

        Ok(apps)
    }
}

pub fn limite_sesiones(aplicacion: &str) -> AppError {
    AppError::session_limit(format!(
        "Supero la cantidad de sesiones permitidas para la aplicacion {}.",
        aplicacion
    ))
}

pub fn datos_incorrectos() -> AppError {
    AppError::rejected(
        "Los datos del funcionario son incorrectos.",
        "funcionario",
        "No se encontraron los datos del funcionario.",
    )
}

/// Elimina duplicados conservando el orden de primera aparición
pub fn sin_duplicados(nombres: Vec<String>) -> Vec<String> {
    let mut vistos = std::collections::HashSet::new();
    nombres
        .into_iter()
        .filter(|nombre| vistos.insert(nombre.clone()))
        .collect()
}
