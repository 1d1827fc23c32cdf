//! Servicio de autenticación
//!
//! Orquesta el login de todas las estrategias, la doble autenticación por
//! SMS, la validación, renovación y cierre de tokens, la recuperación de
//! contraseña y la consulta de permisos.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{
    AplicacionResumen, CiudadaniaFlags, CodigoPendiente, LoginOutcome, PermisosAplicacion,
    RecoverResponse, UsuarioToken,
};
use crate::models::aplicacion::{banderas, Aplicacion};
use crate::models::codigo::{CodigoVerificacion, NuevoCodigo, TipoCodigo};
use crate::models::funcionario::Funcionario;
use crate::models::sesion::Origen;
use crate::repositories::Repositories;
use crate::services::ciudadania_service::IdentityVerifier;
use crate::services::sms_service::{mensaje_login, mensaje_recuperacion, SmsSender};
use crate::services::token_service::{datos_incorrectos, limite_sesiones, sin_duplicados, Emision, TokenService};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::hash::{cifrar_password, verificar_password};
use crate::utils::jwt::{JwtClaims, JwtService, TokenError};
use crate::utils::validation::{codigo_vigente, cumple_politica_password, enmascarar_celular, generar_codigo};

/// Variante de login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStrategy {
    /// Usuario y contraseña contra la aplicación indicada
    Legacy,
    /// Usuario y contraseña contra la aplicación central; cada aplicación
    /// asociada recibe su propio token
    PerAppToken,
    /// Identidad verificada por Ciudadanía Digital, sin contraseña ni SMS
    Federated,
}

#[derive(Debug, Clone)]
pub enum Credenciales {
    Password { usuario: String, password: String },
    Ciudadania { binnacle_id: String },
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub credenciales: Credenciales,
    pub aplicacion: String,
    pub origen: Origen,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub time_code_autenticacion: i64,
    pub time_code_recover: i64,
    pub app_login_code: Option<String>,
    /// Marca los códigos como usados tras una confirmación o cambio exitoso
    pub code_single_use: bool,
}

impl From<&EnvironmentConfig> for AuthSettings {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            time_code_autenticacion: config.time_code_autenticacion,
            time_code_recover: config.time_code_recover,
            app_login_code: config.app_login_code.clone(),
            code_single_use: config.code_single_use,
        }
    }
}

/// Doble autenticación:
/// global apagada → no; algún rol de la aplicación la desactiva → no;
/// en otro caso decide la bandera del funcionario.
pub fn decidir_doble_autenticacion(
    global: bool,
    roles: impl IntoIterator<Item = bool>,
    funcionario: bool,
) -> bool {
    if !global {
        return false;
    }
    if roles.into_iter().any(|rol| !rol) {
        return false;
    }
    funcionario
}

pub struct AuthService {
    repos: Repositories,
    tokens: TokenService,
    jwt: JwtService,
    sms: Arc<dyn SmsSender>,
    identidad: Arc<dyn IdentityVerifier>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        repos: Repositories,
        jwt: JwtService,
        sms: Arc<dyn SmsSender>,
        identidad: Arc<dyn IdentityVerifier>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            tokens: TokenService::new(repos.clone(), jwt.clone()),
            repos,
            jwt,
            sms,
            identidad,
            settings,
        }
    }

    // ---- Login ----

    pub async fn login(&self, estrategia: LoginStrategy, input: LoginInput) -> AppResult<LoginOutcome> {
        let codigo_aplicacion = match (estrategia, &self.settings.app_login_code) {
            (LoginStrategy::PerAppToken, Some(central)) => central.clone(),
            _ => input.aplicacion.clone(),
        };
        let aplicacion = self.aplicacion_por_codigo(&codigo_aplicacion).await?;

        let funcionario = match (estrategia, &input.credenciales) {
            (LoginStrategy::Federated, Credenciales::Ciudadania { binnacle_id }) => {
                self.funcionario_federado(binnacle_id).await?
            }
            (LoginStrategy::Legacy | LoginStrategy::PerAppToken, Credenciales::Password { usuario, password }) => {
                self.validar_usuario(usuario, password).await?
            }
            _ => {
                return Err(AppError::Internal(format!(
                    "Credenciales no compatibles con la estrategia {:?}",
                    estrategia
                )))
            }
        };

        self.verificar_acceso(funcionario.id, &aplicacion).await?;
        self.verificar_cupo(funcionario.id, &aplicacion).await?;

        if estrategia != LoginStrategy::Federated
            && self.requiere_doble_autenticacion(&funcionario, &aplicacion).await?
        {
            let pendiente = self.enviar_codigo_confirmacion(&funcionario, &aplicacion).await?;
            return Ok(LoginOutcome::CodigoEnviado(pendiente));
        }

        let bundle = self
            .tokens
            .emitir(funcionario.id, &aplicacion, estrategia, Emision::Nueva(input.origen))
            .await?;

        info!("✅ Login correcto de {} en {}", funcionario.usuario, aplicacion.codigo);
        Ok(LoginOutcome::Token(bundle))
    }

    /// Segundo factor: compara el último código enviado y emite el token
    pub async fn confirmar(
        &self,
        funcionario_id: i32,
        aplicacion_id: i32,
        codigo: i32,
        origen: Origen,
    ) -> AppResult<LoginOutcome> {
        let aplicacion = self
            .repos
            .aplicaciones
            .find_by_id(aplicacion_id)
            .await?
            .ok_or_else(aplicacion_incorrecta)?;

        let registro = self
            .repos
            .auth
            .ultimo_codigo(TipoCodigo::Confirmacion, funcionario_id, aplicacion_id)
            .await?
            .ok_or_else(codigo_incorrecto)?;

        self.verificar_codigo(&registro, codigo, self.settings.time_code_autenticacion)?;

        let bundle = self
            .tokens
            .emitir(funcionario_id, &aplicacion, LoginStrategy::Legacy, Emision::Nueva(origen))
            .await?;
        self.consumir_codigo(TipoCodigo::Confirmacion, &registro).await?;

        Ok(LoginOutcome::Token(bundle))
    }

    async fn validar_usuario(&self, usuario: &str, password: &str) -> AppResult<Funcionario> {
        let funcionario = self
            .repos
            .funcionarios
            .find_by_usuario(usuario)
            .await?
            .ok_or_else(|| AppError::rejected("Login incorrecto.", "usuario", "Nombre de usuario incorrecto."))?;

        if !verificar_password(password, &funcionario.password).await? {
            return Err(AppError::rejected("Login incorrecto.", "password", "Contraseña incorrecta."));
        }

        Ok(funcionario)
    }

    async fn funcionario_federado(&self, binnacle_id: &str) -> AppResult<Funcionario> {
        let ci = self.identidad.numero_documento(binnacle_id).await?;

        let persona = self
            .repos
            .funcionarios
            .find_persona_by_ci(&ci)
            .await?
            .ok_or_else(datos_incorrectos)?;

        self.repos
            .funcionarios
            .find_by_persona(persona.id)
            .await?
            .ok_or_else(datos_incorrectos)
    }

    async fn verificar_acceso(&self, funcionario_id: i32, aplicacion: &Aplicacion) -> AppResult<()> {
        match self.repos.aplicaciones.acceso(funcionario_id, aplicacion.id).await? {
            Some(acceso) if acceso.habilitado() => Ok(()),
            _ => Err(AppError::rejected(
                "No tiene acceso a la aplicación.",
                "aplicacion",
                format!("No tiene acceso a la aplicación {}.", aplicacion.nombre),
            )),
        }
    }

    async fn verificar_cupo(&self, funcionario_id: i32, aplicacion: &Aplicacion) -> AppResult<()> {
        let activas = self.repos.sesiones.contar_activas(funcionario_id, aplicacion.id).await?;
        if activas >= i64::from(aplicacion.cantidad_sesiones) {
            return Err(limite_sesiones(&aplicacion.nombre));
        }
        Ok(())
    }

    async fn requiere_doble_autenticacion(
        &self,
        funcionario: &Funcionario,
        aplicacion: &Aplicacion,
    ) -> AppResult<bool> {
        let global = match self.repos.auth.estado_global(banderas::DOBLE_AUTENTICACION).await? {
            Some(estado) => estado,
            None => {
                warn!("⚠️ Bandera global {} no registrada, se omite", banderas::DOBLE_AUTENTICACION);
                false
            }
        };
        if !global {
            return Ok(false);
        }

        let roles = self.repos.roles.roles_de(funcionario.id, Some(aplicacion.id)).await?;
        Ok(decidir_doble_autenticacion(
            global,
            roles.iter().map(|rol| rol.doble_autenticacion),
            funcionario.doble_autenticacion,
        ))
    }

    async fn enviar_codigo_confirmacion(
        &self,
        funcionario: &Funcionario,
        aplicacion: &Aplicacion,
    ) -> AppResult<CodigoPendiente> {
        let persona = self
            .repos
            .funcionarios
            .find_persona(funcionario.perfil_persona_id)
            .await?
            .ok_or_else(datos_incorrectos)?;

        let codigo = generar_codigo();
        let mensaje = mensaje_login(&aplicacion.nombre, &persona.nombre, codigo, self.settings.time_code_autenticacion);
        self.enviar_sms(persona.celular.as_deref(), &mensaje).await;

        self.repos
            .auth
            .insertar_codigo(
                TipoCodigo::Confirmacion,
                &NuevoCodigo {
                    funcionario_id: funcionario.id,
                    aplicacion_id: aplicacion.id,
                    codigo,
                    fecha: Utc::now(),
                },
            )
            .await?;

        info!("📨 Código de doble autenticación enviado a funcionario {}", funcionario.id);
        Ok(CodigoPendiente {
            funcionario_id: funcionario.id,
            aplicacion_id: aplicacion.id,
        })
    }

    // ---- Tokens ----

    /// Token vigente con sesión activa; devuelve los datos del portador
    pub async fn validate(&self, token: &str) -> AppResult<UsuarioToken> {
        let claims = self.jwt.verificar(token)?;
        self.sesion_del_token(token, &claims).await?;

        let (funcionario_id, aplicacion_id) = claims.funcionario_aplicacion()?;
        let perfil = self
            .repos
            .funcionarios
            .perfil(funcionario_id)
            .await?
            .ok_or_else(datos_incorrectos)?;

        Ok(UsuarioToken {
            aplicacion_id,
            funcionario_id,
            persona_id: perfil.persona_id,
            ci: perfil.ci.clone(),
            nombre_completo: perfil.nombre_completo(),
            usuario: Some(perfil.usuario),
            cargo: perfil.cargo,
            institucion_id: perfil.institucion_id,
            institucion: perfil.institucion,
            celular: perfil.celular,
            email: perfil.email,
        })
    }

    /// Emite un token nuevo para la sesión del token recibido
    pub async fn refresh(&self, token: &str) -> AppResult<String> {
        let sesion = self
            .repos
            .sesiones
            .find_activa_por_token(token)
            .await?
            .ok_or_else(sesion_no_disponible)?;

        let aplicacion = self
            .repos
            .aplicaciones
            .find_by_id(sesion.aplicacion_id)
            .await?
            .ok_or_else(aplicacion_incorrecta)?;

        let bundle = self
            .tokens
            .emitir(
                sesion.funcionario_id,
                &aplicacion,
                LoginStrategy::Legacy,
                Emision::Refresh { sesion_id: sesion.id },
            )
            .await?;

        Ok(bundle.token)
    }

    /// Cierra la sesión del token, aunque el token ya haya caducado
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let claims = match self.jwt.verificar(token) {
            Ok(claims) => claims,
            Err(TokenError::Caducado) => self.jwt.verificar_ignorando_expiracion(token)?,
            Err(e) => return Err(e.into()),
        };

        let (funcionario_id, aplicacion_id) = claims.funcionario_aplicacion()?;
        let sesion = self
            .repos
            .sesiones
            .find_activa_por_token(token)
            .await?
            .filter(|s| s.funcionario_id == funcionario_id && s.aplicacion_id == aplicacion_id)
            .ok_or_else(sesion_no_disponible)?;

        self.repos.sesiones.cerrar(sesion.id).await?;
        info!("👋 Sesión {} cerrada para funcionario {}", sesion.id, funcionario_id);
        Ok(())
    }

    async fn sesion_del_token(&self, token: &str, claims: &JwtClaims) -> AppResult<()> {
        let (funcionario_id, aplicacion_id) = claims.funcionario_aplicacion()?;

        match self.repos.aplicaciones.acceso(funcionario_id, aplicacion_id).await? {
            Some(acceso) if acceso.habilitado() => {}
            _ => {
                return Err(AppError::unauthorized(
                    "Token inválido.",
                    "aplicacion",
                    "No tiene acceso a la aplicación.",
                ))
            }
        }

        let sesion = self.repos.sesiones.find_activa_por_token(token).await?;
        match sesion {
            Some(s) if s.funcionario_id == funcionario_id && s.aplicacion_id == aplicacion_id => Ok(()),
            _ => Err(AppError::unauthorized("Token inválido.", "token", "El token enviado a expirado.")),
        }
    }

    // ---- Permisos ----

    /// Permisos de todos los roles del funcionario
    pub async fn permits(&self, funcionario_id: i32) -> AppResult<Vec<String>> {
        let roles = self.repos.roles.roles_de(funcionario_id, None).await?;
        let ids: Vec<i32> = roles.iter().map(|rol| rol.id).collect();
        Ok(sin_duplicados(self.repos.roles.permisos_de_roles(&ids).await?))
    }

    /// Roles y permisos del portador en la aplicación de su token
    pub async fn permits_v2(&self, token: &str) -> AppResult<PermisosAplicacion> {
        let claims = self.jwt.verificar(token)?;
        let (funcionario_id, aplicacion_id) = claims.funcionario_aplicacion()?;

        let aplicacion = self
            .repos
            .aplicaciones
            .find_by_id(aplicacion_id)
            .await?
            .ok_or_else(aplicacion_incorrecta)?;

        let (roles, permisos) = self.tokens.roles_y_permisos(funcionario_id, aplicacion_id).await?;
        if roles.is_empty() {
            return Err(AppError::rejected(
                "No tiene roles asignados.",
                "roles",
                format!("El funcionario no tiene roles en la aplicación {}.", aplicacion.nombre),
            ));
        }
        if permisos.is_empty() {
            return Err(AppError::rejected(
                "No tiene permisos.",
                "permisos",
                format!("Los roles del funcionario no tienen permisos en {}.", aplicacion.nombre),
            ));
        }

        Ok(PermisosAplicacion {
            app: AplicacionResumen {
                id: aplicacion.id,
                codigo: aplicacion.codigo,
                nombre: aplicacion.nombre,
            },
            roles,
            permisos,
        })
    }

    /// Banderas de Ciudadanía Digital y doble autenticación para una aplicación
    pub async fn ciudadania(&self, codigo: &str) -> AppResult<CiudadaniaFlags> {
        let aplicacion = self.aplicacion_por_codigo(codigo).await?;
        let ciudadania = self.repos.auth.estado_global(banderas::CIUDADANIA).await?.unwrap_or(false);
        let doble = self
            .repos
            .auth
            .estado_global(banderas::DOBLE_AUTENTICACION)
            .await?
            .unwrap_or(false);

        Ok(CiudadaniaFlags {
            aplicacion: aplicacion.ciudadania,
            ciudadania,
            doble_autenticacion: doble,
        })
    }

    // ---- Contraseñas ----

    pub async fn recover(&self, usuario: &str, codigo_aplicacion: &str) -> AppResult<RecoverResponse> {
        let (funcionario, aplicacion) = self
            .funcionario_y_aplicacion(usuario, codigo_aplicacion, usuario_incorrecto)
            .await?;

        let persona = self
            .repos
            .funcionarios
            .find_persona(funcionario.perfil_persona_id)
            .await?
            .ok_or_else(datos_incorrectos)?;

        let codigo = generar_codigo();
        let mensaje = mensaje_recuperacion(&aplicacion.nombre, &persona.nombre, codigo, self.settings.time_code_recover);
        self.enviar_sms(persona.celular.as_deref(), &mensaje).await;

        let codigoid = self
            .repos
            .auth
            .insertar_codigo(
                TipoCodigo::Recuperacion,
                &NuevoCodigo {
                    funcionario_id: funcionario.id,
                    aplicacion_id: aplicacion.id,
                    codigo,
                    fecha: Utc::now(),
                },
            )
            .await?;

        info!("📨 Código de recuperación {} generado para funcionario {}", codigoid, funcionario.id);
        Ok(RecoverResponse {
            celular: enmascarar_celular(persona.celular.as_deref().unwrap_or_default()),
            codigoid,
        })
    }

    pub async fn confirm_code(
        &self,
        usuario: &str,
        codigo_aplicacion: &str,
        codigo: i32,
        codigoid: i64,
    ) -> AppResult<()> {
        let (funcionario, aplicacion) = self
            .funcionario_y_aplicacion(usuario, codigo_aplicacion, usuario_incorrecto)
            .await?;

        let registro = self
            .repos
            .auth
            .codigo_por_id(TipoCodigo::Recuperacion, codigoid)
            .await?
            .filter(|r| r.funcionario_id == funcionario.id && r.aplicacion_id == aplicacion.id)
            .ok_or_else(codigo_incorrecto)?;

        self.verificar_codigo(&registro, codigo, self.settings.time_code_recover)
    }

    pub async fn change_password(
        &self,
        usuario: &str,
        codigo_aplicacion: &str,
        codigo: i32,
        nueva: &str,
        confirmacion: &str,
    ) -> AppResult<()> {
        if nueva != confirmacion {
            return Err(AppError::rejected(
                "Las contraseñas deben ser iguales.",
                "password",
                "Las contraseñas deben ser iguales.",
            ));
        }
        if !cumple_politica_password(nueva) {
            return Err(AppError::rejected(
                "La contraseña no cumple con los requisitos.",
                "password",
                "La contraseña no cumple con los requisitos mínimos.",
            ));
        }

        let (funcionario, aplicacion) = self
            .funcionario_y_aplicacion(usuario, codigo_aplicacion, datos_incorrectos)
            .await?;
        let registro = self
            .repos
            .auth
            .ultimo_codigo(TipoCodigo::Recuperacion, funcionario.id, aplicacion.id)
            .await?
            .ok_or_else(codigo_incorrecto)?;
        self.verificar_codigo(&registro, codigo, self.settings.time_code_recover)?;

        let hash = cifrar_password(nueva).await?;
        self.repos.funcionarios.update_password(funcionario.id, &hash).await?;
        self.consumir_codigo(TipoCodigo::Recuperacion, &registro).await?;

        info!("🔒 Contraseña actualizada para funcionario {}", funcionario.id);
        Ok(())
    }

    // ---- Helpers ----

    async fn aplicacion_por_codigo(&self, codigo: &str) -> AppResult<Aplicacion> {
        self.repos
            .aplicaciones
            .find_by_codigo(codigo)
            .await?
            .ok_or_else(aplicacion_incorrecta)
    }

    async fn funcionario_y_aplicacion(
        &self,
        usuario: &str,
        codigo: &str,
        sin_funcionario: fn() -> AppError,
    ) -> AppResult<(Funcionario, Aplicacion)> {
        let funcionario = self
            .repos
            .funcionarios
            .find_by_usuario(usuario)
            .await?
            .ok_or_else(sin_funcionario)?;
        let aplicacion = self.aplicacion_por_codigo(codigo).await?;
        Ok((funcionario, aplicacion))
    }

    fn verificar_codigo(&self, registro: &CodigoVerificacion, codigo: i32, minutos: i64) -> AppResult<()> {
        if registro.codigo != codigo || (self.settings.code_single_use && registro.usado) {
            return Err(codigo_incorrecto());
        }
        if !codigo_vigente(registro.fecha, Utc::now(), minutos) {
            return Err(AppError::rejected(
                "Supero el tiempo límite de validez del código.",
                "codigo",
                "Supero el tiempo límite de validez del código.",
            ));
        }
        Ok(())
    }

    async fn consumir_codigo(&self, tipo: TipoCodigo, registro: &CodigoVerificacion) -> AppResult<()> {
        if self.settings.code_single_use {
            self.repos.auth.marcar_usado(tipo, registro.id).await?;
        }
        Ok(())
    }

    /// El SMS no bloquea el flujo: un fallo de entrega solo se registra
    async fn enviar_sms(&self, celular: Option<&str>, mensaje: &str) {
        let Some(celular) = celular.filter(|c| !c.trim().is_empty()) else {
            warn!("⚠️ La persona no tiene celular registrado, SMS no enviado");
            return;
        };
        if let Err(e) = self.sms.enviar(celular, mensaje).await {
            warn!("⚠️ Error enviando SMS: {}", e);
        }
    }
}

fn aplicacion_incorrecta() -> AppError {
    AppError::rejected(
        "Los datos de la aplicación son incorrectos.",
        "aplicacion",
        "La aplicación no existe o no está habilitada.",
    )
}

fn usuario_incorrecto() -> AppError {
    AppError::rejected(
        "El nombre de usuario es incorrecto.",
        "funcionario",
        "El nombre de usuario es incorrecto.",
    )
}

fn codigo_incorrecto() -> AppError {
    AppError::rejected(
        "El código proporcionado es incorrecto.",
        "codigo",
        "El código proporcionado es incorrecto.",
    )
}

fn sesion_no_disponible() -> AppError {
    AppError::unauthorized(
        "El usuario no tiene la sesion disponible.",
        "token",
        "La session fue cerrada.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_off_skips() {
        assert!(!decidir_doble_autenticacion(false, vec![true, true], true));
    }

    #[test]
    fn test_role_off_skips() {
        assert!(!decidir_doble_autenticacion(true, vec![true, false], true));
    }

    #[test]
    fn test_user_flag_decides_otherwise() {
        assert!(decidir_doble_autenticacion(true, vec![true, true], true));
        assert!(!decidir_doble_autenticacion(true, vec![true], false));
        assert!(decidir_doble_autenticacion(true, Vec::<bool>::new(), true));
    }
}
