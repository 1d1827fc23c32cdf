//! Controlador de autenticación
//!
//! Traduce los resultados del servicio al sobre de respuesta con los
//! mensajes de cada operación.

use std::sync::Arc;

use serde_json::Value;

use crate::dto::auth_dto::{
    ChangePasswordRequest, CiudadaniaFlags, CiudadaniaLoginRequest, ConfirmCodeRequest,
    ConfirmationRequest, LoginOutcome, LoginRequest, PermisosAplicacion, RecoverRequest,
    RecoverResponse, UsuarioToken,
};
use crate::dto::ApiResponse;
use crate::models::sesion::Origen;
use crate::services::auth_service::{Credenciales, LoginInput};
use crate::services::{AuthService, LoginStrategy};
use crate::utils::errors::AppResult;

pub struct AuthController {
    service: Arc<AuthService>,
}

impl AuthController {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }

    pub async fn login(
        &self,
        estrategia: LoginStrategy,
        request: LoginRequest,
        origen: Origen,
    ) -> AppResult<ApiResponse<Value>> {
        let input = LoginInput {
            credenciales: Credenciales::Password {
                usuario: request.usuario,
                password: request.password,
            },
            aplicacion: request.aplicacion,
            origen,
        };
        let outcome = self.service.login(estrategia, input).await?;
        login_response(outcome)
    }

    pub async fn login_ciudadania(
        &self,
        request: CiudadaniaLoginRequest,
        origen: Origen,
    ) -> AppResult<ApiResponse<Value>> {
        let input = LoginInput {
            credenciales: Credenciales::Ciudadania { binnacle_id: request.binnacle_id },
            aplicacion: request.aplicacion,
            origen,
        };
        let outcome = self.service.login(LoginStrategy::Federated, input).await?;
        login_response(outcome)
    }

    pub async fn confirmation(
        &self,
        request: ConfirmationRequest,
        origen: Origen,
    ) -> AppResult<ApiResponse<Value>> {
        let outcome = self
            .service
            .confirmar(request.funcionario_id, request.aplicacion_id, request.code, origen)
            .await?;
        login_response(outcome)
    }

    pub async fn validate(&self, token: &str) -> AppResult<ApiResponse<UsuarioToken>> {
        let usuario = self.service.validate(token).await?;
        Ok(ApiResponse::created("Token válido.", usuario))
    }

    pub async fn refresh(&self, token: &str) -> AppResult<ApiResponse<String>> {
        let nuevo = self.service.refresh(token).await?;
        Ok(ApiResponse::created("Refresh Token correcto.", nuevo))
    }

    pub async fn logout(&self, token: &str) -> AppResult<ApiResponse<Vec<Value>>> {
        self.service.logout(token).await?;
        Ok(ApiResponse::created("Logout correcto.", Vec::new()))
    }

    pub async fn permits(&self, funcionario_id: i32) -> AppResult<ApiResponse<Vec<String>>> {
        let permisos = self.service.permits(funcionario_id).await?;
        Ok(ApiResponse::created("Obtención de los permisos correctamente.", permisos))
    }

    pub async fn permits_v2(&self, token: &str) -> AppResult<ApiResponse<PermisosAplicacion>> {
        let permisos = self.service.permits_v2(token).await?;
        Ok(ApiResponse::created("Obtención de los permisos correctamente.", permisos))
    }

    pub async fn ciudadania(&self, codigo: &str) -> AppResult<ApiResponse<CiudadaniaFlags>> {
        let flags = self.service.ciudadania(codigo).await?;
        Ok(ApiResponse::created("Obtención de las banderas correctamente.", flags))
    }

    pub async fn recover(&self, request: RecoverRequest) -> AppResult<ApiResponse<RecoverResponse>> {
        let recover = self.service.recover(&request.usuario, &request.aplicacion).await?;
        Ok(ApiResponse::created(
            "El código de recuperación de contraseña se envió correctamente.",
            recover,
        ))
    }

    pub async fn confirm_code(&self, request: ConfirmCodeRequest) -> AppResult<ApiResponse<Vec<Value>>> {
        self.service
            .confirm_code(&request.usuario, &request.aplicacion, request.code, request.codigoid)
            .await?;
        Ok(ApiResponse::created("El código ingresado es correcto.", Vec::new()))
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> AppResult<ApiResponse<Vec<Value>>> {
        self.service
            .change_password(
                &request.usuario,
                &request.aplicacion,
                request.code,
                &request.new_password,
                &request.confirm_password,
            )
            .await?;
        Ok(ApiResponse::created("La contraseña se actualizó correctamente.", Vec::new()))
    }
}

fn login_response(outcome: LoginOutcome) -> AppResult<ApiResponse<Value>> {
    let response = match outcome {
        LoginOutcome::Token(bundle) => ApiResponse::created("Login correcto.", serde_json::to_value(bundle)?),
        LoginOutcome::CodigoEnviado(pendiente) => {
            ApiResponse::created("Código enviado correctamente.", serde_json::to_value(vec![pendiente])?)
        }
    };
    Ok(response)
}
