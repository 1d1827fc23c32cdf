use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde_json::Value;

use crate::controllers::AuthController;
use crate::dto::auth_dto::{
    ChangePasswordRequest, CiudadaniaFlags, CiudadaniaLoginRequest, ConfirmCodeRequest,
    ConfirmationRequest, LoginRequest, PermisosAplicacion, PermitRequest, RecoverRequest,
    RecoverResponse, TokenRequest, UsuarioToken,
};
use crate::dto::ApiResponse;
use crate::middleware::ValidatedJson;
use crate::models::sesion::Origen;
use crate::services::LoginStrategy;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/login/ciudadania", post(login_ciudadania))
        .route("/v2/login", post(login_v2))
        .route("/confirmation", post(confirmation))
        .route("/validate", post(validate))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/permits", post(permits))
        .route("/v2/permits", post(permits_v2))
        .route("/recover", post(recover))
        .route("/confirmcode", post(confirm_code))
        .route("/change", post(change_password))
        .route("/ciudadania/:codigo", get(ciudadania))
}

/// IP y agente de usuario de la petición, para la auditoría de logins
pub fn origen(headers: &HeaderMap) -> Origen {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    let ip = header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .or_else(|| header("x-real-ip"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "desconocido".to_string());

    Origen {
        ip,
        user_agent: header("user-agent").unwrap_or_default().to_string(),
    }
}

async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<Value>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.login(LoginStrategy::Legacy, request, origen(&headers)).await
}

async fn login_v2(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<Value>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.login(LoginStrategy::PerAppToken, request, origen(&headers)).await
}

async fn login_ciudadania(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<CiudadaniaLoginRequest>,
) -> Result<ApiResponse<Value>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.login_ciudadania(request, origen(&headers)).await
}

async fn confirmation(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<ConfirmationRequest>,
) -> Result<ApiResponse<Value>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.confirmation(request, origen(&headers)).await
}

async fn validate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> Result<ApiResponse<UsuarioToken>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.validate(&request.token).await
}

async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> Result<ApiResponse<String>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.refresh(&request.token).await
}

async fn logout(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> Result<ApiResponse<Vec<Value>>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.logout(&request.token).await
}

async fn permits(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PermitRequest>,
) -> Result<ApiResponse<Vec<String>>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.permits(request.funcionario_id).await
}

async fn permits_v2(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> Result<ApiResponse<PermisosAplicacion>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.permits_v2(&request.token).await
}

async fn ciudadania(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> Result<ApiResponse<CiudadaniaFlags>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.ciudadania(&codigo).await
}

async fn recover(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecoverRequest>,
) -> Result<ApiResponse<RecoverResponse>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.recover(request).await
}

async fn confirm_code(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ConfirmCodeRequest>,
) -> Result<ApiResponse<Vec<Value>>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.confirm_code(request).await
}

async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiResponse<Vec<Value>>, AppError> {
    let controller = AuthController::new(state.auth.clone());
    controller.change_password(request).await
}
