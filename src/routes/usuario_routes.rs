use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::controllers::UsuarioController;
use crate::dto::usuario_dto::{ListFilterRequest, ListFilterResponse, UsuarioRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::Autorizado;
use crate::middleware::ValidatedJson;
use crate::models::usuario::Usuario;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_usuario_router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_usuarios))
        .route("/listFilter", post(list_filter_usuarios))
        .route("/insert", post(insert_usuario))
        .route("/update/:id", put(update_usuario))
        .route("/status/:id", patch(status_usuario))
        .route("/delete/:id", delete(delete_usuario))
}

async fn list_usuarios(
    State(state): State<AppState>,
    auth: Autorizado,
) -> Result<ApiResponse<Vec<Usuario>>, AppError> {
    let controller = UsuarioController::new(state.usuarios.clone());
    controller.list(&auth).await
}

async fn list_filter_usuarios(
    State(state): State<AppState>,
    auth: Autorizado,
    ValidatedJson(request): ValidatedJson<ListFilterRequest>,
) -> Result<ApiResponse<ListFilterResponse>, AppError> {
    let controller = UsuarioController::new(state.usuarios.clone());
    controller.list_filter(&auth, request).await
}

async fn insert_usuario(
    State(state): State<AppState>,
    auth: Autorizado,
    ValidatedJson(request): ValidatedJson<UsuarioRequest>,
) -> Result<ApiResponse<i32>, AppError> {
    let controller = UsuarioController::new(state.usuarios.clone());
    controller.insert(&auth, request).await
}

async fn update_usuario(
    State(state): State<AppState>,
    auth: Autorizado,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UsuarioRequest>,
) -> Result<ApiResponse<u64>, AppError> {
    let controller = UsuarioController::new(state.usuarios.clone());
    controller.update(&auth, id, request).await
}

async fn status_usuario(
    State(state): State<AppState>,
    auth: Autorizado,
    Path(id): Path<i32>,
) -> Result<ApiResponse<u64>, AppError> {
    let controller = UsuarioController::new(state.usuarios.clone());
    controller.status(&auth, id).await
}

async fn delete_usuario(
    State(state): State<AppState>,
    auth: Autorizado,
    Path(id): Path<i32>,
) -> Result<ApiResponse<u64>, AppError> {
    let controller = UsuarioController::new(state.usuarios.clone());
    controller.delete(&auth, id).await
}
