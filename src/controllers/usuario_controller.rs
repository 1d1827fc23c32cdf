//! Controlador del catálogo de usuarios
//!
//! Cada operación exige su permiso antes de llegar al servicio.

use std::sync::Arc;

use crate::dto::usuario_dto::{ListFilterRequest, ListFilterResponse, UsuarioRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{permisos, Autorizado};
use crate::models::usuario::Usuario;
use crate::services::UsuarioService;
use crate::utils::errors::AppResult;

pub struct UsuarioController {
    service: Arc<UsuarioService>,
}

impl UsuarioController {
    pub fn new(service: Arc<UsuarioService>) -> Self {
        Self { service }
    }

    pub async fn list(&self, auth: &Autorizado) -> AppResult<ApiResponse<Vec<Usuario>>> {
        auth.requerir(permisos::VIEW_CATALOGO)?;
        let usuarios = self.service.list().await?;
        Ok(ApiResponse::created("Se obtuvieron los datos correctamente.", usuarios))
    }

    pub async fn list_filter(
        &self,
        auth: &Autorizado,
        request: ListFilterRequest,
    ) -> AppResult<ApiResponse<ListFilterResponse>> {
        auth.requerir(permisos::VIEW_LIST_CATALOGOS)?;
        let pagina = self.service.list_filter(&request).await?;
        Ok(ApiResponse::created("Se obtuvieron los datos correctamente.", pagina))
    }

    pub async fn insert(&self, auth: &Autorizado, request: UsuarioRequest) -> AppResult<ApiResponse<i32>> {
        let autor = auth.requerir(permisos::INSERT_CATALOGO)?;
        let id = self.service.insert(&request, autor).await?;
        Ok(ApiResponse::created("Se lograron registrar los datos correctamente.", id))
    }

    pub async fn update(
        &self,
        auth: &Autorizado,
        id: i32,
        request: UsuarioRequest,
    ) -> AppResult<ApiResponse<u64>> {
        let autor = auth.requerir(permisos::EDIT_CATALOGO)?;
        let afectados = self.service.update(id, &request, autor).await?;
        Ok(ApiResponse::created("Se lograron modificar los datos correctamente.", afectados))
    }

    pub async fn status(&self, auth: &Autorizado, id: i32) -> AppResult<ApiResponse<u64>> {
        let autor = auth.requerir(permisos::EDIT_CATALOGO)?;
        let afectados = self.service.status(id, autor).await?;
        Ok(ApiResponse::created("Se lograron modificar los datos correctamente.", afectados))
    }

    pub async fn delete(&self, auth: &Autorizado, id: i32) -> AppResult<ApiResponse<u64>> {
        auth.requerir(permisos::DELETE_CATALOGO)?;
        let afectados = self.service.delete(id).await?;
        Ok(ApiResponse::created("Se lograron eliminar los datos correctamente.", afectados))
    }
}
