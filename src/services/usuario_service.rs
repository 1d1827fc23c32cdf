//! Servicio del catálogo de usuarios

use std::sync::Arc;

use tracing::info;

use crate::dto::usuario_dto::{ListFilterRequest, ListFilterResponse, UsuarioRequest};
use crate::models::usuario::{FiltroUsuarios, NuevoUsuario, OrdenUsuario, Usuario};
use crate::repositories::UsuarioRepository;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::hash::cifrar_password;
use crate::utils::validation::cumple_politica_password;

pub struct UsuarioService {
    repository: Arc<dyn UsuarioRepository>,
}

impl UsuarioService {
    pub fn new(repository: Arc<dyn UsuarioRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Usuario>> {
        self.repository.list_activos().await
    }

    pub async fn list_filter(&self, request: &ListFilterRequest) -> AppResult<ListFilterResponse> {
        let filtro = filtro_desde(request);
        let (records, total) = self.repository.list_filtrado(&filtro).await?;
        Ok(ListFilterResponse { records, total })
    }

    pub async fn insert(&self, request: &UsuarioRequest, autor: i32) -> AppResult<i32> {
        let usuario = request
            .usuario
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| validation_error("usuario", "El usuario es obligatorio."))?;
        let password = request
            .password
            .as_deref()
            .ok_or_else(|| validation_error("password", "La contraseña es obligatoria."))?;

        if !cumple_politica_password(password) {
            return Err(AppError::rejected(
                "La contraseña no cumple con los requisitos.",
                "password",
                "La contraseña no cumple con los requisitos mínimos.",
            ));
        }

        let datos = request.datos();
        if self.repository.existe_documento(&datos.numero_documento).await? {
            let message = format!("El usuario {} ya se encuentra registrado.", datos.numero_documento);
            return Err(AppError::rejected(message.clone(), "solicitud", message));
        }

        let nuevo = NuevoUsuario {
            usuario: usuario.to_string(),
            password_hash: cifrar_password(password).await?,
            datos,
        };
        let id = self.repository.insert(&nuevo, autor).await?;

        info!("👤 Usuario {} registrado por funcionario {}", id, autor);
        Ok(id)
    }

    pub async fn update(&self, id: i32, request: &UsuarioRequest, autor: i32) -> AppResult<u64> {
        let afectados = self.repository.update(id, &request.datos(), autor).await?;
        if afectados == 0 {
            return Err(usuario_inexistente(id));
        }
        Ok(afectados)
    }

    /// Alterna el estado entre activo e inactivo
    pub async fn status(&self, id: i32, autor: i32) -> AppResult<u64> {
        let estado = self
            .repository
            .estado(id)
            .await?
            .ok_or_else(|| usuario_inexistente(id))?;
        let nuevo = if estado == 1 { 0 } else { 1 };
        self.repository.cambiar_estado(id, nuevo, autor).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let afectados = self.repository.delete(id).await?;
        if afectados == 0 {
            return Err(usuario_inexistente(id));
        }
        Ok(afectados)
    }
}

fn usuario_inexistente(id: i32) -> AppError {
    AppError::rejected(
        "No se pudo realizar la solicitud.",
        "solicitud",
        format!("El usuario {} no existe o no esta autorizado.", id),
    )
}

fn filtro_desde(request: &ListFilterRequest) -> FiltroUsuarios {
    let (orden, descendente) = request
        .sort
        .iter()
        .find_map(|sort| {
            OrdenUsuario::desde_campo(&sort.field)
                .map(|orden| (orden, sort.direction.eq_ignore_ascii_case("desc")))
        })
        .unwrap_or((OrdenUsuario::Id, false));

    FiltroUsuarios {
        page: request.page,
        per_page: request.per_page,
        orden,
        descendente,
        busqueda: request
            .column_filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        estado: request.column_filters.estado,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::usuario_dto::{ColumnFilters, SortField};

    #[test]
    fn test_filter_uses_first_known_sort_field() {
        let request = ListFilterRequest {
            page: 2,
            per_page: 20,
            sort: vec![
                SortField { field: "desconocido".into(), direction: "asc".into() },
                SortField { field: "nombreCompleto".into(), direction: "DESC".into() },
            ],
            column_filters: ColumnFilters { search: Some("  ana ".into()), estado: Some(1) },
        };

        let filtro = filtro_desde(&request);
        assert_eq!(filtro.orden, OrdenUsuario::NombreCompleto);
        assert!(filtro.descendente);
        assert_eq!(filtro.busqueda.as_deref(), Some("ana"));
        assert_eq!(filtro.offset(), 20);
    }

    #[test]
    fn test_filter_defaults_to_id_ascending() {
        let request = ListFilterRequest {
            page: 1,
            per_page: 10,
            sort: vec![],
            column_filters: ColumnFilters::default(),
        };

        let filtro = filtro_desde(&request);
        assert_eq!(filtro.orden, OrdenUsuario::Id);
        assert!(!filtro.descendente);
        assert_eq!(filtro.busqueda, None);
        assert_eq!(filtro.offset(), 0);
    }

    #[test]
    fn test_offset_saturates_instead_of_overflowing() {
        let request = ListFilterRequest {
            page: i64::MAX,
            per_page: 100,
            sort: vec![],
            column_filters: ColumnFilters::default(),
        };

        assert_eq!(filtro_desde(&request).offset(), i64::MAX);
    }
}
