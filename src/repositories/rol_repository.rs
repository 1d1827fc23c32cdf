//! Repositorio de roles y permisos

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::rol::Rol;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait RolRepository: Send + Sync {
    /// Roles del funcionario; con `aplicacion_id` solo los de esa aplicación
    async fn roles_de(&self, funcionario_id: i32, aplicacion_id: Option<i32>) -> AppResult<Vec<Rol>>;

    /// Nombres de permiso de los roles, en el orden de los roles recibidos
    async fn permisos_de_roles(&self, rol_ids: &[i32]) -> AppResult<Vec<String>>;
}

pub struct PgRolRepository {
    pool: PgPool,
}

impl PgRolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RolRepository for PgRolRepository {
    async fn roles_de(&self, funcionario_id: i32, aplicacion_id: Option<i32>) -> AppResult<Vec<Rol>> {
        let roles = sqlx::query_as::<_, Rol>(
            r#"
            SELECT r.id, r.nombre, r.aplicacion_id, r.doble_autenticacion
            FROM funcionario_rol fr
            INNER JOIN roles r ON r.id = fr.rol_id
            WHERE fr.funcionario_id = $1
              AND fr.estado = 1
              AND r.estado = 1
              AND ($2::INT IS NULL OR r.aplicacion_id = $2)
            ORDER BY r.id
            "#,
        )
        .bind(funcionario_id)
        .bind(aplicacion_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn permisos_de_roles(&self, rol_ids: &[i32]) -> AppResult<Vec<String>> {
        if rol_ids.is_empty() {
            return Ok(Vec::new());
        }

        let permisos: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT p.nombre
            FROM rol_permiso rp
            INNER JOIN permisos p ON p.id = rp.permiso_id
            WHERE rp.rol_id = ANY($1)
              AND rp.estado = 1
              AND p.nombre IS NOT NULL
            ORDER BY array_position($1, rp.rol_id), p.id
            "#,
        )
        .bind(rol_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(permisos)
    }
}
