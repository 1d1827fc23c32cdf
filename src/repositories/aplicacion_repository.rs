//! Repositorio de aplicaciones y accesos de funcionarios

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::aplicacion::{Aplicacion, FuncionarioAplicacion};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait AplicacionRepository: Send + Sync {
    async fn find_by_codigo(&self, codigo: &str) -> AppResult<Option<Aplicacion>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Aplicacion>>;

    /// Registro de acceso del funcionario a la aplicación, habilitado o no
    async fn acceso(
        &self,
        funcionario_id: i32,
        aplicacion_id: i32,
    ) -> AppResult<Option<FuncionarioAplicacion>>;

    /// Aplicaciones activas a las que el funcionario tiene acceso habilitado
    async fn aplicaciones_de(&self, funcionario_id: i32) -> AppResult<Vec<Aplicacion>>;
}

pub struct PgAplicacionRepository {
    pool: PgPool,
}

impl PgAplicacionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const APLICACION_COLUMNS: &str = "a.id, a.codigo, a.nombre, a.url, a.cantidad_sesiones, \
     a.tiempo_token, a.doble_autenticacion, a.ciudadania, a.estado";

#[async_trait]
impl AplicacionRepository for PgAplicacionRepository {
    async fn find_by_codigo(&self, codigo: &str) -> AppResult<Option<Aplicacion>> {
        let aplicacion = sqlx::query_as::<_, Aplicacion>(&format!(
            "SELECT {} FROM aplicaciones a WHERE a.codigo = $1 AND a.estado = 1",
            APLICACION_COLUMNS
        ))
        .bind(codigo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(aplicacion)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Aplicacion>> {
        let aplicacion = sqlx::query_as::<_, Aplicacion>(&format!(
            "SELECT {} FROM aplicaciones a WHERE a.id = $1",
            APLICACION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(aplicacion)
    }

    async fn acceso(
        &self,
        funcionario_id: i32,
        aplicacion_id: i32,
    ) -> AppResult<Option<FuncionarioAplicacion>> {
        let acceso = sqlx::query_as::<_, FuncionarioAplicacion>(
            r#"
            SELECT id, funcionario_id, aplicacion_id, estado
            FROM funcionario_aplicacion
            WHERE funcionario_id = $1 AND aplicacion_id = $2
            ORDER BY estado DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(funcionario_id)
        .bind(aplicacion_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(acceso)
    }

    async fn aplicaciones_de(&self, funcionario_id: i32) -> AppResult<Vec<Aplicacion>> {
        let aplicaciones = sqlx::query_as::<_, Aplicacion>(&format!(
            r#"
            SELECT {}
            FROM aplicaciones a
            INNER JOIN funcionario_aplicacion fa ON fa.aplicacion_id = a.id
            WHERE fa.funcionario_id = $1 AND fa.estado = 1 AND a.estado = 1
            ORDER BY a.id
            "#,
            APLICACION_COLUMNS
        ))
        .bind(funcionario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(aplicaciones)
    }
}
