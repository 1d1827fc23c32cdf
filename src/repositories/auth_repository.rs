//! Repositorio de códigos de verificación y banderas globales

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::codigo::{CodigoVerificacion, NuevoCodigo, TipoCodigo};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Estado de una bandera global; `None` si no está registrada
    async fn estado_global(&self, codigo: &str) -> AppResult<Option<bool>>;

    async fn insertar_codigo(&self, tipo: TipoCodigo, codigo: &NuevoCodigo) -> AppResult<i64>;

    /// Código más reciente del par funcionario/aplicación
    async fn ultimo_codigo(
        &self,
        tipo: TipoCodigo,
        funcionario_id: i32,
        aplicacion_id: i32,
    ) -> AppResult<Option<CodigoVerificacion>>;

    async fn codigo_por_id(&self, tipo: TipoCodigo, id: i64) -> AppResult<Option<CodigoVerificacion>>;

    async fn marcar_usado(&self, tipo: TipoCodigo, id: i64) -> AppResult<()>;
}

pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for PgAuthRepository {
    async fn estado_global(&self, codigo: &str) -> AppResult<Option<bool>> {
        let estado: Option<i16> =
            sqlx::query_scalar("SELECT estado FROM globales WHERE codigo = $1 ORDER BY id DESC LIMIT 1")
                .bind(codigo)
                .fetch_optional(&self.pool)
                .await?;

        Ok(estado.map(|estado| estado == 1))
    }

    async fn insertar_codigo(&self, tipo: TipoCodigo, codigo: &NuevoCodigo) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(&format!(
            r#"
            INSERT INTO {} (funcionario_id, aplicacion_id, codigo, fecha, usado)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id
            "#,
            tipo.tabla()
        ))
        .bind(codigo.funcionario_id)
        .bind(codigo.aplicacion_id)
        .bind(codigo.codigo)
        .bind(codigo.fecha)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn ultimo_codigo(
        &self,
        tipo: TipoCodigo,
        funcionario_id: i32,
        aplicacion_id: i32,
    ) -> AppResult<Option<CodigoVerificacion>> {
        let codigo = sqlx::query_as::<_, CodigoVerificacion>(&format!(
            r#"
            SELECT id, funcionario_id, aplicacion_id, codigo, fecha, usado
            FROM {}
            WHERE funcionario_id = $1 AND aplicacion_id = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
            tipo.tabla()
        ))
        .bind(funcionario_id)
        .bind(aplicacion_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(codigo)
    }

    async fn codigo_por_id(&self, tipo: TipoCodigo, id: i64) -> AppResult<Option<CodigoVerificacion>> {
        let codigo = sqlx::query_as::<_, CodigoVerificacion>(&format!(
            "SELECT id, funcionario_id, aplicacion_id, codigo, fecha, usado FROM {} WHERE id = $1",
            tipo.tabla()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(codigo)
    }

    async fn marcar_usado(&self, tipo: TipoCodigo, id: i64) -> AppResult<()> {
        sqlx::query(&format!("UPDATE {} SET usado = TRUE WHERE id = $1", tipo.tabla()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
