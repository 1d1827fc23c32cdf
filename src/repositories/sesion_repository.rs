//! Repositorio de sesiones y auditoría de logins

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::sesion::{LogSesion, NuevaSesion, Sesion};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait SesionRepository: Send + Sync {
    /// Sesiones activas propias; las vinculadas a otra sesión no ocupan cupo
    async fn contar_activas(&self, funcionario_id: i32, aplicacion_id: i32) -> AppResult<i64>;

    /// Inserta la sesión solo si quedan cupos; `None` cuando el límite ya se alcanzó
    async fn insertar_con_cupo(&self, sesion: &NuevaSesion, maximo: i32) -> AppResult<Option<i64>>;

    /// Sesión de una aplicación acompañante, atada a la sesión central
    async fn insertar_vinculada(&self, sesion: &NuevaSesion, padre_id: i64) -> AppResult<i64>;

    async fn find_activa_por_token(&self, token: &str) -> AppResult<Option<Sesion>>;

    async fn renovar_token(&self, sesion_id: i64, token: &str) -> AppResult<()>;

    /// Cierra la sesión junto con sus sesiones vinculadas
    async fn cerrar(&self, sesion_id: i64) -> AppResult<()>;

    async fn registrar_log(&self, log: &LogSesion) -> AppResult<()>;
}

pub struct PgSesionRepository {
    pool: PgPool,
}

impl PgSesionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SesionRepository for PgSesionRepository {
    async fn contar_activas(&self, funcionario_id: i32, aplicacion_id: i32) -> AppResult<i64> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sesiones WHERE funcionario_id = $1 AND aplicacion_id = $2 AND estado = 1 AND sesion_padre_id IS NULL",
        )
        .bind(funcionario_id)
        .bind(aplicacion_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn insertar_con_cupo(&self, sesion: &NuevaSesion, maximo: i32) -> AppResult<Option<i64>> {
        let mut tx = self.pool.begin().await?;

        // Serializa los logins concurrentes del mismo par funcionario/aplicación
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(sesion.funcionario_id)
            .bind(sesion.aplicacion_id)
            .execute(&mut *tx)
            .await?;

        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO sesiones (funcionario_id, aplicacion_id, token, estado, created_at, updated_at)
            SELECT $1, $2, $3, 1, NOW(), NOW()
            WHERE (
                SELECT COUNT(*) FROM sesiones
                WHERE funcionario_id = $1 AND aplicacion_id = $2 AND estado = 1
                  AND sesion_padre_id IS NULL
            ) < $4
            RETURNING id
            "#,
        )
        .bind(sesion.funcionario_id)
        .bind(sesion.aplicacion_id)
        .bind(&sesion.token)
        .bind(i64::from(maximo))
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn insertar_vinculada(&self, sesion: &NuevaSesion, padre_id: i64) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sesiones (funcionario_id, aplicacion_id, token, estado, sesion_padre_id, created_at, updated_at)
            VALUES ($1, $2, $3, 1, $4, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(sesion.funcionario_id)
        .bind(sesion.aplicacion_id)
        .bind(&sesion.token)
        .bind(padre_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_activa_por_token(&self, token: &str) -> AppResult<Option<Sesion>> {
        let sesion = sqlx::query_as::<_, Sesion>(
            r#"
            SELECT id, funcionario_id, aplicacion_id, token, estado, sesion_padre_id, created_at
            FROM sesiones
            WHERE token = $1 AND estado = 1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sesion)
    }

    async fn renovar_token(&self, sesion_id: i64, token: &str) -> AppResult<()> {
        sqlx::query("UPDATE sesiones SET token = $1, updated_at = NOW() WHERE id = $2")
            .bind(token)
            .bind(sesion_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cerrar(&self, sesion_id: i64) -> AppResult<()> {
        sqlx::query("UPDATE sesiones SET estado = 0, updated_at = NOW() WHERE (id = $1 OR sesion_padre_id = $1) AND estado = 1")
            .bind(sesion_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn registrar_log(&self, log: &LogSesion) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO log_sesiones (funcionario_id, ci, aplicacion, codigo, ip, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            "#,
        )
        .bind(log.funcionario_id)
        .bind(&log.ci)
        .bind(&log.aplicacion)
        .bind(log.codigo)
        .bind(&log.origen.ip)
        .bind(&log.origen.user_agent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
