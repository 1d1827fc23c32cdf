//! Repositorio del catálogo de usuarios

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::usuario::{DatosUsuario, FiltroUsuarios, NuevoUsuario, Usuario};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn list_activos(&self) -> AppResult<Vec<Usuario>>;

    /// Página de usuarios y total de registros que cumplen el filtro
    async fn list_filtrado(&self, filtro: &FiltroUsuarios) -> AppResult<(Vec<Usuario>, i64)>;

    async fn existe_documento(&self, numero_documento: &str) -> AppResult<bool>;

    async fn insert(&self, usuario: &NuevoUsuario, autor: i32) -> AppResult<i32>;

    async fn update(&self, id: i32, datos: &DatosUsuario, autor: i32) -> AppResult<u64>;

    async fn estado(&self, id: i32) -> AppResult<Option<i16>>;

    async fn cambiar_estado(&self, id: i32, estado: i16, autor: i32) -> AppResult<u64>;

    async fn delete(&self, id: i32) -> AppResult<u64>;
}

pub struct PgUsuarioRepository {
    pool: PgPool,
}

impl PgUsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USUARIO_COLUMNS: &str = "id, usuario, password, nombre_completo, nombre, paterno, materno, \
     numero_documento, direccion, celular, email, estado, funcionario_id_create, \
     funcionario_id_update, created_at, updated_at";

fn push_filtros(builder: &mut QueryBuilder<'_, Postgres>, filtro: &FiltroUsuarios) {
    builder.push(" WHERE 1 = 1");
    if let Some(busqueda) = &filtro.busqueda {
        let patron = format!("%{}%", busqueda);
        builder
            .push(" AND (nombre_completo ILIKE ")
            .push_bind(patron.clone())
            .push(" OR usuario ILIKE ")
            .push_bind(patron.clone())
            .push(" OR numero_documento ILIKE ")
            .push_bind(patron)
            .push(")");
    }
    if let Some(estado) = filtro.estado {
        builder.push(" AND estado = ").push_bind(estado);
    }
}

#[async_trait]
impl UsuarioRepository for PgUsuarioRepository {
    async fn list_activos(&self) -> AppResult<Vec<Usuario>> {
        let usuarios = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {} FROM usuarios WHERE estado = 1 ORDER BY id",
            USUARIO_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(usuarios)
    }

    async fn list_filtrado(&self, filtro: &FiltroUsuarios) -> AppResult<(Vec<Usuario>, i64)> {
        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM usuarios", USUARIO_COLUMNS));
        push_filtros(&mut select, filtro);
        select
            .push(" ORDER BY ")
            .push(filtro.orden.columna())
            .push(if filtro.descendente { " DESC" } else { " ASC" })
            .push(" LIMIT ")
            .push_bind(filtro.per_page)
            .push(" OFFSET ")
            .push_bind(filtro.offset());

        let records = select
            .build_query_as::<Usuario>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM usuarios");
        push_filtros(&mut count, filtro);
        let (total,): (i64,) = count.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;

        Ok((records, total))
    }

    async fn existe_documento(&self, numero_documento: &str) -> AppResult<bool> {
        let (existe,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM usuarios WHERE numero_documento = $1)")
                .bind(numero_documento)
                .fetch_one(&self.pool)
                .await?;

        Ok(existe)
    }

    async fn insert(&self, usuario: &NuevoUsuario, autor: i32) -> AppResult<i32> {
        let datos = &usuario.datos;
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO usuarios (
                usuario, password, nombre_completo, nombre, paterno, materno, numero_documento,
                direccion, celular, email, estado, funcionario_id_create, funcionario_id_update,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 1, $11, $11, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(&usuario.usuario)
        .bind(&usuario.password_hash)
        .bind(datos.nombre_completo())
        .bind(&datos.nombre)
        .bind(&datos.paterno)
        .bind(&datos.materno)
        .bind(&datos.numero_documento)
        .bind(&datos.direccion)
        .bind(datos.celular)
        .bind(&datos.email)
        .bind(autor)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: i32, datos: &DatosUsuario, autor: i32) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE usuarios SET
                nombre_completo = $1,
                nombre = $2,
                paterno = $3,
                materno = $4,
                numero_documento = $5,
                direccion = $6,
                celular = $7,
                email = $8,
                funcionario_id_update = $9,
                updated_at = NOW()
            WHERE id = $10
            "#,
        )
        .bind(datos.nombre_completo())
        .bind(&datos.nombre)
        .bind(&datos.paterno)
        .bind(&datos.materno)
        .bind(&datos.numero_documento)
        .bind(&datos.direccion)
        .bind(datos.celular)
        .bind(&datos.email)
        .bind(autor)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn estado(&self, id: i32) -> AppResult<Option<i16>> {
        let estado: Option<i16> = sqlx::query_scalar("SELECT estado FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(estado)
    }

    async fn cambiar_estado(&self, id: i32, estado: i16, autor: i32) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE usuarios SET estado = $1, funcionario_id_update = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(estado)
        .bind(autor)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
