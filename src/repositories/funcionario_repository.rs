//! Repositorio de funcionarios y personas

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::funcionario::{Funcionario, FuncionarioPerfil, Persona};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait FuncionarioRepository: Send + Sync {
    /// Funcionario no dado de baja por nombre de usuario
    async fn find_by_usuario(&self, usuario: &str) -> AppResult<Option<Funcionario>>;

    async fn find_by_persona(&self, persona_id: i32) -> AppResult<Option<Funcionario>>;

    async fn find_persona(&self, persona_id: i32) -> AppResult<Option<Persona>>;

    async fn find_persona_by_ci(&self, ci: &str) -> AppResult<Option<Persona>>;

    async fn perfil(&self, funcionario_id: i32) -> AppResult<Option<FuncionarioPerfil>>;

    async fn update_password(&self, funcionario_id: i32, password_hash: &str) -> AppResult<()>;
}

pub struct PgFuncionarioRepository {
    pool: PgPool,
}

impl PgFuncionarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FUNCIONARIO_COLUMNS: &str =
    "id, usuario, password, perfil_persona_id, doble_autenticacion, estado";

const PERSONA_COLUMNS: &str = "id, nombre, paterno, materno, ci, celular, email, direccion";

#[async_trait]
impl FuncionarioRepository for PgFuncionarioRepository {
    async fn find_by_usuario(&self, usuario: &str) -> AppResult<Option<Funcionario>> {
        let funcionario = sqlx::query_as::<_, Funcionario>(&format!(
            "SELECT {} FROM funcionarios WHERE usuario = $1 AND estado != 0",
            FUNCIONARIO_COLUMNS
        ))
        .bind(usuario)
        .fetch_optional(&self.pool)
        .await?;

        Ok(funcionario)
    }

    async fn find_by_persona(&self, persona_id: i32) -> AppResult<Option<Funcionario>> {
        let funcionario = sqlx::query_as::<_, Funcionario>(&format!(
            "SELECT {} FROM funcionarios WHERE perfil_persona_id = $1 AND estado != 0 ORDER BY id DESC LIMIT 1",
            FUNCIONARIO_COLUMNS
        ))
        .bind(persona_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(funcionario)
    }

    async fn find_persona(&self, persona_id: i32) -> AppResult<Option<Persona>> {
        let persona = sqlx::query_as::<_, Persona>(&format!(
            "SELECT {} FROM perfil_personas WHERE id = $1",
            PERSONA_COLUMNS
        ))
        .bind(persona_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(persona)
    }

    async fn find_persona_by_ci(&self, ci: &str) -> AppResult<Option<Persona>> {
        let persona = sqlx::query_as::<_, Persona>(&format!(
            "SELECT {} FROM perfil_personas WHERE ci = $1 ORDER BY id DESC LIMIT 1",
            PERSONA_COLUMNS
        ))
        .bind(ci)
        .fetch_optional(&self.pool)
        .await?;

        Ok(persona)
    }

    async fn perfil(&self, funcionario_id: i32) -> AppResult<Option<FuncionarioPerfil>> {
        let perfil = sqlx::query_as::<_, FuncionarioPerfil>(
            r#"
            SELECT
                f.id AS funcionario_id,
                p.id AS persona_id,
                f.usuario,
                p.nombre,
                p.paterno,
                p.materno,
                p.ci,
                p.celular,
                p.email,
                c.nombre AS cargo,
                i.id AS institucion_id,
                i.nombre AS institucion
            FROM funcionarios f
            INNER JOIN perfil_personas p ON p.id = f.perfil_persona_id
            LEFT JOIN cargos c ON c.id = f.cargo_id
            LEFT JOIN instituciones i ON i.id = f.institucion_id
            WHERE f.id = $1
            "#,
        )
        .bind(funcionario_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(perfil)
    }

    async fn update_password(&self, funcionario_id: i32, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE funcionarios SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(funcionario_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
