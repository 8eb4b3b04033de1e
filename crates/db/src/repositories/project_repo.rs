//! Repository for the `projecttable` table.

use mosaify_core::types::DbId;
use sqlx::PgConnection;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, project_name";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the generated ID.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateProject,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO projecttable (user_id, project_name)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.project_name)
        .fetch_one(conn)
        .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projecttable WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// IDs of every project owned by a user, oldest first.
    pub async fn list_ids_by_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM projecttable WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(conn)
            .await
    }

    /// Rename a project.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projecttable SET project_name = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.project_name)
            .fetch_optional(conn)
            .await
    }

    /// Delete a project by ID. Returns `true` if a row was removed.
    ///
    /// Images and regions cascade; a mosaic image or map referencing the
    /// project makes this fail with a foreign key violation.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projecttable WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
