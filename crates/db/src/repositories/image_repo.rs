//! Repository for the `images` table.
//!
//! `data` is bound and fetched as `BYTEA` through sqlx's binary protocol;
//! the bytes are never escaped or reinterpreted.

use mosaify_core::image::ImageData;
use mosaify_core::types::DbId;
use sqlx::PgConnection;

use crate::models::image::Image;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, filename, rows, cols, comps, data";

/// Provides CRUD operations for images.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image into a project, returning the generated ID.
    pub async fn create(
        conn: &mut PgConnection,
        project_id: DbId,
        image: &impl ImageData,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO images (project_id, filename, rows, cols, comps, data)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(project_id)
        .bind(image.filename())
        .bind(image.rows())
        .bind(image.cols())
        .bind(image.comps())
        .bind(image.data())
        .fetch_one(conn)
        .await
    }

    /// Find an image by ID within a project.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
        project_id: DbId,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(conn)
            .await
    }

    /// Every image in a project, with payload, oldest first.
    pub async fn list_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Image>(&query)
            .bind(project_id)
            .fetch_all(conn)
            .await
    }

    /// Replace an image's filename, dimensions and payload.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        image: &impl ImageData,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "UPDATE images SET
                filename = $2,
                rows = $3,
                cols = $4,
                comps = $5,
                data = $6
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(image.filename())
        .bind(image.rows())
        .bind(image.cols())
        .bind(image.comps())
        .bind(image.data())
        .fetch_optional(conn)
        .await
    }

    /// Delete an image by ID, cascading to its regions. Returns `true` if a
    /// row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
