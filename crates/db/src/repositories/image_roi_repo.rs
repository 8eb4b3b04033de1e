//! Repository for the `images_roi` table.

use mosaify_core::types::DbId;
use sqlx::PgConnection;

use crate::models::image_roi::{CreateImageRoi, ImageRoi, UpdateImageRoi};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, images_id, x, y, width, height";

/// Provides CRUD operations for image regions of interest.
pub struct ImageRoiRepo;

impl ImageRoiRepo {
    /// Insert a new region, returning the generated ID.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateImageRoi,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO images_roi (project_id, images_id, x, y, width, height)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.project_id)
        .bind(input.images_id)
        .bind(input.rect.x)
        .bind(input.rect.y)
        .bind(input.rect.width)
        .bind(input.rect.height)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ImageRoi>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images_roi WHERE id = $1");
        sqlx::query_as::<_, ImageRoi>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Every region on an image, oldest first.
    pub async fn list_by_image(
        conn: &mut PgConnection,
        images_id: DbId,
    ) -> Result<Vec<ImageRoi>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images_roi WHERE images_id = $1 ORDER BY id");
        sqlx::query_as::<_, ImageRoi>(&query)
            .bind(images_id)
            .fetch_all(conn)
            .await
    }

    /// Replace a region's rectangle.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateImageRoi,
    ) -> Result<Option<ImageRoi>, sqlx::Error> {
        let query = format!(
            "UPDATE images_roi SET
                x = $2,
                y = $3,
                width = $4,
                height = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImageRoi>(&query)
            .bind(id)
            .bind(input.x)
            .bind(input.y)
            .bind(input.width)
            .bind(input.height)
            .fetch_optional(conn)
            .await
    }

    /// Delete a region by ID. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images_roi WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
