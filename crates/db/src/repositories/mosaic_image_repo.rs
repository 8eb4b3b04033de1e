//! Repository for the `mosaic_images` table, keyed by project.

use mosaify_core::image::ImageData;
use mosaify_core::types::DbId;
use sqlx::PgConnection;

use crate::models::mosaic::MosaicImage;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, rows, cols, comps, data";

/// Provides CRUD operations for a project's mosaic image.
pub struct MosaicImageRepo;

impl MosaicImageRepo {
    /// Insert the mosaic image for a project, returning the generated ID.
    ///
    /// The image's filename is not stored. Fails with a unique violation if
    /// the project already has one.
    pub async fn create(
        conn: &mut PgConnection,
        project_id: DbId,
        image: &impl ImageData,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO mosaic_images (project_id, rows, cols, comps, data)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(project_id)
        .bind(image.rows())
        .bind(image.cols())
        .bind(image.comps())
        .bind(image.data())
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Option<MosaicImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mosaic_images WHERE project_id = $1");
        sqlx::query_as::<_, MosaicImage>(&query)
            .bind(project_id)
            .fetch_optional(conn)
            .await
    }

    /// Replace the dimensions and payload of a project's mosaic image.
    ///
    /// Returns `None` if the project has no mosaic image.
    pub async fn update(
        conn: &mut PgConnection,
        project_id: DbId,
        image: &impl ImageData,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "UPDATE mosaic_images SET
                rows = $2,
                cols = $3,
                comps = $4,
                data = $5
             WHERE project_id = $1
             RETURNING id",
        )
        .bind(project_id)
        .bind(image.rows())
        .bind(image.cols())
        .bind(image.comps())
        .bind(image.data())
        .fetch_optional(conn)
        .await
    }

    /// Delete a project's mosaic image. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, project_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM mosaic_images WHERE project_id = $1")
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mosaic_images WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(conn)
            .await
    }
}
