//! Repository for the `mosaic_maps` table, keyed by project.

use mosaify_core::types::DbId;
use sqlx::PgConnection;

use crate::models::mosaic::MosaicMap;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, map";

/// Provides CRUD operations for a project's mosaic map.
pub struct MosaicMapRepo;

impl MosaicMapRepo {
    /// Insert the mosaic map for a project, returning the generated ID.
    pub async fn create(
        conn: &mut PgConnection,
        project_id: DbId,
        map: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO mosaic_maps (project_id, map) VALUES ($1, $2) RETURNING id",
        )
        .bind(project_id)
        .bind(map)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Option<MosaicMap>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mosaic_maps WHERE project_id = $1");
        sqlx::query_as::<_, MosaicMap>(&query)
            .bind(project_id)
            .fetch_optional(conn)
            .await
    }

    /// Replace a project's mosaic map.
    ///
    /// Returns `None` if the project has no mosaic map.
    pub async fn update(
        conn: &mut PgConnection,
        project_id: DbId,
        map: &str,
    ) -> Result<Option<MosaicMap>, sqlx::Error> {
        let query = format!(
            "UPDATE mosaic_maps SET map = $2 WHERE project_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MosaicMap>(&query)
            .bind(project_id)
            .bind(map)
            .fetch_optional(conn)
            .await
    }

    /// Delete a project's mosaic map. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, project_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM mosaic_maps WHERE project_id = $1")
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mosaic_maps WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(conn)
            .await
    }
}
