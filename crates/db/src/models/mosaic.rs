//! Per-project mosaic artifacts.
//!
//! A project has at most one of each; both tables are keyed by
//! `project_id` for every operation after creation.

use mosaify_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mosaic_images` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MosaicImage {
    pub id: DbId,
    pub project_id: DbId,
    pub rows: i32,
    pub cols: i32,
    pub comps: i32,
    #[serde(with = "mosaify_core::base64_data")]
    pub data: Vec<u8>,
}

/// A row from the `mosaic_maps` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct MosaicMap {
    pub id: DbId,
    pub project_id: DbId,
    pub map: String,
}
