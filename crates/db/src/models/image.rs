//! Source image model.
//!
//! Inserts take any [`ImageData`]; reads come back as [`Image`], which is
//! itself an [`ImageData`] and can be written straight back.

use mosaify_core::image::ImageData;
use mosaify_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub project_id: DbId,
    pub filename: String,
    pub rows: i32,
    pub cols: i32,
    pub comps: i32,
    #[serde(with = "mosaify_core::base64_data")]
    pub data: Vec<u8>,
}

impl ImageData for Image {
    fn filename(&self) -> &str {
        &self.filename
    }
    fn rows(&self) -> i32 {
        self.rows
    }
    fn cols(&self) -> i32 {
        self.cols
    }
    fn comps(&self) -> i32 {
        self.comps
    }
    fn data(&self) -> &[u8] {
        &self.data
    }
}
