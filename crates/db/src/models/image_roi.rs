//! Image region-of-interest model and DTOs.

use mosaify_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `images_roi` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ImageRoi {
    pub id: DbId,
    pub project_id: DbId,
    pub images_id: DbId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoiRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl ImageRoi {
    pub fn rect(&self) -> RoiRect {
        RoiRect::new(self.x, self.y, self.width, self.height)
    }
}

/// DTO for creating a new region of interest.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImageRoi {
    pub project_id: DbId,
    pub images_id: DbId,
    #[serde(flatten)]
    pub rect: RoiRect,
}

/// DTO for moving or resizing a region. Both parents are fixed at creation.
pub type UpdateImageRoi = RoiRect;
