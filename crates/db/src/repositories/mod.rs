//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&mut PgConnection` as the first argument, so the same
//! method runs inside or outside a transaction.

pub mod image_repo;
pub mod image_roi_repo;
pub mod mosaic_image_repo;
pub mod mosaic_map_repo;
pub mod project_repo;
pub mod user_repo;

pub use image_repo::ImageRepo;
pub use image_roi_repo::ImageRoiRepo;
pub use mosaic_image_repo::MosaicImageRepo;
pub use mosaic_map_repo::MosaicMapRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
