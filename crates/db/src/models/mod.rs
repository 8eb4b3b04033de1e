//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO carrying every mutable column (updates
//!   replace, they do not patch)

pub mod image;
pub mod image_roi;
pub mod mosaic;
pub mod project;
pub mod user;
