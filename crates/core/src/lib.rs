//! Shared types for the mosaify workspace.
//!
//! Kept free of any database dependency so callers can describe images
//! without pulling in the store.

pub mod base64_data;
pub mod image;
pub mod types;
