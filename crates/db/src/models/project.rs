//! Project entity model and DTOs.

use mosaify_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projecttable` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub project_name: String,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub user_id: DbId,
    pub project_name: String,
}

/// DTO for renaming a project. The owner is fixed at creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub project_name: String,
}
