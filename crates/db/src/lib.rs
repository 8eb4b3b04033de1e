//! PostgreSQL data-access layer for users, projects, images, regions of
//! interest and per-project mosaic artifacts.
//!
//! [`EntityStore`] owns a single [`Session`] and exposes one method per
//! operation. The [`repositories`] underneath are stateless and usable
//! directly against any `&mut PgConnection` (including an open transaction).

pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod session;
pub mod store;

pub use error::{ErrorKind, StoreError, StoreResult};
pub use session::Session;
pub use store::EntityStore;

/// Run a trivial query to confirm the connection is alive.
pub async fn health_check(conn: &mut sqlx::PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(conn)
        .await?;
    Ok(())
}
