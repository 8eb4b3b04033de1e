#![allow(dead_code)]

use mosaify_core::image::ImagePayload;
use mosaify_core::types::DbId;
use mosaify_db::models::project::CreateProject;
use mosaify_db::models::user::CreateUser;
use mosaify_db::EntityStore;
use sqlx::PgPool;

/// Hand one connection from the per-test pool to a store and create the
/// schema on it.
pub async fn store(pool: &PgPool) -> EntityStore {
    let conn = pool.acquire().await.unwrap().detach();
    let mut store = EntityStore::with_connection(conn);
    store.create_tables(false).await.unwrap();
    store
}

pub fn new_user(email: &str) -> CreateUser {
    CreateUser::new(email, "Test", "User")
}

pub fn new_project(user_id: DbId, name: &str) -> CreateProject {
    CreateProject {
        user_id,
        project_name: name.to_string(),
    }
}

pub fn new_image(filename: &str, data: Vec<u8>) -> ImagePayload {
    ImagePayload::new(filename, 10, 20, 3, data)
}

/// Create a user with one project, returning `(user_id, project_id)`.
pub async fn seed_project(store: &mut EntityStore) -> (DbId, DbId) {
    let user_id = store.create_user(&new_user("owner@example.com")).await.unwrap();
    let project_id = store
        .create_project(&new_project(user_id, "Seed Project"))
        .await
        .unwrap();
    (user_id, project_id)
}
