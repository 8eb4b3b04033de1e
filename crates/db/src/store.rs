//! The entity store facade.
//!
//! [`EntityStore`] owns one [`Session`] and turns every call into a single
//! parameterized statement (or, for the two batch inserts, one transaction).
//! Methods take `&mut self`: one store issues one statement at a time, and
//! independent sessions are independent stores.

use mosaify_core::image::ImageData;
use mosaify_core::types::DbId;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::error::{batch_failed, query_failed, StoreError, StoreResult};
use crate::models::image::Image;
use crate::models::image_roi::{CreateImageRoi, ImageRoi, UpdateImageRoi};
use crate::models::mosaic::{MosaicImage, MosaicMap};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::{
    ImageRepo, ImageRoiRepo, MosaicImageRepo, MosaicMapRepo, ProjectRepo, UserRepo,
};
use crate::schema;
use crate::session::Session;

#[derive(Debug, Default)]
pub struct EntityStore {
    session: Session,
}

impl EntityStore {
    /// A store with no open session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store bound to an already-open connection.
    pub fn with_connection(conn: PgConnection) -> Self {
        Self {
            session: Session::from_connection(conn),
        }
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Connect to `url`, closing any previous session first.
    pub async fn connect(&mut self, url: &str) -> StoreResult<()> {
        self.session.connect(url).await
    }

    pub async fn connect_with(&mut self, options: &PgConnectOptions) -> StoreResult<()> {
        self.session.connect_with(options).await
    }

    /// Close the session. Safe to call when not connected.
    pub async fn disconnect(&mut self) {
        self.session.disconnect().await;
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub async fn health_check(&mut self) -> StoreResult<()> {
        self.session.health_check().await
    }

    // -----------------------------------------------------------------------
    // Schema
    // -----------------------------------------------------------------------

    /// Create all tables. With `reset`, drop them (and their data) first.
    pub async fn create_tables(&mut self, reset: bool) -> StoreResult<()> {
        if reset {
            let conn = self.session.conn()?;
            let result = schema::drop_tables(conn)
                .await
                .map_err(query_failed("Drop Tables"));
            self.session.settle(result)?;
            tracing::info!("Dropped all tables");
        }
        let conn = self.session.conn()?;
        let result = schema::create_tables(conn)
            .await
            .map_err(query_failed("Create Tables"));
        self.session.settle(result)?;
        tracing::info!(reset, tables = schema::TABLES.len(), "Schema ready");
        Ok(())
    }

    /// Drop and recreate every table.
    pub async fn reset(&mut self) -> StoreResult<()> {
        self.create_tables(true).await
    }

    /// Run unparameterized SQL. Schema maintenance only; never pass
    /// untrusted input.
    pub async fn execute_raw(&mut self, sql: &str) -> StoreResult<()> {
        let conn = self.session.conn()?;
        let result = sqlx::raw_sql(sql)
            .execute(conn)
            .await
            .map_err(query_failed("Execute SQL"));
        self.session.settle(result)?;
        Ok(())
    }

    /// `(table, row count)` for every table, in creation order.
    pub async fn table_row_counts(&mut self) -> StoreResult<Vec<(&'static str, i64)>> {
        let conn = self.session.conn()?;
        let result = schema::row_counts(conn)
            .await
            .map_err(query_failed("Count Rows"));
        self.session.settle(result)
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn create_user(&mut self, input: &CreateUser) -> StoreResult<DbId> {
        let conn = self.session.conn()?;
        let result = UserRepo::create(conn, input)
            .await
            .map_err(query_failed("Create User"));
        let id = self.session.settle(result)?;
        tracing::debug!(user_id = id, "Created user");
        Ok(id)
    }

    pub async fn read_user(&mut self, id: DbId) -> StoreResult<User> {
        let conn = self.session.conn()?;
        let result = UserRepo::find_by_id(conn, id)
            .await
            .map_err(query_failed("Read User"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound { entity: "user", id })
    }

    pub async fn update_user(&mut self, id: DbId, input: &UpdateUser) -> StoreResult<User> {
        let conn = self.session.conn()?;
        let result = UserRepo::update(conn, id, input)
            .await
            .map_err(query_failed("Update User"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound { entity: "user", id })
    }

    /// Delete a user and, by cascade, all of their projects.
    pub async fn delete_user(&mut self, id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = UserRepo::delete(conn, id)
            .await
            .map_err(query_failed("Delete User"));
        let deleted = self.session.settle(result)?;
        tracing::debug!(user_id = id, deleted, "Deleted user");
        Ok(deleted)
    }

    /// IDs of the user's projects, oldest first.
    pub async fn list_project_ids(&mut self, user_id: DbId) -> StoreResult<Vec<DbId>> {
        let conn = self.session.conn()?;
        let result = ProjectRepo::list_ids_by_user(conn, user_id)
            .await
            .map_err(query_failed("Read Projects"));
        self.session.settle(result)
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub async fn create_project(&mut self, input: &CreateProject) -> StoreResult<DbId> {
        let conn = self.session.conn()?;
        let result = ProjectRepo::create(conn, input)
            .await
            .map_err(query_failed("Create Project"));
        let id = self.session.settle(result)?;
        tracing::debug!(project_id = id, user_id = input.user_id, "Created project");
        Ok(id)
    }

    pub async fn read_project(&mut self, id: DbId) -> StoreResult<Project> {
        let conn = self.session.conn()?;
        let result = ProjectRepo::find_by_id(conn, id)
            .await
            .map_err(query_failed("Read Project"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "project",
                id,
            })
    }

    pub async fn update_project(
        &mut self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Project> {
        let conn = self.session.conn()?;
        let result = ProjectRepo::update(conn, id, input)
            .await
            .map_err(query_failed("Update Project"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "project",
                id,
            })
    }

    /// Delete a project and, by cascade, its images and regions.
    ///
    /// Fails with a foreign key violation while the project still has a
    /// mosaic image or mosaic map.
    pub async fn delete_project(&mut self, id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = ProjectRepo::delete(conn, id)
            .await
            .map_err(query_failed("Delete Project"));
        let deleted = self.session.settle(result)?;
        tracing::debug!(project_id = id, deleted, "Deleted project");
        Ok(deleted)
    }

    /// Every image in the project with its payload, oldest first.
    pub async fn list_images(&mut self, project_id: DbId) -> StoreResult<Vec<Image>> {
        let conn = self.session.conn()?;
        let result = ImageRepo::list_by_project(conn, project_id)
            .await
            .map_err(query_failed("Read Images"));
        self.session.settle(result)
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    pub async fn create_image(
        &mut self,
        project_id: DbId,
        image: &impl ImageData,
    ) -> StoreResult<DbId> {
        let conn = self.session.conn()?;
        let result = ImageRepo::create(conn, project_id, image)
            .await
            .map_err(query_failed("Create Image"));
        let id = self.session.settle(result)?;
        tracing::debug!(
            image_id = id,
            project_id,
            bytes = image.data().len(),
            "Created image"
        );
        Ok(id)
    }

    /// Insert every image in one transaction. Either all rows are written
    /// and their IDs returned in input order, or none are.
    pub async fn create_images<I: ImageData>(
        &mut self,
        project_id: DbId,
        images: &[I],
    ) -> StoreResult<Vec<DbId>> {
        let conn = self.session.conn()?;
        let result = insert_image_batch(conn, project_id, images).await;
        let ids = self.session.settle(result)?;
        tracing::debug!(project_id, count = ids.len(), "Created image batch");
        Ok(ids)
    }

    /// Read an image, which must belong to `project_id`.
    pub async fn read_image(&mut self, id: DbId, project_id: DbId) -> StoreResult<Image> {
        let conn = self.session.conn()?;
        let result = ImageRepo::find_by_id(conn, id, project_id)
            .await
            .map_err(query_failed("Read Image"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound { entity: "image", id })
    }

    pub async fn update_image(&mut self, id: DbId, image: &impl ImageData) -> StoreResult<()> {
        let conn = self.session.conn()?;
        let result = ImageRepo::update(conn, id, image)
            .await
            .map_err(query_failed("Update Image"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound { entity: "image", id })?;
        Ok(())
    }

    /// Delete an image and, by cascade, its regions.
    pub async fn delete_image(&mut self, id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = ImageRepo::delete(conn, id)
            .await
            .map_err(query_failed("Delete Image"));
        self.session.settle(result)
    }

    // -----------------------------------------------------------------------
    // Image regions of interest
    // -----------------------------------------------------------------------

    pub async fn create_image_roi(&mut self, input: &CreateImageRoi) -> StoreResult<DbId> {
        let conn = self.session.conn()?;
        let result = ImageRoiRepo::create(conn, input)
            .await
            .map_err(query_failed("Create Image ROI"));
        self.session.settle(result)
    }

    /// Insert every region in one transaction; all or nothing.
    pub async fn create_image_rois(
        &mut self,
        inputs: &[CreateImageRoi],
    ) -> StoreResult<Vec<DbId>> {
        let conn = self.session.conn()?;
        let result = insert_roi_batch(conn, inputs).await;
        self.session.settle(result)
    }

    pub async fn read_image_roi(&mut self, id: DbId) -> StoreResult<ImageRoi> {
        let conn = self.session.conn()?;
        let result = ImageRoiRepo::find_by_id(conn, id)
            .await
            .map_err(query_failed("Read Image ROI"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "image ROI",
                id,
            })
    }

    pub async fn update_image_roi(
        &mut self,
        id: DbId,
        input: &UpdateImageRoi,
    ) -> StoreResult<ImageRoi> {
        let conn = self.session.conn()?;
        let result = ImageRoiRepo::update(conn, id, input)
            .await
            .map_err(query_failed("Update Image ROI"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "image ROI",
                id,
            })
    }

    pub async fn delete_image_roi(&mut self, id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = ImageRoiRepo::delete(conn, id)
            .await
            .map_err(query_failed("Delete Image ROI"));
        self.session.settle(result)
    }

    /// Regions on an image, oldest first.
    pub async fn list_image_rois(&mut self, images_id: DbId) -> StoreResult<Vec<ImageRoi>> {
        let conn = self.session.conn()?;
        let result = ImageRoiRepo::list_by_image(conn, images_id)
            .await
            .map_err(query_failed("Read Image ROIs"));
        self.session.settle(result)
    }

    // -----------------------------------------------------------------------
    // Mosaic image (one per project)
    // -----------------------------------------------------------------------

    /// Store a project's mosaic image. The image's filename is ignored.
    pub async fn create_mosaic_image(
        &mut self,
        project_id: DbId,
        image: &impl ImageData,
    ) -> StoreResult<DbId> {
        let conn = self.session.conn()?;
        let result = MosaicImageRepo::create(conn, project_id, image)
            .await
            .map_err(query_failed("Create Mosaic Image"));
        let id = self.session.settle(result)?;
        tracing::debug!(mosaic_image_id = id, project_id, "Created mosaic image");
        Ok(id)
    }

    /// Read a project's mosaic image. Not-found is reported against the
    /// project ID.
    pub async fn read_mosaic_image(&mut self, project_id: DbId) -> StoreResult<MosaicImage> {
        let conn = self.session.conn()?;
        let result = MosaicImageRepo::find_by_project(conn, project_id)
            .await
            .map_err(query_failed("Read Mosaic Image"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "mosaic image for project",
                id: project_id,
            })
    }

    pub async fn update_mosaic_image(
        &mut self,
        project_id: DbId,
        image: &impl ImageData,
    ) -> StoreResult<()> {
        let conn = self.session.conn()?;
        let result = MosaicImageRepo::update(conn, project_id, image)
            .await
            .map_err(query_failed("Update Mosaic Image"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "mosaic image for project",
                id: project_id,
            })?;
        Ok(())
    }

    pub async fn delete_mosaic_image(&mut self, project_id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = MosaicImageRepo::delete(conn, project_id)
            .await
            .map_err(query_failed("Delete Mosaic Image"));
        self.session.settle(result)
    }

    pub async fn mosaic_image_exists(&mut self, project_id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = MosaicImageRepo::count_by_project(conn, project_id)
            .await
            .map_err(query_failed("Mosaic Image Exists"));
        let count = self.session.settle(result)?;
        Ok(count > 0)
    }

    // -----------------------------------------------------------------------
    // Mosaic map (one per project)
    // -----------------------------------------------------------------------

    pub async fn create_mosaic_map(&mut self, project_id: DbId, map: &str) -> StoreResult<DbId> {
        let conn = self.session.conn()?;
        let result = MosaicMapRepo::create(conn, project_id, map)
            .await
            .map_err(query_failed("Create Mosaic Map"));
        let id = self.session.settle(result)?;
        tracing::debug!(mosaic_map_id = id, project_id, "Created mosaic map");
        Ok(id)
    }

    pub async fn read_mosaic_map(&mut self, project_id: DbId) -> StoreResult<MosaicMap> {
        let conn = self.session.conn()?;
        let result = MosaicMapRepo::find_by_project(conn, project_id)
            .await
            .map_err(query_failed("Read Mosaic Map"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "mosaic map for project",
                id: project_id,
            })
    }

    pub async fn update_mosaic_map(
        &mut self,
        project_id: DbId,
        map: &str,
    ) -> StoreResult<MosaicMap> {
        let conn = self.session.conn()?;
        let result = MosaicMapRepo::update(conn, project_id, map)
            .await
            .map_err(query_failed("Update Mosaic Map"));
        self.session.settle(result)?
            .ok_or(StoreError::NotFound {
                entity: "mosaic map for project",
                id: project_id,
            })
    }

    pub async fn delete_mosaic_map(&mut self, project_id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = MosaicMapRepo::delete(conn, project_id)
            .await
            .map_err(query_failed("Delete Mosaic Map"));
        self.session.settle(result)
    }

    pub async fn mosaic_map_exists(&mut self, project_id: DbId) -> StoreResult<bool> {
        let conn = self.session.conn()?;
        let result = MosaicMapRepo::count_by_project(conn, project_id)
            .await
            .map_err(query_failed("Mosaic Map Exists"));
        let count = self.session.settle(result)?;
        Ok(count > 0)
    }
}

/// One transaction; rolls back and reports the index of the first failed insert.
async fn insert_image_batch<I: ImageData>(
    conn: &mut PgConnection,
    project_id: DbId,
    images: &[I],
) -> StoreResult<Vec<DbId>> {
    let mut tx = conn
        .begin()
        .await
        .map_err(query_failed("Create Images - BEGIN"))?;

    let mut ids = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        match ImageRepo::create(&mut *tx, project_id, image).await {
            Ok(id) => ids.push(id),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    project_id,
                    index,
                    "Image batch failed, rolling back"
                );
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(error = %rollback, "Rollback failed");
                }
                return Err(batch_failed("Create Images", index)(e));
            }
        }
    }

    tx.commit()
        .await
        .map_err(query_failed("Create Images - COMMIT"))?;
    Ok(ids)
}

async fn insert_roi_batch(
    conn: &mut PgConnection,
    inputs: &[CreateImageRoi],
) -> StoreResult<Vec<DbId>> {
    let mut tx = conn
        .begin()
        .await
        .map_err(query_failed("Create Image ROIs - BEGIN"))?;

    let mut ids = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        match ImageRoiRepo::create(&mut *tx, input).await {
            Ok(id) => ids.push(id),
            Err(e) => {
                tracing::warn!(error = %e, index, "Region batch failed, rolling back");
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(error = %rollback, "Rollback failed");
                }
                return Err(batch_failed("Create Image ROIs", index)(e));
            }
        }
    }

    tx.commit()
        .await
        .map_err(query_failed("Create Image ROIs - COMMIT"))?;
    Ok(ids)
}
