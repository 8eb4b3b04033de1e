//! A single owned database session.

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::error::{query_failed, StoreError, StoreResult};

/// Holds at most one live connection.
///
/// Dropping a `Session` closes the socket; [`Session::disconnect`] does the
/// same gracefully and can be called any number of times.
#[derive(Debug, Default)]
pub struct Session {
    conn: Option<PgConnection>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: PgConnection) -> Self {
        Self { conn: Some(conn) }
    }

    /// Open a session from a connection URL, replacing any existing one.
    pub async fn connect(&mut self, url: &str) -> StoreResult<()> {
        self.disconnect().await;
        let conn = PgConnection::connect(url)
            .await
            .map_err(|source| StoreError::Connection { source })?;
        tracing::info!("Database session opened");
        self.conn = Some(conn);
        Ok(())
    }

    /// Open a session from parsed options, replacing any existing one.
    pub async fn connect_with(&mut self, options: &PgConnectOptions) -> StoreResult<()> {
        self.disconnect().await;
        let conn = PgConnection::connect_with(options)
            .await
            .map_err(|source| StoreError::Connection { source })?;
        tracing::info!(
            host = options.get_host(),
            database = options.get_database().unwrap_or_default(),
            "Database session opened"
        );
        self.conn = Some(conn);
        Ok(())
    }

    /// Close the current session, if any.
    pub async fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                tracing::warn!(error = %e, "Error while closing database session");
            } else {
                tracing::info!("Database session closed");
            }
        }
    }

    /// Whether a live connection is held. A connection that failed at the
    /// transport level is dropped by [`Session::settle`], so this turns
    /// false after any [`StoreError::is_connection_lost`] error.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Borrow the live connection or fail with [`StoreError::NotConnected`].
    pub fn conn(&mut self) -> StoreResult<&mut PgConnection> {
        self.conn.as_mut().ok_or(StoreError::NotConnected)
    }

    /// Pass `result` through, dropping the connection when it reports a
    /// dead transport.
    pub(crate) fn settle<T>(&mut self, result: StoreResult<T>) -> StoreResult<T> {
        if let Err(e) = &result {
            if e.is_connection_lost() && self.conn.take().is_some() {
                tracing::warn!(error = %e, "Database connection lost, session dropped");
            }
        }
        result
    }

    /// Round-trip `SELECT 1` on the live connection.
    pub async fn health_check(&mut self) -> StoreResult<()> {
        let conn = self.conn()?;
        let result = crate::health_check(conn)
            .await
            .map_err(query_failed("Health Check"));
        self.settle(result)
    }
}
