//! Typed errors for the entity store.
//!
//! Repositories return raw [`sqlx::Error`]; [`crate::EntityStore`] converts
//! them here, tagging each failure with the operation name and the call site
//! that issued the statement.

use std::panic::Location;

use mosaify_core::types::DbId;

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An operation was attempted with no open session.
    #[error("Not connected to a database")]
    NotConnected,

    /// The session could not be established.
    #[error("Connection failed: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// The transport failed on an established session.
    #[error("Connection lost during {operation} at {location}: {source}")]
    ConnectionLost {
        operation: &'static str,
        location: &'static Location<'static>,
        #[source]
        source: sqlx::Error,
    },

    /// A read, update or exists-style lookup matched zero rows.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The database rejected the statement.
    #[error("Error during operation: {operation} at {location}: {source}")]
    Query {
        operation: &'static str,
        location: &'static Location<'static>,
        #[source]
        source: sqlx::Error,
    },

    /// A batch insert failed and the whole batch was rolled back.
    #[error("{operation} rolled back at item {index} ({location}): {source}")]
    Transaction {
        operation: &'static str,
        index: usize,
        location: &'static Location<'static>,
        #[source]
        source: sqlx::Error,
    },
}

/// Coarse category of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotConnected,
    ConnectionFailed,
    ConnectionLost,
    NotFound,
    QueryFailed,
    TransactionFailed,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotConnected => ErrorKind::NotConnected,
            StoreError::Connection { .. } => ErrorKind::ConnectionFailed,
            StoreError::ConnectionLost { .. } => ErrorKind::ConnectionLost,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Query { .. } => ErrorKind::QueryFailed,
            StoreError::Transaction { .. } => ErrorKind::TransactionFailed,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// The statement was blocked by a foreign key: a missing parent on
    /// insert, or a RESTRICT dependent on delete.
    pub fn is_foreign_key_violation(&self) -> bool {
        self.sqlstate() == Some(FOREIGN_KEY_VIOLATION)
    }

    pub fn is_unique_violation(&self) -> bool {
        self.sqlstate() == Some(UNIQUE_VIOLATION)
    }

    /// The transport is gone and the session that raised this is unusable.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            StoreError::ConnectionLost { .. } => true,
            StoreError::Transaction { source, .. } => is_transport_error(source),
            _ => false,
        }
    }

    /// The underlying database error, if this failure carries one.
    pub fn sqlx_error(&self) -> Option<&sqlx::Error> {
        match self {
            StoreError::Connection { source }
            | StoreError::ConnectionLost { source, .. }
            | StoreError::Query { source, .. }
            | StoreError::Transaction { source, .. } => Some(source),
            StoreError::NotConnected | StoreError::NotFound { .. } => None,
        }
    }

    fn sqlstate(&self) -> Option<&'static str> {
        let Some(sqlx::Error::Database(db_err)) = self.sqlx_error() else {
            return None;
        };
        match db_err.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => Some(FOREIGN_KEY_VIOLATION),
            Some(UNIQUE_VIOLATION) => Some(UNIQUE_VIOLATION),
            _ => None,
        }
    }

    /// Classify a driver error raised while running `operation`.
    pub(crate) fn from_sqlx(
        operation: &'static str,
        source: sqlx::Error,
        location: &'static Location<'static>,
    ) -> Self {
        if is_transport_error(&source) {
            StoreError::ConnectionLost {
                operation,
                location,
                source,
            }
        } else {
            StoreError::Query {
                operation,
                location,
                source,
            }
        }
    }
}

/// Build a `map_err` adapter that records the caller's location.
///
/// Call it at the statement site:
/// `UserRepo::create(conn, &input).await.map_err(query_failed("Create User"))?`
#[track_caller]
pub(crate) fn query_failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    let location = Location::caller();
    move |source| StoreError::from_sqlx(operation, source, location)
}

/// Like [`query_failed`], for the `index`-th insert of a rolled-back batch.
#[track_caller]
pub(crate) fn batch_failed(
    operation: &'static str,
    index: usize,
) -> impl FnOnce(sqlx::Error) -> StoreError {
    let location = Location::caller();
    move |source| StoreError::Transaction {
        operation,
        index,
        location,
        source,
    }
}

/// Driver-level I/O failures, plus server errors in SQLSTATE class 08
/// (connection exception) and 57P (the backend was shut down or terminated).
fn is_transport_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.starts_with("08") || code.starts_with("57P")),
        _ => false,
    }
}
