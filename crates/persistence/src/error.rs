//! Translation of `sqlx` failures into [`StoreError`].

use domain::StoreError;

/// Maps a driver error to the store error shape used by the retry policy.
///
/// Database errors keep their SQLSTATE so the policy can match connection
/// and shutdown classes; transport errors are tagged as network failures.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::not_found("no rows returned"),
        sqlx::Error::PoolTimedOut => {
            StoreError::Timeout("pool timed out while waiting for an open connection".into())
        }
        sqlx::Error::PoolClosed => StoreError::Unavailable("connection pool is closed".into()),
        sqlx::Error::WorkerCrashed => {
            StoreError::Unavailable("database worker crashed".into())
        }
        sqlx::Error::Io(io) => StoreError::Unavailable(io.to_string()),
        sqlx::Error::Tls(tls) => StoreError::Unavailable(format!("tls: {}", tls)),
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned());
            let message = match db_err.constraint() {
                Some(constraint) if !db_err.message().contains(constraint) => {
                    format!("{} ({})", db_err.message(), constraint)
                }
                _ => db_err.message().to_string(),
            };
            if code.as_deref() == Some("42501") {
                return StoreError::PermissionDenied(message);
            }
            StoreError::Database { code, message }
        }
        other => StoreError::Database {
            code: None,
            message: other.to_string(),
        },
    }
}
