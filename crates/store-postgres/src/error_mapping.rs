// sqlx::Error -> StorageError mapping, in the style of distinguishing well-known SQLSTATE codes
// from opaque connection/protocol failures (spec section 7: StorageError wraps "underlying store
// fails").

use queue_core::error::StorageError;

pub fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => StorageError::new(format!(
                        "unique constraint violation: {}",
                        db_err.message()
                    )),
                    "23503" => StorageError::new(format!(
                        "foreign key constraint violation: {}",
                        db_err.message()
                    )),
                    "55P03" => {
                        StorageError::new(format!("lock not available: {}", db_err.message()))
                    }
                    other => StorageError::new(format!(
                        "database error [{other}]: {}",
                        db_err.message()
                    )),
                }
            } else {
                StorageError::new(format!("database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => StorageError::new("row not found"),
        sqlx::Error::ColumnNotFound(col) => StorageError::new(format!("column not found: {col}")),
        other => StorageError::new(other.to_string()),
    }
}
