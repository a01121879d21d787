//! Conversions from external infrastructure errors into domain errors.

use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;
use salonkit_domain::SalonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SalonError);

impl From<InfraError> for SalonError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SalonError> for InfraError {
    fn from(value: SalonError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSalonError {
    fn into_salon(self) -> SalonError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SalonError */
/* -------------------------------------------------------------------------- */

impl IntoSalonError for SqlError {
    fn into_salon(self) -> SalonError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => SalonError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        SalonError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => SalonError::DuplicateEntry(message),
                    (ErrorCode::ConstraintViolation, 787) => SalonError::Database(format!(
                        "foreign key constraint violation: {message}"
                    )),
                    _ => SalonError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => SalonError::Database("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                SalonError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SalonError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => SalonError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                SalonError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => {
                SalonError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => SalonError::Database("invalid SQL query".into()),
            other => SalonError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_salon())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SalonError */
/* -------------------------------------------------------------------------- */

impl IntoSalonError for PoolError {
    fn into_salon(self) -> SalonError {
        SalonError::Database(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_salon())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
