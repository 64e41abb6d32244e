use cfg_if::cfg_if;
use redshift_dao::DaoError;
use std::num::ParseIntError;
use thiserror::Error;

cfg_if! {if #[cfg(feature = "with-postgres")]{
    use crate::pg::PostgresError;
}}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[cfg(feature = "with-postgres")]
    #[error("{0}")]
    PostgresError(#[from] PostgresError),
    #[error("Query failed: {message}\n{sql}")]
    QueryFailed { sql: String, message: String },
}

#[cfg(feature = "with-postgres")]
impl From<PostgresError> for DbError {
    fn from(e: PostgresError) -> Self { DbError::PlatformError(PlatformError::from(e)) }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    DataError(#[from] DataError),
    #[error("{0}")]
    PlatformError(#[from] PlatformError),
    #[error("{0}")]
    ConvertError(#[from] DaoError),
    #[error("{0}")]
    ParseError(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{kind} {key:?} not found in {view}")]
    NotFound {
        kind: &'static str,
        key: String,
        view: &'static str,
    },
    #[error("Zero record returned")]
    ZeroRecordReturned,
    #[error("More than one record returned")]
    MoreThan1RecordReturned,
}

/// A catalog value that could not be coerced into its attribute type
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unable to parse {column} value {value:?} as an integer: {source}")]
    InvalidInteger {
        column: &'static str,
        value: String,
        source: ParseIntError,
    },
    #[error("Unexpected {column} value {value:?}")]
    UnexpectedValue { column: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("The data source configuration must be an object, got {0}")]
    NotAnObject(String),
    #[error("The argument {0:?} is required, but no definition was found")]
    MissingRequired(String),
    #[error("An argument named {0:?} is not expected here")]
    UnsupportedArgument(String),
    #[error("{0:?}: this attribute is computed and cannot be configured")]
    ComputedArgument(String),
    #[error("{attribute:?}: expected {expected}, got {got}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        got: String,
    },
    #[error("expected {attribute} to not be any of [{}], got {value}", .denied.join(" "))]
    NotAllowed {
        attribute: String,
        denied: Vec<String>,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Db(#[from] DbError),
}
