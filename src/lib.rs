//!
//! A read-only data source that looks up a Redshift database user in the
//! system catalog and exposes its settings as computed attributes.
//!
//! The connection is supplied by the caller through the [`Database`] trait,
//! enable the `with-postgres` feature to use a `postgres` connection directly.
//!
//! ```rust,ignore
//! use redshift_provider::{pg::PostgresDB, UserDataSource};
//! use serde_json::json;
//!
//! let conn = postgres::Connection::connect(db_url, postgres::TlsMode::None)?;
//! let mut db = PostgresDB(&conn);
//! let data = UserDataSource::new().read(&mut db, &json!({"name": "Alice"}))?;
//! println!("{}", data.to_state());
//! ```
//!
use cfg_if::cfg_if;

cfg_if! {if #[cfg(feature = "with-postgres")]{
    pub mod pg;
}}

pub mod data_source;
mod database;
mod entity;
pub mod error;
pub mod resource_data;
pub mod schema;
pub mod users;

pub use data_source::UserDataSource;
pub use database::Database;
pub use entity::EntityManager;
pub use error::{
    DataError,
    DataSourceError,
    DbError,
    ParseError,
    ValidationError,
};
pub use redshift_dao::{
    Dao,
    FromDao,
    Rows,
    ToValue,
    Value,
};
pub use resource_data::ResourceData;
pub use schema::Schema;
pub use users::UserInfo;
