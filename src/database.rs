use crate::{
    DbError,
    Rows,
    Value,
};

/// A connection that can run a parameterized statement and hand back its rows.
///
/// The connection is owned by the caller; implementors must not keep
/// statements or rows around after the call returns.
pub trait Database {
    fn execute_sql_with_return(&mut self, sql: &str, param: &[&Value]) -> Result<Rows, DbError>;
}
