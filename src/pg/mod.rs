use crate::{
    error::PlatformError,
    Database,
    DbError,
    Rows,
    Value,
};
use chrono::{
    DateTime,
    Duration,
    NaiveDate,
    NaiveDateTime,
    TimeZone,
    Utc,
};
use log::*;
use postgres::{
    self,
    types::{
        self,
        FromSql,
        IsNull,
        ToSql,
        Type,
    },
    GenericConnection,
};
use postgres_shared::{
    to_sql_checked,
    types::Kind,
};
use std::{
    error::Error,
    fmt,
};

/// `abstime`, the type of `pg_user_info.valuntil`
const ABSTIME_OID: u32 = 702;
/// `abstime` value meaning "no end", rendered by the server as `infinity`
const ABSTIME_INFINITY: i32 = 0x7FFF_FFFC;
const ABSTIME_INVALID: i32 = 0x7FFF_FFFE;
const ABSTIME_MINUS_INFINITY: i32 = i32::MIN;

/// A borrowed connection: a plain `Connection`, a pooled one or a `Transaction`
pub struct PostgresDB<'a>(pub &'a dyn GenericConnection);

impl<'a> Database for PostgresDB<'a> {
    fn execute_sql_with_return(&mut self, sql: &str, param: &[&Value]) -> Result<Rows, DbError> {
        let stmt = self
            .0
            .prepare(sql)
            .map_err(|e| PostgresError::SqlError(e, sql.to_string()))?;
        let pg_values = to_pg_values(param);
        let sql_types = to_sql_types(&pg_values);
        let rows = stmt
            .query(&sql_types)
            .map_err(|e| PostgresError::SqlError(e, sql.to_string()))?;
        let columns = rows.columns();
        let column_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
        let mut records = Rows::new(column_names);
        for r in rows.iter() {
            let mut record: Vec<Value> = vec![];
            for (i, column) in columns.iter().enumerate() {
                let value: Option<Result<OwnedPgValue, postgres::Error>> = r.get_opt(i);
                match value {
                    Some(Ok(value)) => record.push(value.0),
                    Some(Err(e)) => {
                        info!("column {:?} index: {}", column, i);
                        let msg = format!("Error converting column {:?} at index {}", column, i);
                        return Err(DbError::PlatformError(PlatformError::PostgresError(
                            PostgresError::GenericError(msg, e),
                        )));
                    }
                    None => {
                        record.push(Value::Nil); // keep the records aligned with the columns
                    }
                }
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn to_pg_values<'a>(values: &[&'a Value]) -> Vec<PgValue<'a>> {
    values.iter().map(|v| PgValue(v)).collect()
}

fn to_sql_types<'a>(values: &'a [PgValue]) -> Vec<&'a dyn ToSql> {
    values.iter().map(|v| v as &dyn ToSql).collect()
}

/// need to wrap Value in order to be able to implement ToSql trait for it
/// otherwise: error[E0117]: only traits defined in the current crate can be implemented for arbitrary types
/// For passing parameters, implement only ToSql
#[derive(Debug)]
pub struct PgValue<'a>(&'a Value);

/// For retrieval, implement only FromSql
#[derive(Debug)]
pub struct OwnedPgValue(Value);

impl<'a> ToSql for PgValue<'a> {
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        out: &mut Vec<u8>,
    ) -> Result<IsNull, Box<dyn Error + 'static + Sync + Send>> {
        match *self.0 {
            Value::Bool(ref v) => v.to_sql(ty, out),
            Value::Smallint(ref v) => v.to_sql(ty, out),
            Value::Int(ref v) => v.to_sql(ty, out),
            Value::Bigint(ref v) => v.to_sql(ty, out),
            Value::Text(ref v) => v.to_sql(ty, out),
            Value::DateTime(ref v) => v.to_sql(ty, out),
            Value::Timestamp(ref v) => v.to_sql(ty, out),
            Value::Nil => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool { true }
}

impl FromSql for OwnedPgValue {
    fn from_sql(ty: &Type, raw: &[u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        macro_rules! match_type {
            ($variant:ident) => {
                FromSql::from_sql(ty, raw).map(|v| OwnedPgValue(Value::$variant(v)))
            };
        }
        if ty.oid() == ABSTIME_OID {
            return abstime_from_sql(raw);
        }
        match *ty.kind() {
            Kind::Enum(_) => match_type!(Text),
            Kind::Simple => {
                match *ty {
                    types::BOOL => match_type!(Bool),
                    types::INT2 => match_type!(Smallint),
                    types::INT4 => match_type!(Int),
                    types::INT8 => match_type!(Bigint),
                    types::TEXT | types::VARCHAR | types::NAME | types::UNKNOWN => {
                        match_type!(Text)
                    }
                    types::BPCHAR => {
                        let v: String = FromSql::from_sql(&types::TEXT, raw)?;
                        Ok(OwnedPgValue(Value::Text(v.trim_end().to_string())))
                    }
                    types::TIMESTAMP => {
                        let v: NaiveDateTime = FromSql::from_sql(ty, raw)?;
                        Ok(OwnedPgValue(Value::DateTime(v)))
                    }
                    types::TIMESTAMPTZ => {
                        let v: DateTime<Utc> = FromSql::from_sql(ty, raw)?;
                        Ok(OwnedPgValue(Value::Timestamp(v)))
                    }
                    _ => Err(Box::new(PostgresError::UnsupportedType(ty.name().to_string()))),
                }
            }
            _ => Err(Box::new(PostgresError::UnsupportedType(ty.name().to_string()))),
        }
    }

    fn accepts(_ty: &Type) -> bool { true }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(OwnedPgValue(Value::Nil))
    }

    fn from_sql_nullable(
        ty: &Type,
        raw: Option<&[u8]>,
    ) -> Result<Self, Box<dyn Error + Sync + Send>> {
        match raw {
            Some(raw) => Self::from_sql(ty, raw),
            None => Self::from_sql_null(ty),
        }
    }
}

/// `abstime` is sent as seconds since the epoch, with reserved values at both ends
fn abstime_from_sql(raw: &[u8]) -> Result<OwnedPgValue, Box<dyn Error + Sync + Send>> {
    if raw.len() != 4 {
        return Err(Box::new(PostgresError::UnsupportedType(format!(
            "abstime of {} bytes",
            raw.len()
        ))));
    }
    let seconds = i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
    let value = match seconds {
        ABSTIME_INFINITY => Value::Text("infinity".to_string()),
        ABSTIME_MINUS_INFINITY => Value::Text("-infinity".to_string()),
        ABSTIME_INVALID => Value::Text("invalid".to_string()),
        _ => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or_else(|| PostgresError::UnsupportedType("abstime".to_string()))?;
            let at = epoch + Duration::seconds(i64::from(seconds));
            Value::Timestamp(Utc.from_utc_datetime(&at))
        }
    };
    Ok(OwnedPgValue(value))
}

#[derive(Debug)]
pub enum PostgresError {
    GenericError(String, postgres::Error),
    SqlError(postgres::Error, String),
    UnsupportedType(String),
}

impl From<postgres::Error> for PostgresError {
    fn from(e: postgres::Error) -> Self { PostgresError::GenericError("From conversion".into(), e) }
}

impl Error for PostgresError {}

impl fmt::Display for PostgresError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PostgresError::GenericError(msg, e) => write!(f, "{}: {}", msg, e),
            PostgresError::SqlError(e, sql) => write!(f, "{}\n{}", e, sql),
            PostgresError::UnsupportedType(ty) => write!(f, "Unsupported column type: {}", ty),
        }
    }
}
