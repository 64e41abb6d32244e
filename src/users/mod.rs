//! Lookup of a single database user in the Redshift catalog.
use crate::{
    error::ParseError,
    schema::{
        USER_CONN_LIMIT_ATTR,
        USER_CREATE_DB_ATTR,
        USER_NAME_ATTR,
        USER_SESSION_TIMEOUT_ATTR,
        USER_SUPERUSER_ATTR,
        USER_SYSLOG_ACCESS_ATTR,
        USER_VALID_UNTIL_ATTR,
    },
    DataError,
    Database,
    DbError,
    EntityManager,
    ResourceData,
    Value,
};
use log::*;
use redshift_codegen::FromDao;
use serde::Serialize;

/// what `svv_user_info` reports, once coalesced, for a user without a connection limit
pub const CONNECTION_LIMIT_UNLIMITED: &str = "UNLIMITED";
/// the attribute value of an unlimited connection limit
pub const UNLIMITED_CONNECTIONS: i32 = -1;
/// the expiry of a password that never expires
pub const PASSWORD_NEVER_EXPIRES: &str = "infinity";

const USER_INFO_VIEW: &str = "svv_user_info";
const PASSWORD_INFO_VIEW: &str = "pg_user_info";

/// The settings of a database user, as read from the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub create_database: bool,
    pub superuser: bool,
    pub syslog_access: String,
    pub connection_limit: i32,
    pub session_timeout: i32,
    pub valid_until: String,
}

/// row of `svv_user_info`
#[derive(Debug, FromDao)]
struct UserInfoRow {
    user_id: i32,
    createdb: bool,
    superuser: bool,
    syslog_access: String,
    connection_limit: String,
    session_timeout: Value,
}

/// row of `pg_user_info`
#[derive(Debug, FromDao)]
struct PasswordRow {
    valid_until: Value,
}

fn user_info_sql() -> String {
    let columns = [
        "user_id".to_string(),
        "createdb".to_string(),
        "superuser".to_string(),
        "syslog_access".to_string(),
        format!(
            "COALESCE(connection_limit::TEXT, '{}') AS connection_limit",
            CONNECTION_LIMIT_UNLIMITED
        ),
        "session_timeout".to_string(),
    ];
    format!(
        "SELECT {} FROM {} WHERE user_name = $1",
        columns.join(","),
        USER_INFO_VIEW
    )
}

fn password_sql() -> String {
    format!(
        "SELECT COALESCE(valuntil, '{}') AS valid_until FROM {} WHERE usesysid = $1",
        PASSWORD_NEVER_EXPIRES, PASSWORD_INFO_VIEW
    )
}

/// Read the settings of the user named `user_name`.
///
/// `user_name` is matched as is, it is expected to be normalized already.
/// Both lookups run on `db`, any failure aborts the whole read.
pub fn read_user(db: &mut dyn Database, user_name: &str) -> Result<UserInfo, DbError> {
    info!("reading redshift user {:?}", user_name);
    let mut em = EntityManager(db);

    let row: Option<UserInfoRow> =
        em.execute_sql_with_maybe_one_return(&user_info_sql(), &[&user_name])?;
    let row = row.ok_or_else(|| {
        DataError::NotFound {
            kind: "user",
            key: user_name.to_string(),
            view: USER_INFO_VIEW,
        }
    })?;

    let password: Option<PasswordRow> =
        em.execute_sql_with_maybe_one_return(&password_sql(), &[&row.user_id])?;
    let password = password.ok_or_else(|| {
        DataError::NotFound {
            kind: "usesysid",
            key: row.user_id.to_string(),
            view: PASSWORD_INFO_VIEW,
        }
    })?;

    let user = UserInfo {
        id: row.user_id.to_string(),
        name: user_name.to_string(),
        create_database: row.createdb,
        superuser: row.superuser,
        connection_limit: parse_connection_limit(&row.connection_limit)?,
        session_timeout: parse_session_timeout(&row.session_timeout)?,
        valid_until: valid_until_text(&password.valid_until)?,
        syslog_access: row.syslog_access,
    };
    debug!("user: {:?}", user);
    Ok(user)
}

impl UserInfo {
    /// Write the identity and the attributes of this user into `data`
    pub fn apply_to(&self, data: &mut ResourceData) {
        data.set_id(&self.id);
        data.set(USER_NAME_ATTR, &self.name);
        data.set(USER_CREATE_DB_ATTR, self.create_database);
        data.set(USER_SUPERUSER_ATTR, self.superuser);
        data.set(USER_SYSLOG_ACCESS_ATTR, &self.syslog_access);
        data.set(USER_CONN_LIMIT_ATTR, self.connection_limit);
        data.set(USER_VALID_UNTIL_ATTR, &self.valid_until);
        data.set(USER_SESSION_TIMEOUT_ATTR, self.session_timeout);
    }
}

fn parse_int(column: &'static str, text: &str) -> Result<i32, ParseError> {
    text.trim()
        .parse::<i32>()
        .map_err(|source| {
            ParseError::InvalidInteger {
                column,
                value: text.to_string(),
                source,
            }
        })
}

fn parse_connection_limit(text: &str) -> Result<i32, ParseError> {
    if text == CONNECTION_LIMIT_UNLIMITED {
        Ok(UNLIMITED_CONNECTIONS)
    } else {
        parse_int("connection_limit", text)
    }
}

/// the view reports the timeout as text on some clusters and as an integer on others
fn parse_session_timeout(value: &Value) -> Result<i32, ParseError> {
    match value {
        Value::Smallint(v) => Ok(i32::from(*v)),
        Value::Int(v) => Ok(*v),
        Value::Bigint(v) => parse_int("session_timeout", &v.to_string()),
        Value::Text(text) => parse_int("session_timeout", text),
        other => {
            Err(ParseError::UnexpectedValue {
                column: "session_timeout",
                value: format!("{:?}", other),
            })
        }
    }
}

fn valid_until_text(value: &Value) -> Result<String, ParseError> {
    match value {
        Value::Nil => Ok(PASSWORD_NEVER_EXPIRES.to_string()),
        Value::Text(text) => Ok(text.to_string()),
        Value::DateTime(_) | Value::Timestamp(_) => Ok(value.to_string()),
        other => {
            Err(ParseError::UnexpectedValue {
                column: "valid_until",
                value: format!("{:?}", other),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        database::fake::FakeDatabase,
        error::PlatformError,
        Rows,
    };

    fn user_info_row(user_id: i32, connection_limit: &str, session_timeout: Value) -> Rows {
        let mut rows = Rows::new(
            vec![
                "user_id",
                "createdb",
                "superuser",
                "syslog_access",
                "connection_limit",
                "session_timeout",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        );
        rows.push(vec![
            user_id.into(),
            true.into(),
            false.into(),
            "RESTRICTED".into(),
            connection_limit.into(),
            session_timeout,
        ]);
        rows
    }

    fn password_row(valid_until: Value) -> Rows {
        let mut rows = Rows::new(vec!["valid_until".to_string()]);
        rows.push(vec![valid_until]);
        rows
    }

    #[test]
    fn sql_keeps_the_sentinels() {
        assert_eq!(
            user_info_sql(),
            "SELECT user_id,createdb,superuser,syslog_access,\
             COALESCE(connection_limit::TEXT, 'UNLIMITED') AS connection_limit,\
             session_timeout FROM svv_user_info WHERE user_name = $1"
        );
        assert_eq!(
            password_sql(),
            "SELECT COALESCE(valuntil, 'infinity') AS valid_until FROM pg_user_info WHERE usesysid = $1"
        );
    }

    #[test]
    fn read_unlimited_user() {
        let mut db = FakeDatabase::new()
            .returning(user_info_row(104, CONNECTION_LIMIT_UNLIMITED, "300".into()))
            .returning(password_row(PASSWORD_NEVER_EXPIRES.into()));
        let user = read_user(&mut db, "alice").unwrap();
        assert_eq!(
            user,
            UserInfo {
                id: "104".into(),
                name: "alice".into(),
                create_database: true,
                superuser: false,
                syslog_access: "RESTRICTED".into(),
                connection_limit: -1,
                session_timeout: 300,
                valid_until: "infinity".into(),
            }
        );

        assert_eq!(db.executed.len(), 2);
        assert_eq!(db.executed[0].1, vec![Value::Text("alice".into())]);
        assert_eq!(db.executed[1].1, vec![Value::Int(104)]);
    }

    #[test]
    fn read_limited_user() {
        let mut db = FakeDatabase::new()
            .returning(user_info_row(105, "20", Value::Int(1800)))
            .returning(password_row("2030-06-01 00:00:00".into()));
        let user = read_user(&mut db, "bob").unwrap();
        assert_eq!(user.connection_limit, 20);
        assert_eq!(user.session_timeout, 1800);
        assert_eq!(user.valid_until, "2030-06-01 00:00:00");
    }

    #[test]
    fn expiry_decoded_as_timestamp() {
        use chrono::{
            NaiveDate,
            TimeZone,
            Utc,
        };
        let at = NaiveDate::from_ymd_opt(2030, 6, 1).and_then(|d| d.and_hms_opt(0, 0, 0)).unwrap();
        let mut db = FakeDatabase::new()
            .returning(user_info_row(105, "20", Value::Int(1800)))
            .returning(password_row(Value::Timestamp(Utc.from_utc_datetime(&at))));
        let user = read_user(&mut db, "bob").unwrap();
        assert_eq!(user.valid_until, "2030-06-01 00:00:00+00");
    }

    #[test]
    fn null_expiry_is_infinity() {
        let mut db = FakeDatabase::new()
            .returning(user_info_row(104, "5", "60".into()))
            .returning(password_row(Value::Nil));
        let user = read_user(&mut db, "alice").unwrap();
        assert_eq!(user.valid_until, PASSWORD_NEVER_EXPIRES);
    }

    #[test]
    fn user_not_found() {
        let mut db = FakeDatabase::new().returning(Rows::new(vec!["user_id".to_string()]));
        match read_user(&mut db, "ghost") {
            Err(DbError::DataError(DataError::NotFound { key, view, .. })) => {
                assert_eq!(key, "ghost");
                assert_eq!(view, "svv_user_info");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(db.executed.len(), 1);
    }

    #[test]
    fn password_row_missing() {
        let mut db = FakeDatabase::new()
            .returning(user_info_row(104, "5", "60".into()))
            .returning(Rows::new(vec!["valid_until".to_string()]));
        match read_user(&mut db, "alice") {
            Err(DbError::DataError(DataError::NotFound { key, view, .. })) => {
                assert_eq!(key, "104");
                assert_eq!(view, "pg_user_info");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn query_failures_surface_unchanged() {
        let mut db = FakeDatabase::new().failing("permission denied for relation svv_user_info");
        let err = read_user(&mut db, "alice").unwrap_err();
        assert!(err.to_string().contains("permission denied for relation svv_user_info"));

        let mut db = FakeDatabase::new()
            .returning(user_info_row(104, "5", "60".into()))
            .failing("connection reset");
        match read_user(&mut db, "alice") {
            Err(DbError::PlatformError(PlatformError::QueryFailed { message, .. })) => {
                assert_eq!(message, "connection reset")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_session_timeout() {
        let mut db = FakeDatabase::new()
            .returning(user_info_row(104, "5", "abc".into()))
            .returning(password_row(Value::Nil));
        match read_user(&mut db, "alice") {
            Err(DbError::ParseError(ParseError::InvalidInteger { column, value, .. })) => {
                assert_eq!(column, "session_timeout");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn null_session_timeout() {
        assert!(parse_session_timeout(&Value::Nil).is_err());
        assert_eq!(parse_session_timeout(&Value::Smallint(60)).unwrap(), 60);
        assert!(parse_session_timeout(&Value::Bigint(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn connection_limits() {
        assert_eq!(parse_connection_limit("UNLIMITED").unwrap(), -1);
        assert_eq!(parse_connection_limit("20").unwrap(), 20);
        assert_eq!(parse_connection_limit("0").unwrap(), 0);
        assert!(parse_connection_limit("unlimited").is_err());
        assert!(parse_connection_limit("").is_err());
    }

    #[test]
    fn apply_to_resource_data() {
        let user = UserInfo {
            id: "104".into(),
            name: "alice".into(),
            create_database: true,
            superuser: false,
            syslog_access: "RESTRICTED".into(),
            connection_limit: -1,
            session_timeout: 300,
            valid_until: "infinity".into(),
        };
        let mut data = ResourceData::new();
        user.apply_to(&mut data);
        assert_eq!(data.id(), Some("104"));
        assert_eq!(data.get::<i32>(USER_CONN_LIMIT_ATTR).unwrap(), -1);
        assert_eq!(data.get::<bool>(USER_CREATE_DB_ATTR).unwrap(), true);
        assert_eq!(data.get::<String>(USER_VALID_UNTIL_ATTR).unwrap(), "infinity");
    }
}
