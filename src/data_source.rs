use crate::{
    error::DataSourceError,
    schema::{
        self,
        Schema,
        USER_NAME_ATTR,
    },
    users,
    Database,
    DbError,
    ResourceData,
};
use log::*;
use serde_json::Value as Json;

/// The `redshift_user` data source
pub struct UserDataSource {
    schema: Schema,
}

impl Default for UserDataSource {
    fn default() -> Self { UserDataSource::new() }
}

impl UserDataSource {
    pub fn new() -> Self {
        UserDataSource {
            schema: schema::data_source_user(),
        }
    }

    pub fn schema(&self) -> &Schema { &self.schema }

    /// Validate `config` and read the configured user from `db`.
    ///
    /// A fresh `ResourceData` is returned only when both lookups succeed,
    /// an error leaves nothing behind.
    pub fn read(&self, db: &mut dyn Database, config: &Json) -> Result<ResourceData, DataSourceError> {
        let input = ResourceData::from_config(&self.schema, config)?;
        let user_name: String = input.get(USER_NAME_ATTR).map_err(DbError::from)?;
        let user = users::read_user(db, &user_name).map_err(|e| {
            warn!("unable to read user {:?}: {}", user_name, e);
            e
        })?;
        let mut data = input;
        user.apply_to(&mut data);
        Ok(data)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        database::fake::FakeDatabase,
        DataError,
        Rows,
        ValidationError,
        Value,
    };
    use serde_json::json;

    fn user_info_rows() -> Rows {
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
            104.into(),
            true.into(),
            false.into(),
            "RESTRICTED".into(),
            "UNLIMITED".into(),
            "300".into(),
        ]);
        rows
    }

    fn password_rows() -> Rows {
        let mut rows = Rows::new(vec!["valid_until".to_string()]);
        rows.push(vec!["infinity".into()]);
        rows
    }

    #[test]
    fn end_to_end() {
        let mut db = FakeDatabase::new()
            .returning(user_info_rows())
            .returning(password_rows());
        let data = UserDataSource::new()
            .read(&mut db, &json!({"name": "Alice"}))
            .unwrap();
        assert_eq!(
            data.to_state(),
            json!({
                "id": "104",
                "name": "alice",
                "create_database": true,
                "superuser": false,
                "syslog_access": "RESTRICTED",
                "connection_limit": -1,
                "session_timeout": 300,
                "valid_until": "infinity",
            })
        );
        assert_eq!(db.executed[0].1, vec![Value::Text("alice".into())]);
    }

    #[test]
    fn invalid_config_runs_no_query() {
        let mut db = FakeDatabase::new();
        let result = UserDataSource::new().read(&mut db, &json!({"name": "PUBLIC"}));
        match result {
            Err(DataSourceError::Validation(ValidationError::NotAllowed { .. })) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(db.executed.is_empty());
    }

    #[test]
    fn not_found_leaves_no_result() {
        let mut db = FakeDatabase::new().returning(Rows::new(vec!["user_id".to_string()]));
        let result = UserDataSource::new().read(&mut db, &json!({"name": "ghost"}));
        match result {
            Err(DataSourceError::Db(DbError::DataError(DataError::NotFound { .. }))) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn second_lookup_failure_leaves_no_result() {
        let mut db = FakeDatabase::new()
            .returning(user_info_rows())
            .failing("relation \"pg_user_info\" does not exist");
        let result = UserDataSource::new().read(&mut db, &json!({"name": "alice"}));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("pg_user_info"));
    }

    #[test]
    fn exposes_the_schema() {
        let source = UserDataSource::default();
        assert_eq!(source.schema().attributes.len(), 7);
    }
}
