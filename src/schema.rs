//! Attribute schema of the `redshift_user` data source.
//!
//! The schema is plain data: the orchestration layer reads it to know which
//! argument it must supply and which attributes the read fills in.
use crate::{
    error::ValidationError,
    Value,
};
use serde::Serialize;

pub const USER_NAME_ATTR: &str = "name";
pub const USER_VALID_UNTIL_ATTR: &str = "valid_until";
pub const USER_CREATE_DB_ATTR: &str = "create_database";
pub const USER_CONN_LIMIT_ATTR: &str = "connection_limit";
pub const USER_SYSLOG_ACCESS_ATTR: &str = "syslog_access";
pub const USER_SUPERUSER_ATTR: &str = "superuser";
pub const USER_SESSION_TIMEOUT_ATTR: &str = "session_timeout";

/// no user can be named like the group every user belongs to
pub const RESERVED_USER_NAME: &str = "public";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int,
}

impl AttributeType {
    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (AttributeType::String, Value::Text(_)) => true,
            (AttributeType::Bool, Value::Bool(_)) => true,
            (AttributeType::Int, Value::Smallint(_))
            | (AttributeType::Int, Value::Int(_))
            | (AttributeType::Int, Value::Bigint(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// supplied by the configuration
    Required,
    /// filled in by the read
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// reject any of the listed strings
    StringNotIn {
        values: &'static [&'static str],
        ignore_case: bool,
    },
}

impl Validation {
    pub fn validate(&self, attribute: &str, value: &str) -> Result<(), ValidationError> {
        match self {
            Validation::StringNotIn {
                values,
                ignore_case,
            } => {
                let denied = values.iter().any(|v| {
                    if *ignore_case {
                        v.eq_ignore_ascii_case(value)
                    } else {
                        *v == value
                    }
                });
                if denied {
                    Err(ValidationError::NotAllowed {
                        attribute: attribute.to_string(),
                        denied: values.iter().map(|v| v.to_string()).collect(),
                        value: value.to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// How a configured value is stored in the state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalize {
    Lowercase,
}

impl Normalize {
    pub fn apply(self, value: &str) -> String {
        match self {
            Normalize::Lowercase => value.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub mode: AttributeMode,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize: Option<Normalize>,
}

impl Attribute {
    fn computed(name: &'static str, ty: AttributeType, description: &'static str) -> Self {
        Attribute {
            name,
            ty,
            mode: AttributeMode::Computed,
            description,
            validation: None,
            normalize: None,
        }
    }

    pub fn is_computed(&self) -> bool { self.mode == AttributeMode::Computed }

    /// check the type, run the validation and normalize a configured value
    pub fn check(&self, value: Value) -> Result<Value, ValidationError> {
        if !self.ty.accepts(&value) {
            return Err(ValidationError::TypeMismatch {
                attribute: self.name.to_string(),
                expected: format!("{:?}", self.ty).to_lowercase(),
                got: format!("{:?}", value),
            });
        }
        match value {
            Value::Text(text) => {
                if let Some(validation) = &self.validation {
                    validation.validate(self.name, &text)?;
                }
                match self.normalize {
                    Some(normalize) => Ok(Value::Text(normalize.apply(&text))),
                    None => Ok(Value::Text(text)),
                }
            }
            value => Ok(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.mode == AttributeMode::Required)
    }

    pub fn computed(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_computed())
    }
}

/// The schema of the user data source: the user name in, six settings out
pub fn data_source_user() -> Schema {
    Schema {
        description: "This data source can be used to fetch information about a specific database user. \
            Users are authenticated when they login to Amazon Redshift. They can own databases and database objects \
            (for example, tables) and can grant privileges on those objects to users, groups, and schemas to control \
            who has access to which object. Users with CREATE DATABASE rights can create databases and grant \
            privileges to those databases. Superusers have database ownership privileges for all databases.",
        attributes: vec![
            Attribute {
                name: USER_NAME_ATTR,
                ty: AttributeType::String,
                mode: AttributeMode::Required,
                description: "The name of the user account. The user name can't be `PUBLIC`.",
                validation: Some(Validation::StringNotIn {
                    values: &[RESERVED_USER_NAME],
                    ignore_case: true,
                }),
                normalize: Some(Normalize::Lowercase),
            },
            Attribute::computed(
                USER_VALID_UNTIL_ATTR,
                AttributeType::String,
                "Date and time after which the user's password is no longer valid. \
                 By default the password has no time limit.",
            ),
            Attribute::computed(
                USER_CREATE_DB_ATTR,
                AttributeType::Bool,
                "Indicates whether the user is allowed to create new databases.",
            ),
            Attribute::computed(
                USER_CONN_LIMIT_ATTR,
                AttributeType::Int,
                "The maximum number of database connections the user is permitted to have open concurrently. \
                 The limit isn't enforced for superusers.",
            ),
            Attribute::computed(
                USER_SYSLOG_ACCESS_ATTR,
                AttributeType::String,
                "A clause that specifies the level of access that the user has to the Amazon Redshift system \
                 tables and views. If `RESTRICTED` (default) is specified, the user can see only the rows \
                 generated by that user in user-visible system tables and views. If `UNRESTRICTED` is \
                 specified, the user can see all rows in user-visible system tables and views, including rows \
                 generated by another user. `UNRESTRICTED` doesn't give a regular user access to \
                 superuser-visible tables. Only superusers can see superuser-visible tables.",
            ),
            Attribute::computed(
                USER_SUPERUSER_ATTR,
                AttributeType::Bool,
                "Indicates whether the user is a superuser with all database privileges.",
            ),
            Attribute::computed(
                USER_SESSION_TIMEOUT_ATTR,
                AttributeType::Int,
                "The maximum time in seconds that a session remains inactive or idle. The range is 60 seconds \
                 (one minute) to 1,728,000 seconds (20 days). If no session timeout is set for the user, the \
                 cluster setting applies.",
            ),
        ],
    }
}
