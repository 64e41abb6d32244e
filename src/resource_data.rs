use crate::{
    error::ValidationError,
    schema::Schema,
    Dao,
    ToValue,
    Value,
};
use redshift_dao::{
    DaoError,
    FromValue,
};
use serde_json::{
    Map,
    Number,
    Value as Json,
};

/// The result of a read: the identity of the object and its attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceData {
    id: Option<String>,
    attributes: Dao,
}

impl ResourceData {
    pub fn new() -> Self { ResourceData::default() }

    /// Build the input of a read from the configuration the orchestrator sent.
    ///
    /// Every configured argument is type checked, validated and normalized
    /// against `schema`, computed attributes are left for the read to fill.
    pub fn from_config(schema: &Schema, config: &Json) -> Result<Self, ValidationError> {
        let object = match config {
            Json::Object(object) => object,
            other => return Err(ValidationError::NotAnObject(other.to_string())),
        };
        for key in object.keys() {
            match schema.get(key) {
                Some(attr) if attr.is_computed() => {
                    return Err(ValidationError::ComputedArgument(key.to_string()));
                }
                Some(_) => (),
                None => return Err(ValidationError::UnsupportedArgument(key.to_string())),
            }
        }
        let mut data = ResourceData::new();
        for attr in schema.required() {
            let value = match object.get(attr.name) {
                Some(Json::Null) | None => {
                    return Err(ValidationError::MissingRequired(attr.name.to_string()));
                }
                Some(json) => from_json(json),
            };
            data.attributes.insert(attr.name, attr.check(value)?);
        }
        Ok(data)
    }

    pub fn id(&self) -> Option<&str> { self.id.as_deref() }

    pub fn set_id<S: ToString>(&mut self, id: S) { self.id = Some(id.to_string()) }

    pub fn get<T>(&self, attr: &str) -> Result<T, DaoError>
    where
        T: FromValue,
    {
        self.attributes.get(attr)
    }

    pub fn set<V: ToValue>(&mut self, attr: &str, value: V) { self.attributes.insert(attr, value) }

    /// The state as handed back to the orchestrator, a flat json object
    pub fn to_state(&self) -> Json {
        let mut state = Map::new();
        if let Some(id) = &self.id {
            state.insert("id".to_string(), Json::String(id.to_string()));
        }
        for (name, value) in self.attributes.iter() {
            state.insert(name.to_string(), to_json(value));
        }
        Json::Object(state)
    }
}

fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Nil,
        Json::Bool(v) => Value::Bool(*v),
        Json::Number(n) => {
            match n.as_i64() {
                Some(n) => Value::Bigint(n),
                None => Value::Text(n.to_string()),
            }
        }
        Json::String(s) => Value::Text(s.to_string()),
        other => Value::Text(other.to_string()),
    }
}

fn to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::Smallint(v) => Json::Number(Number::from(*v)),
        Value::Int(v) => Json::Number(Number::from(*v)),
        Value::Bigint(v) => Json::Number(Number::from(*v)),
        other => Json::String(other.to_string()),
    }
}
