use crate::{
    error::DaoError,
    FromValue,
    ToValue,
    Value,
};
use std::collections::BTreeMap;

/// A single row, keyed by column name
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Dao(pub BTreeMap<String, Value>);

impl Dao {
    pub fn new() -> Self { Dao::default() }

    pub fn insert<K, V>(&mut self, k: K, v: V)
    where
        K: ToString,
        V: ToValue,
    {
        self.0.insert(k.to_string(), v.to_value());
    }

    pub fn insert_value<K>(&mut self, k: K, value: &Value)
    where
        K: ToString,
    {
        self.0.insert(k.to_string(), value.clone());
    }

    pub fn get<'a, T>(&'a self, s: &str) -> Result<T, DaoError>
    where
        T: FromValue,
    {
        let value: Option<&'a Value> = self.0.get(s);
        match value {
            Some(v) => FromValue::from_value(v).map_err(|e| DaoError::ConvertError(s.into(), e)),
            None => Err(DaoError::NoSuchValueError(s.into())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> { self.0.iter() }
}

pub trait FromDao: Sized {
    /// convert dao to an instance of the corresponding row struct,
    /// failing when a column is missing or has an unexpected type
    fn from_dao(dao: &Dao) -> Result<Self, DaoError>;
}
