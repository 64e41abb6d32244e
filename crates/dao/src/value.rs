use crate::ConvertError;
use chrono::{
    DateTime,
    NaiveDateTime,
    Utc,
};
use std::{
    convert::TryFrom,
    fmt,
};

/// Generic value storage for a single catalog column.
/// The variant is what the driver reported, the reader decides
/// how it is coerced into an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil, // no value
    Bool(bool),

    Smallint(i16),
    Int(i32),
    Bigint(i64),

    Text(String),

    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, ""),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Smallint(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bigint(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            // the server's own text forms of timestamp and timestamptz
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f+00")),
        }
    }
}

/// A trait to allow passing of parameters ergonomically
/// in em.execute_sql_with_return
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! impl_to_value {
    ($ty:ty, $variant:ident) => {
        impl ToValue for $ty {
            fn to_value(&self) -> Value { Value::$variant(self.to_owned()) }
        }
    };
}

impl_to_value!(bool, Bool);
impl_to_value!(i16, Smallint);
impl_to_value!(i32, Int);
impl_to_value!(i64, Bigint);
impl_to_value!(String, Text);

impl ToValue for &str {
    fn to_value(&self) -> Value { Value::Text(self.to_string()) }
}

impl ToValue for Value {
    fn to_value(&self) -> Value { self.clone() }
}

impl<T> ToValue for Option<T>
where
    T: ToValue,
{
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Nil,
        }
    }
}

impl<T> ToValue for &T
where
    T: ToValue,
{
    fn to_value(&self) -> Value { (*self).to_value() }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value { v.to_value() }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value { v.to_value() }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value { v.to_value() }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value { v.to_value() }
}

impl From<String> for Value {
    fn from(v: String) -> Value { v.to_value() }
}

pub trait FromValue: Sized {
    fn from_value(v: &Value) -> Result<Self, ConvertError>;
}

/// narrowing is checked, a value out of range is an error
macro_rules! impl_from_value_numeric {
    ($ty: ty, $ty_name: tt, $($variant: ident),*) => {
        impl FromValue for $ty {
            fn from_value(v: &Value) -> Result<Self, ConvertError> {
                match *v {
                    $(Value::$variant(n) => {
                        <$ty>::try_from(n).map_err(|e| {
                            ConvertError::NotSupported(format!("{:?}", v), format!("{}: {}", $ty_name, e))
                        })
                    }
                    )*
                    _ => Err(ConvertError::NotSupported(format!("{:?}", v), $ty_name.into())),
                }
            }
        }
    }
}

impl_from_value_numeric!(i16, "i16", Smallint);
impl_from_value_numeric!(i32, "i32", Smallint, Int, Bigint);
impl_from_value_numeric!(i64, "i64", Smallint, Int, Bigint);

impl FromValue for String {
    fn from_value(v: &Value) -> Result<Self, ConvertError> {
        match *v {
            Value::Text(ref v) => Ok(v.to_owned()),
            _ => {
                Err(ConvertError::NotSupported(
                    format!("{:?}", v),
                    "String".to_string(),
                ))
            }
        }
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Result<Self, ConvertError> {
        match *v {
            Value::Bool(v) => Ok(v),
            Value::Smallint(v) => Ok(v == 1),
            Value::Int(v) => Ok(v == 1),
            Value::Bigint(v) => Ok(v == 1),
            _ => {
                Err(ConvertError::NotSupported(
                    format!("{:?}", v),
                    "bool".to_string(),
                ))
            }
        }
    }
}

/// Keeps the raw column value, for columns whose wire type
/// differs between warehouse versions
impl FromValue for Value {
    fn from_value(v: &Value) -> Result<Self, ConvertError> { Ok(v.clone()) }
}

impl<T> FromValue for Option<T>
where
    T: FromValue,
{
    fn from_value(v: &Value) -> Result<Self, ConvertError> {
        match *v {
            Value::Nil => Ok(None),
            _ => FromValue::from_value(v).map(Some),
        }
    }
}
