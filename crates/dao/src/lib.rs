#![deny(warnings)]
#![deny(clippy::all)]

pub use dao::{
    Dao,
    FromDao,
};
pub use error::{
    ConvertError,
    DaoError,
};
pub use rows::Rows;
pub use value::{
    FromValue,
    ToValue,
    Value,
};

mod dao;
mod error;
mod rows;
pub mod value;
