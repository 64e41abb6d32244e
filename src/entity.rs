use crate::{
    DataError,
    Database,
    DbError,
    ToValue,
    Value,
};
use log::*;
use redshift_dao::FromDao;

/// Typed queries over a borrowed connection
pub struct EntityManager<'a>(pub &'a mut dyn Database);

impl<'a> EntityManager<'a> {
    pub fn execute_sql_with_return<R>(
        &mut self,
        sql: &str,
        params: &[&dyn ToValue],
    ) -> Result<Vec<R>, DbError>
    where
        R: FromDao,
    {
        let values: Vec<Value> = params.iter().map(|p| p.to_value()).collect();
        let bvalues: Vec<&Value> = values.iter().collect();
        debug!("sql: {}", sql);
        debug!("params: {:?}", values);
        let rows = self.0.execute_sql_with_return(sql, &bvalues)?;
        let mut entities = Vec::with_capacity(rows.len());
        for dao in rows.iter() {
            entities.push(R::from_dao(&dao)?);
        }
        Ok(entities)
    }

    pub fn execute_sql_with_one_return<R>(
        &mut self,
        sql: &str,
        params: &[&dyn ToValue],
    ) -> Result<R, DbError>
    where
        R: FromDao,
    {
        match self.execute_sql_with_maybe_one_return(sql, params)? {
            Some(one) => Ok(one),
            None => Err(DbError::DataError(DataError::ZeroRecordReturned)),
        }
    }

    pub fn execute_sql_with_maybe_one_return<R>(
        &mut self,
        sql: &str,
        params: &[&dyn ToValue],
    ) -> Result<Option<R>, DbError>
    where
        R: FromDao,
    {
        let mut result: Vec<R> = self.execute_sql_with_return(sql, params)?;
        match result.len() {
            0 => Ok(None),
            1 => Ok(Some(result.remove(0))),
            _ => Err(DbError::DataError(DataError::MoreThan1RecordReturned)),
        }
    }
}
