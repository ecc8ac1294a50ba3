use std::fmt::Debug;

use serde::{Serialize, Deserialize};
use tokio_postgres::types;

pub type PgJson<T> = types::Json<T>;

#[inline]
pub fn de_from_sql<'a, T>(value: PgJson<T>) -> T
where
    T: Deserialize<'a>
{
    value.0
}

#[inline]
pub fn ser_to_sql<'a, T>(value: &'a T) -> PgJson<&'a T>
where
    T: Serialize + Debug
{
    types::Json(value)
}
