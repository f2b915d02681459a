//! Typed values bound to statement placeholders.

use crate::model::StringList;
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};

/// A value that can be bound to a PostgreSQL placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Bool(bool),
    I32(i32),
    I64(i64),
    Text(String),
    Decimal(Decimal),
    /// Bound as JSONB.
    List(StringList),
}

impl From<bool> for PgBindValue {
    fn from(v: bool) -> Self {
        PgBindValue::Bool(v)
    }
}

impl From<i32> for PgBindValue {
    fn from(v: i32) -> Self {
        PgBindValue::I32(v)
    }
}

impl From<i64> for PgBindValue {
    fn from(v: i64) -> Self {
        PgBindValue::I64(v)
    }
}

impl From<String> for PgBindValue {
    fn from(v: String) -> Self {
        PgBindValue::Text(v)
    }
}

impl From<Decimal> for PgBindValue {
    fn from(v: Decimal) -> Self {
        PgBindValue::Decimal(v)
    }
}

impl From<StringList> for PgBindValue {
    fn from(v: StringList) -> Self {
        PgBindValue::List(v)
    }
}

/// Bind params in placeholder order.
pub fn bind_query<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[PgBindValue],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p.clone() {
            PgBindValue::Bool(v) => query.bind(v),
            PgBindValue::I32(v) => query.bind(v),
            PgBindValue::I64(v) => query.bind(v),
            PgBindValue::Text(v) => query.bind(v),
            PgBindValue::Decimal(v) => query.bind(v),
            PgBindValue::List(v) => query.bind(v),
        };
    }
    query
}

/// Same as [`bind_query`] for statements mapped onto a row type.
pub fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[PgBindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p.clone() {
            PgBindValue::Bool(v) => query.bind(v),
            PgBindValue::I32(v) => query.bind(v),
            PgBindValue::I64(v) => query.bind(v),
            PgBindValue::Text(v) => query.bind(v),
            PgBindValue::Decimal(v) => query.bind(v),
            PgBindValue::List(v) => query.bind(v),
        };
    }
    query
}
