//! Ordered list of strings stored as a JSONB array column.

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, PgValueRef, Postgres};
use sqlx::types::Json;
use sqlx::{Database, Decode, Encode, Type};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for StringList {
    fn from(v: Vec<String>) -> Self {
        StringList(v)
    }
}

impl Type<Postgres> for StringList {
    fn type_info() -> PgTypeInfo {
        <Json<Vec<String>> as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <Json<Vec<String>> as Type<Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Postgres> for StringList {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <Json<&Vec<String>> as Encode<Postgres>>::encode_by_ref(&Json(&self.0), buf)
    }
}

impl<'r> Decode<'r, Postgres> for StringList {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let Json(items) = <Json<Option<Vec<String>>> as Decode<Postgres>>::decode(value)?;
        // A JSON `null` in the column reads back as an empty list.
        Ok(StringList(items.unwrap_or_default()))
    }
}
