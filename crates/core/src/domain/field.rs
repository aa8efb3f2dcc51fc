//! Lenient record fields.
//!
//! Callers may send any JSON for a known field. A value of the expected shape is held
//! typed; anything else, `null` included, is held as the raw JSON it arrived as and
//! serialized back unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field<T> {
    Typed(T),
    Raw(Value),
}

impl<T> Field<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

/// Typed view of an optional field: `None` when the key is absent or holds a value of
/// another shape.
pub trait TypedField<T> {
    fn typed(&self) -> Option<&T>;
}

impl<T> TypedField<T> for Option<Field<T>> {
    fn typed(&self) -> Option<&T> {
        self.as_ref().and_then(Field::typed)
    }
}

/// `deserialize_with` for optional fields: a present key is always `Some`, so an
/// explicit `null` survives instead of collapsing into "absent".
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Field<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Field::deserialize(deserializer).map(Some)
}
