use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::field::{present, Field};
use crate::domain::record::{Collection, Record};
use crate::ids::IdScheme;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Field<String>>,
    /// Persona name such as `SALES_ADMIN`; stored as sent.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub role: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Field<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;
    const ID_SCHEME: IdScheme = IdScheme::Short;

    fn id(&self) -> &str {
        &self.id.0
    }

    fn on_append(&mut self, id: String, now: DateTime<Utc>) {
        self.id = UserId(id);
        self.created_at = Some(Field::Typed(now.to_rfc3339()));
    }
}
