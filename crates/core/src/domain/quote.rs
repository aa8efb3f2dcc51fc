use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::domain::field::{present, Field, TypedField};
use crate::domain::record::{Collection, Record};
use crate::ids::IdScheme;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub String);

/// Well-known status values. The store does not enforce transitions between them.
pub const STATUS_DRAFT: &str = "DRAFT";
pub const STATUS_FINAL: &str = "FINAL";
pub const STATUS_PENDING_APPROVAL: &str = "PENDING_APPROVAL";
pub const STATUS_APPROVED: &str = "APPROVED";
pub const STATUS_REJECTED: &str = "REJECTED";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub organization: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub mobile: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Field<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A configured cart line as the storefront submits it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Field<Number>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub selected_configs: Option<Field<Map<String, Value>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub selected_addons: Option<Field<Vec<String>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Field<Number>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Field<Number>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub discount: Option<Field<Number>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(default)]
    pub id: QuoteId,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub customer: Option<Field<ContactDetails>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub items: Option<Field<Vec<QuoteItem>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_estimate: Option<Field<Number>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<Field<Number>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quote {
    /// The status when it was sent as a string.
    pub fn status(&self) -> Option<&str> {
        self.status.typed().map(String::as_str)
    }
}

impl Record for Quote {
    const COLLECTION: Collection = Collection::Quotes;
    const ID_SCHEME: IdScheme = IdScheme::Quote;

    fn id(&self) -> &str {
        &self.id.0
    }

    /// New quotes always start as drafts, whatever status the caller sent.
    fn on_append(&mut self, id: String, now: DateTime<Utc>) {
        self.id = QuoteId(id);
        self.status = Some(Field::Typed(STATUS_DRAFT.to_string()));
        self.created_at = Some(Field::Typed(now.to_rfc3339()));
    }
}
