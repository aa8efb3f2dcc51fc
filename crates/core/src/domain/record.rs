//! Shared behaviour for the mutable record collections.
//!
//! Every collection stores its own typed record. Known fields are enumerated on the
//! struct; anything else the caller sends is kept verbatim in a flattened side map so
//! that a record always serializes back to the payload it was created from.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::DomainError;
use crate::ids::IdScheme;

/// A partial update: every key present overwrites the stored field of the same name.
pub type Patch = Map<String, Value>;

const IDENTITY_FIELD: &str = "id";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Quotes,
    Users,
    WorkflowRules,
    ConfigRules,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Products,
        Collection::Quotes,
        Collection::Users,
        Collection::WorkflowRules,
        Collection::ConfigRules,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Quotes => "quotes",
            Self::Users => "users",
            Self::WorkflowRules => "workflow_rules",
            Self::ConfigRules => "config_rules",
        }
    }

    /// Singular, human-facing name used in error messages ("Quote not found").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Products => "Product",
            Self::Quotes => "Quote",
            Self::Users => "User",
            Self::WorkflowRules => "Workflow rule",
            Self::ConfigRules => "Config rule",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    const ID_SCHEME: IdScheme;

    fn id(&self) -> &str;

    /// Called exactly once, when the store appends the record. Implementations set the
    /// generated id and any server-owned fields.
    fn on_append(&mut self, id: String, now: DateTime<Utc>);
}

/// Builds a record from a request body. Anything other than a JSON object is rejected;
/// the fields of an object are accepted as sent.
pub fn from_payload<R: Record>(payload: Value) -> Result<R, DomainError> {
    let mut fields = match payload {
        Value::Object(fields) => fields,
        other => {
            return Err(DomainError::InvalidPayload(format!(
                "{} payload must be a JSON object, got {}",
                R::COLLECTION.label(),
                json_kind(&other)
            )))
        }
    };

    // A non-string id can never be stored; append replaces it anyway.
    if fields.get(IDENTITY_FIELD).is_some_and(|id| !id.is_string()) {
        fields.remove(IDENTITY_FIELD);
    }

    serde_json::from_value(Value::Object(fields)).map_err(|error| {
        DomainError::InvalidPayload(format!("{} payload is malformed: {error}", R::COLLECTION.label()))
    })
}

/// Shallow merge: each patch key replaces the stored field wholesale, nested objects
/// and `null` included. The identity field is never overwritten.
pub fn merge_patch<R: Record>(record: &R, patch: &Patch) -> Result<R, DomainError> {
    let mut merged = match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(DomainError::InvariantViolation(format!(
                "{} record serialized to {} instead of an object",
                R::COLLECTION.label(),
                json_kind(&other)
            )))
        }
        Err(error) => return Err(DomainError::InvariantViolation(error.to_string())),
    };

    for (key, value) in patch {
        if key == IDENTITY_FIELD {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }

    serde_json::from_value(Value::Object(merged)).map_err(|error| {
        DomainError::InvalidPayload(format!(
            "{} patch produced an invalid record: {error}",
            R::COLLECTION.label()
        ))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::quote::Quote;
    use crate::domain::rules::WorkflowRule;
    use crate::errors::DomainError;

    use super::{from_payload, merge_patch, Collection, Patch};

    fn patch(value: serde_json::Value) -> Patch {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("patch fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn payload_must_be_an_object() {
        let error = from_payload::<WorkflowRule>(json!([1, 2, 3])).expect_err("array payload");
        assert!(matches!(error, DomainError::InvalidPayload(ref message) if message.contains("an array")));
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let payload = json!({"id": "w1", "name": "Legacy", "threshold": 10, "notes": {"owner": "ops"}});
        let rule = from_payload::<WorkflowRule>(payload.clone()).expect("rule payload");

        assert_eq!(serde_json::to_value(&rule).expect("serialize"), payload);
    }

    #[test]
    fn merge_replaces_nested_objects_wholesale() {
        let quote = from_payload::<Quote>(json!({
            "id": "QT-AAAAA",
            "customer": {"fullName": "Jane", "organization": "Acme"},
            "totalEstimate": 100
        }))
        .expect("quote payload");

        let merged = merge_patch(&quote, &patch(json!({"customer": {"fullName": "Joan"}})))
            .expect("merge");

        assert_eq!(
            serde_json::to_value(&merged).expect("serialize"),
            json!({"id": "QT-AAAAA", "customer": {"fullName": "Joan"}, "totalEstimate": 100})
        );
    }

    #[test]
    fn merge_never_rewrites_identity() {
        let quote = from_payload::<Quote>(json!({"id": "QT-AAAAA"})).expect("quote payload");
        let merged =
            merge_patch(&quote, &patch(json!({"id": "QT-ZZZZZ", "status": "FINAL"}))).expect("merge");

        assert_eq!(merged.id.0, "QT-AAAAA");
        assert_eq!(merged.status(), Some("FINAL"));
    }

    #[test]
    fn merge_keeps_values_of_another_shape_verbatim() {
        let quote = from_payload::<Quote>(json!({"id": "QT-AAAAA", "totalEstimate": 100}))
            .expect("quote payload");
        let merged = merge_patch(
            &quote,
            &patch(json!({"items": "not-a-list", "totalEstimate": "lots", "assignedTo": null})),
        )
        .expect("merge");

        assert_eq!(
            serde_json::to_value(&merged).expect("serialize"),
            json!({
                "id": "QT-AAAAA",
                "items": "not-a-list",
                "totalEstimate": "lots",
                "assignedTo": null
            })
        );
    }

    #[test]
    fn known_fields_accept_any_json_shape() {
        let payload =
            json!({"id": "w9", "name": "x", "threshold": "1000", "approver": null, "condition": 7});
        let rule = from_payload::<WorkflowRule>(payload.clone()).expect("rule payload");

        assert_eq!(serde_json::to_value(&rule).expect("serialize"), payload);
    }

    #[test]
    fn non_string_id_in_payload_is_dropped() {
        let rule = from_payload::<WorkflowRule>(json!({"id": 42, "name": "x"})).expect("rule payload");
        assert_eq!(rule.id.0, "");
    }

    #[test]
    fn collection_labels_match_error_wording() {
        assert_eq!(Collection::Quotes.label(), "Quote");
        assert_eq!(Collection::ConfigRules.as_str(), "config_rules");
    }
}
