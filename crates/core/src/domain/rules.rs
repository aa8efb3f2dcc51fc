//! Admin-managed rules: approval workflow thresholds and product configuration constraints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::domain::field::{present, Field};
use crate::domain::record::{Collection, Record};
use crate::ids::IdScheme;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowRuleId(pub String);

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigRuleId(pub String);

/// Routes a quote to `approver` once `condition` (`item_value`, `total_value`,
/// `discount_pct`) crosses `threshold`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRule {
    #[serde(default)]
    pub id: WorkflowRuleId,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub condition: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Field<Number>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub approver: Option<Field<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for WorkflowRule {
    const COLLECTION: Collection = Collection::WorkflowRules;
    const ID_SCHEME: IdScheme = IdScheme::Short;

    fn id(&self) -> &str {
        &self.id.0
    }

    fn on_append(&mut self, id: String, _now: DateTime<Utc>) {
        self.id = WorkflowRuleId(id);
    }
}

/// When `triggerConfig` on `productId` is set to `triggerValue`, apply `action`
/// (`REQUIRE`, `DISABLE`, `SET_VALUE`) to `restrictedConfig`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRule {
    #[serde(default)]
    pub id: ConfigRuleId,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub trigger_config: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub trigger_value: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub restricted_config: Option<Field<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub action: Option<Field<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for ConfigRule {
    const COLLECTION: Collection = Collection::ConfigRules;
    const ID_SCHEME: IdScheme = IdScheme::Short;

    fn id(&self) -> &str {
        &self.id.0
    }

    fn on_append(&mut self, id: String, _now: DateTime<Utc>) {
        self.id = ConfigRuleId(id);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use crate::domain::field::{Field, TypedField};
    use crate::domain::record::{from_payload, Record};

    use super::{ConfigRule, WorkflowRule};

    #[test]
    fn rules_do_not_gain_a_creation_timestamp() {
        let mut rule: WorkflowRule = from_payload(json!({
            "name": "Global High Value Approval",
            "condition": "total_value",
            "threshold": 50000,
            "approver": "SALES_ADMIN"
        }))
        .expect("rule payload");
        rule.on_append("1a2b3c4d".to_string(), Utc::now());

        let value = serde_json::to_value(&rule).expect("serialize");
        assert_eq!(value["id"], "1a2b3c4d");
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn null_threshold_from_an_empty_form_is_accepted() {
        let rule: WorkflowRule =
            from_payload(json!({"name": "Draft rule", "threshold": null})).expect("rule payload");
        assert_eq!(rule.threshold, Some(Field::Raw(json!(null))));
        assert_eq!(
            serde_json::to_value(&rule).expect("serialize"),
            json!({"id": "", "name": "Draft rule", "threshold": null})
        );
    }

    #[test]
    fn numeric_trigger_value_is_stored_as_sent() {
        let rule: ConfigRule = from_payload(json!({"name": "x", "triggerValue": 500}))
            .expect("config rule payload");
        assert_eq!(rule.trigger_value, Some(Field::Raw(json!(500))));
    }

    #[test]
    fn config_rule_reads_camel_case_fields() {
        let mut rule: ConfigRule = from_payload(json!({
            "name": "Windows Monitoring Req",
            "productId": "vm-basic",
            "triggerConfig": "Operating System",
            "triggerValue": "windows",
            "restrictedConfig": "Advanced Monitoring",
            "action": "REQUIRE"
        }))
        .expect("config rule payload");
        rule.on_append("cafebabe".to_string(), Utc::now());

        assert_eq!(rule.id(), "cafebabe");
        assert_eq!(rule.product_id.typed().map(String::as_str), Some("vm-basic"));
        assert_eq!(rule.action.typed().map(String::as_str), Some("REQUIRE"));
    }
}
