use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use pricepoint_store::RecordStores;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    stores: RecordStores,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub store: HealthCheck,
    pub collections: BTreeMap<&'static str, usize>,
    pub checked_at: String,
}

pub fn router(stores: RecordStores) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { stores })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let (store, collections) = match state.stores.counts().await {
        Ok(counts) => (
            HealthCheck {
                status: "ready",
                detail: format!("{} collections loaded", counts.len()),
            },
            counts.into_iter().map(|(collection, count)| (collection.as_str(), count)).collect(),
        ),
        Err(error) => (
            HealthCheck { status: "degraded", detail: format!("record store unavailable: {error}") },
            BTreeMap::new(),
        ),
    };
    let ready = store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "pricepoint-server runtime initialized".to_string(),
        },
        store,
        collections,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use pricepoint_core::{SequentialIdGenerator, SystemClock};
    use pricepoint_store::{RecordStores, SeedDataset};

    use crate::health::{health, HealthState};

    fn state(dataset: SeedDataset) -> HealthState {
        HealthState {
            stores: RecordStores::in_memory(
                dataset,
                Arc::new(SequentialIdGenerator::new()),
                Arc::new(SystemClock),
            ),
        }
    }

    #[tokio::test]
    async fn health_reports_collection_sizes() {
        let (status, Json(payload)) =
            health(State(state(SeedDataset::demo().expect("demo dataset")))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.store.status, "ready");
        assert_eq!(payload.collections.get("products"), Some(&3));
        assert_eq!(payload.collections.get("quotes"), Some(&1));
        assert_eq!(payload.collections.get("workflow_rules"), Some(&2));
    }

    #[tokio::test]
    async fn empty_store_is_still_ready() {
        let (status, Json(payload)) = health(State(state(SeedDataset::default()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.collections.len(), 5);
        assert!(payload.collections.values().all(|count| *count == 0));
    }
}
