//! JSON API used by the storefront and the admin panel.
//!
//! - `GET  /api/products`
//! - `GET  /api/quotes`, `POST /api/quotes`
//! - `PUT  /api/quotes/{quote_id}`
//! - `GET  /api/admin/rules`, `POST /api/admin/rules`
//! - `GET  /api/admin/config-rules`, `POST /api/admin/config-rules`
//! - `GET  /api/admin/users`, `POST /api/admin/users`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use pricepoint_core::config::CorsConfig;
use pricepoint_core::domain::product::Product;
use pricepoint_core::domain::quote::Quote;
use pricepoint_core::domain::record::{from_payload, Patch, Record};
use pricepoint_core::domain::rules::{ConfigRule, WorkflowRule};
use pricepoint_core::domain::user::User;
use pricepoint_core::errors::DomainError;
use pricepoint_store::{RecordRepository, RecordStores};

use crate::errors::{correlation_id, ApiError};

type Payload = Result<Json<Value>, JsonRejection>;

pub fn router(stores: RecordStores, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/quotes", get(list_quotes).post(create_quote))
        .route("/api/quotes/{quote_id}", put(update_quote))
        .route("/api/admin/rules", get(list_workflow_rules).post(create_workflow_rule))
        .route("/api/admin/config-rules", get(list_config_rules).post(create_config_rule))
        .route("/api/admin/users", get(list_users).post(create_user))
        .layer(cors_layer(cors))
        .with_state(stores)
}

pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    event_name = "api.cors.origin_skipped",
                    origin = %origin,
                    "allowed origin is not a valid header value"
                );
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn list_products(State(stores): State<RecordStores>) -> Json<Vec<Product>> {
    Json(stores.products.list().to_vec())
}

async fn list_quotes(State(stores): State<RecordStores>) -> Result<Json<Vec<Quote>>, ApiError> {
    list_records(stores.quotes.as_ref()).await
}

async fn create_quote(
    State(stores): State<RecordStores>,
    payload: Payload,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    create_record(stores.quotes.as_ref(), payload).await
}

async fn update_quote(
    State(stores): State<RecordStores>,
    Path(quote_id): Path<String>,
    payload: Payload,
) -> Result<Json<Quote>, ApiError> {
    let correlation_id = correlation_id();
    let Json(body) = payload.map_err(|rejection| ApiError::rejected(rejection, &correlation_id))?;
    let patch = into_patch::<Quote>(body).map_err(|error| ApiError::new(error, &correlation_id))?;

    let updated = stores
        .quotes
        .merge_update(&quote_id, &patch)
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "api.quote.updated",
        correlation_id = %correlation_id,
        quote_id = %quote_id,
        fields = patch.len(),
        status = updated.status().unwrap_or(""),
        "quote updated"
    );
    Ok(Json(updated))
}

async fn list_workflow_rules(
    State(stores): State<RecordStores>,
) -> Result<Json<Vec<WorkflowRule>>, ApiError> {
    list_records(stores.workflow_rules.as_ref()).await
}

async fn create_workflow_rule(
    State(stores): State<RecordStores>,
    payload: Payload,
) -> Result<(StatusCode, Json<WorkflowRule>), ApiError> {
    create_record(stores.workflow_rules.as_ref(), payload).await
}

async fn list_config_rules(
    State(stores): State<RecordStores>,
) -> Result<Json<Vec<ConfigRule>>, ApiError> {
    list_records(stores.config_rules.as_ref()).await
}

async fn create_config_rule(
    State(stores): State<RecordStores>,
    payload: Payload,
) -> Result<(StatusCode, Json<ConfigRule>), ApiError> {
    create_record(stores.config_rules.as_ref(), payload).await
}

async fn list_users(State(stores): State<RecordStores>) -> Result<Json<Vec<User>>, ApiError> {
    list_records(stores.users.as_ref()).await
}

async fn create_user(
    State(stores): State<RecordStores>,
    payload: Payload,
) -> Result<(StatusCode, Json<User>), ApiError> {
    create_record(stores.users.as_ref(), payload).await
}

async fn list_records<R: Record>(repo: &dyn RecordRepository<R>) -> Result<Json<Vec<R>>, ApiError> {
    let records = repo.list().await.map_err(|error| ApiError::new(error, &correlation_id()))?;
    Ok(Json(records))
}

async fn create_record<R: Record>(
    repo: &dyn RecordRepository<R>,
    payload: Payload,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let correlation_id = correlation_id();
    let Json(body) = payload.map_err(|rejection| ApiError::rejected(rejection, &correlation_id))?;
    let record: R = from_payload(body).map_err(|error| ApiError::new(error, &correlation_id))?;

    let stored = repo.append(record).await.map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "api.record.created",
        correlation_id = %correlation_id,
        collection = %R::COLLECTION,
        record_id = %stored.id(),
        "record created"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

fn into_patch<R: Record>(body: Value) -> Result<Patch, DomainError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(DomainError::InvalidPayload(format!(
            "{} update must be a JSON object",
            R::COLLECTION.label()
        ))),
    }
}
