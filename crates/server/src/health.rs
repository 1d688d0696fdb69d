use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use storefront_core::CustomerApi;

#[derive(Clone)]
pub struct HealthState {
    api: Arc<dyn CustomerApi>,
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
    pub customer_api: HealthCheck,
    pub checked_at: String,
}

pub fn router(api: Arc<dyn CustomerApi>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { api })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let customer_api = customer_api_check(state.api.as_ref()).await;
    let ready = customer_api.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "storefront-server runtime initialized".to_string(),
        },
        customer_api,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn customer_api_check(api: &dyn CustomerApi) -> HealthCheck {
    match api.list_customers().await {
        Ok(customers) => HealthCheck {
            status: "ready",
            detail: format!("customer listing succeeded ({} customers)", customers.len()),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("customer listing failed: {error}") }
        }
    }
}
