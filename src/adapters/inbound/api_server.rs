//! GeoIP API Server
//!
//! HTTP surface for single and batch IP lookups, plus a static demo page.
//! Handlers are thin adapters: extract the input, call the resolver, map the
//! outcome to a response.

use crate::application::Resolver;
use crate::domain::entities::LookupOutcome;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Documented batch ceiling, enforced here rather than in the resolver.
const MAX_BATCH_SIZE: usize = 100;

static INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// Single lookup request body.
#[derive(Debug, Deserialize)]
pub struct LocateRequest {
    pub ip: String,
}

/// Batch lookup request body.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub ips: Vec<String>,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub resolver: Arc<Resolver>,
}

/// API server for IP geolocation lookups.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, resolver: Arc<Resolver>) -> Self {
        Self {
            listen_addr,
            state: ApiState { resolver },
        }
    }

    /// Build the router. Exposed separately so integration tests can drive
    /// the handlers in-process without binding a socket.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/locate/:ip", get(locate_path_handler))
            .route("/locate", post(locate_body_handler))
            .route("/batch", post(batch_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the API server.
    ///
    /// The final Ok(()) is excluded from coverage since axum::serve runs forever.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = self.router();

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("GeoIP API listening on {}", self.listen_addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Render an outcome as the response body shape shared by all endpoints.
///
/// `Resolved` serializes the full record; every error kind becomes
/// `{"ip": ..., "error": ...}` with the echoed input IP.
fn outcome_json(outcome: &LookupOutcome) -> serde_json::Value {
    match outcome {
        LookupOutcome::Resolved(record) => json!(record),
        LookupOutcome::NotFound { ip } => json!({ "ip": ip, "error": "Not Found" }),
        LookupOutcome::Unavailable { ip } => json!({ "ip": ip, "error": "Database not loaded" }),
        LookupOutcome::Malformed { ip, detail } => json!({ "ip": ip, "error": detail }),
    }
}

// Handler functions

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /locate/:ip` - the only endpoint that escalates a miss to an HTTP
/// status. The POST path below deliberately does not; the asymmetry is
/// long-standing observed behavior that clients depend on.
async fn locate_path_handler(State(state): State<ApiState>, Path(ip): Path<String>) -> Response {
    match state.resolver.resolve(&ip) {
        LookupOutcome::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "IP not found" })),
        )
            .into_response(),
        outcome => Json(outcome_json(&outcome)).into_response(),
    }
}

/// `POST /locate` - always 200, errors carried in the body.
async fn locate_body_handler(
    State(state): State<ApiState>,
    Json(req): Json<LocateRequest>,
) -> Json<serde_json::Value> {
    Json(outcome_json(&state.resolver.resolve(&req.ip)))
}

/// `POST /batch` - one outcome per input IP, in input order.
async fn batch_handler(State(state): State<ApiState>, Json(req): Json<BatchRequest>) -> Response {
    if req.ips.len() > MAX_BATCH_SIZE {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("batch size exceeds the limit of {MAX_BATCH_SIZE}")
            })),
        )
            .into_response();
    }

    let outcomes = state.resolver.resolve_batch(&req.ips);
    let body: Vec<serde_json::Value> = outcomes.iter().map(outcome_json).collect();
    Json(body).into_response()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::entities::{GeoRecord, LocationRecord};

    #[test]
    fn test_outcome_json_resolved_shape() {
        let record = GeoRecord {
            iso_code: Some("US".to_string()),
            latitude: Some(37.751),
            ..GeoRecord::default()
        };
        let outcome = LookupOutcome::Resolved(LocationRecord::from_record("8.8.8.8", record));
        let body = outcome_json(&outcome);

        assert_eq!(body["ip"], "8.8.8.8");
        assert_eq!(body["iso_code"], "US");
        assert_eq!(body["city"], "Unknown");
        assert_eq!(body["location"]["latitude"], 37.751);
        assert!(body["location"]["time_zone"].is_null());
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_outcome_json_error_shapes() {
        let not_found = LookupOutcome::NotFound {
            ip: "203.0.113.1".to_string(),
        };
        assert_eq!(
            outcome_json(&not_found),
            json!({ "ip": "203.0.113.1", "error": "Not Found" })
        );

        let unavailable = LookupOutcome::Unavailable {
            ip: "8.8.8.8".to_string(),
        };
        assert_eq!(
            outcome_json(&unavailable),
            json!({ "ip": "8.8.8.8", "error": "Database not loaded" })
        );

        let malformed = LookupOutcome::Malformed {
            ip: "bogus".to_string(),
            detail: "bogus does not appear to be a valid IP address".to_string(),
        };
        assert_eq!(
            outcome_json(&malformed),
            json!({
                "ip": "bogus",
                "error": "bogus does not appear to be a valid IP address"
            })
        );
    }

    #[test]
    fn test_index_page_embeds_endpoints() {
        assert!(INDEX_HTML.contains("/locate"));
        assert!(INDEX_HTML.contains("/batch"));
    }
}
