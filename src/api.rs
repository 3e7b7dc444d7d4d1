// 🌐 REST API with Axum
// GET lists, POST adds (replace-on-duplicate), DELETE removes. Record text goes in the raw body.

use crate::collection::RecordCollection;
use crate::error::ParseError;
use crate::ordering::SortOrder;
use crate::parser::LineParser;
use crate::record::Record;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{info, warn};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;

/// Collection plus the parser that feeds it. Always accessed under one lock.
#[derive(Debug, Default)]
pub struct RecordStore {
    pub collection: RecordCollection,
    pub parser: LineParser,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<RecordStore>>,
}

impl AppState {
    pub fn new(collection: RecordCollection, parser: LineParser) -> Self {
        AppState {
            store: Arc::new(Mutex::new(RecordStore { collection, parser })),
        }
    }

    /// Every mutation is a single map operation, so a poisoned lock still
    /// guards a consistent collection.
    fn lock(&self) -> MutexGuard<'_, RecordStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            kind: None,
        }
    }

    fn parse_error(err: &ParseError) -> Self {
        Self {
            kind: Some(err.kind()),
            ..Self::error(err.to_string())
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> Response {
    (status, Json(body)).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /records - Every record, collection order
async fn list_records(State(state): State<AppState>) -> Response {
    let store = state.lock();
    let records: Vec<Record> = store.collection.iter().cloned().collect();
    respond(StatusCode::OK, ApiResponse::ok(records))
}

/// GET /records/:sort - One of the named orderings
async fn sorted_records(State(state): State<AppState>, Path(sort): Path<String>) -> Response {
    let Some(order) = SortOrder::from_name(&sort) else {
        return respond(
            StatusCode::BAD_REQUEST,
            ApiResponse::<()>::error(format!("Invalid request: records/{}", sort)),
        );
    };

    let store = state.lock();
    let records: Vec<Record> = store
        .collection
        .sorted(order)
        .into_iter()
        .cloned()
        .collect();
    respond(StatusCode::OK, ApiResponse::ok(records))
}

/// POST /records - Parse the body as one record line and store it
async fn add_record(State(state): State<AppState>, body: String) -> Response {
    let mut store = state.lock();

    match store.parser.parse_line(&body) {
        Ok(record) => {
            let replaced = store.collection.add(record.clone());
            info!(
                "{} record {}",
                if replaced.is_some() { "Replaced" } else { "Added" },
                record
            );
            respond(StatusCode::OK, ApiResponse::ok(record))
        }
        Err(e) => {
            warn!("Rejected POST /records: {}", e);
            respond(StatusCode::BAD_REQUEST, ApiResponse::<()>::parse_error(&e))
        }
    }
}

/// DELETE /records - Remove the record identity-equal to the body line
async fn delete_record(State(state): State<AppState>, body: String) -> Response {
    let mut store = state.lock();

    let probe = match store.parser.parse_line(&body) {
        Ok(record) => record,
        Err(e) => {
            warn!("Rejected DELETE /records: {}", e);
            return respond(StatusCode::BAD_REQUEST, ApiResponse::<()>::parse_error(&e));
        }
    };

    match store.collection.remove(&probe) {
        Some(removed) => {
            info!("Removed record {}", removed);
            respond(StatusCode::OK, ApiResponse::ok(removed))
        }
        None => respond(
            StatusCode::NOT_FOUND,
            ApiResponse::<()>::error(format!("Record not found: {}", probe.to_line())),
        ),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/records",
            get(list_records).post(add_record).delete(delete_record),
        )
        .route("/records/:sort", get(sorted_records))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// One-line listing of the routes [`router`] serves, for the startup banner
pub fn route_summary() -> String {
    let sorts: Vec<&str> = SortOrder::ALL.iter().map(|order| order.name()).collect();
    format!(
        "GET /api/health, GET /records, GET /records/{{{}}}, POST /records, DELETE /records",
        sorts.join("|")
    )
}

// ============================================================================
// TESTS
// ============================================================================
