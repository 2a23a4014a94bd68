//! Axum HTTP endpoint in front of the gateway handler.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Liveness check |
//! | `GET`  | `/rag-assistant/index/ask` | Ask via query string |
//! | `POST` | `/rag-assistant/index/ask` | Ask via form body (query string as fallback) |
//!
//! The ask endpoint always answers `200 OK`; the `success` field of the JSON
//! body carries the outcome.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::HeaderMap,
    routing::get,
    Form, Json, Router,
};
use ragassist_core::Scope;
use ragassist_gateway::{AskRequest, AskResponse, GatewayHandler, GatewayResult};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path of the ask endpoint.
pub const ASK_PATH: &str = "/rag-assistant/index/ask";

/// Header naming the store whose settings apply to the request.
pub const STORE_HEADER: &str = "x-store-code";

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    handler: Arc<GatewayHandler>,
    default_scope: Scope,
}

impl AppState {
    pub fn new(handler: GatewayHandler, default_scope: Scope) -> Self {
        Self {
            handler: Arc::new(handler),
            default_scope,
        }
    }

    /// Scope named by the request, or the server default.
    fn scope_for(&self, headers: &HeaderMap) -> Scope {
        let code = headers.get(STORE_HEADER).and_then(|v| v.to_str().ok());
        match Scope::from_store(code) {
            Scope::Default => self.default_scope.clone(),
            scope => scope,
        }
    }
}

/// Build the router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(ASK_PATH, get(ask_get_handler).post(ask_post_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /health`
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "ragassist" }))
}

/// `GET /rag-assistant/index/ask?question=...&provider=...`
async fn ask_get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<AskRequest>, QueryRejection>,
) -> Json<AskResponse> {
    let params = query.map(|Query(q)| q).unwrap_or_default();
    answer(&state, &headers, params).await
}

/// `POST /rag-assistant/index/ask` with a form-encoded body.
async fn ask_post_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<AskRequest>, QueryRejection>,
    form: Result<Form<AskRequest>, FormRejection>,
) -> Json<AskResponse> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let params = match form {
        Ok(Form(form)) => form.or(query),
        Err(rejection) => {
            tracing::debug!(%rejection, "no usable form body, using query string");
            query
        }
    };
    answer(&state, &headers, params).await
}

async fn answer(state: &AppState, headers: &HeaderMap, params: AskRequest) -> Json<AskResponse> {
    let scope = state.scope_for(headers);
    let result = state.handler.handle(&params, &scope).await;

    if let GatewayResult::Failure { ref message } = result {
        tracing::warn!(%scope, "RAG request failed: {}", message);
    }

    Json(AskResponse::from(result))
}
