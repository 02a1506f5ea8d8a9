//! HTTP API layer exposing token CRUD endpoints over the CSV repository.

mod error;
mod upload;

pub use error::{ApiError, ErrorResponse};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use token_hub_core::{CsvStore, TokenRecord, TokenRepository};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared application state. Reads share the lock; every mutation, including
/// raw uploads, holds it exclusively so writes within one process never
/// interleave.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<RwLock<TokenRepository<CsvStore>>>,
}

impl AppState {
    pub fn new(store: CsvStore) -> Self {
        Self {
            repo: Arc::new(RwLock::new(TokenRepository::new(store))),
        }
    }
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(rename = "projectName")]
    project_name: Option<String>,
}

#[derive(Deserialize)]
struct ReplaceRequest {
    #[serde(rename = "projectName")]
    project_name: String,
    #[serde(default)]
    tokens: Vec<TokenRecord>,
}

#[derive(Deserialize)]
struct DeleteParams {
    line: Option<String>,
}

/// Build the application router. Paths outside the API fall through to the
/// frontend directory when one is configured.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut app = Router::new()
        .route(
            "/api/tokens",
            get(list_tokens)
                .post(add_token)
                .put(replace_project_tokens)
                .delete(delete_token),
        )
        .route(
            "/api/upload",
            post(upload::upload_csv).layer(DefaultBodyLimit::disable()),
        )
        .route("/health", get(health_check));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors),
    )
    .with_state(state)
}

async fn request_id_middleware(mut req: axum::extract::Request, next: Next) -> Response {
    let request_id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok();
    if let Some(id) = &request_id {
        req.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
    }
    let mut response = next.run(req).await;
    if let Some(id) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER, id);
    }
    response
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_tokens(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<TokenRecord>>, ApiError> {
    let Query(params) = params?;
    let project = params.project_name.as_deref().filter(|p| !p.is_empty());
    let repo = state.repo.read().await;
    let tokens = repo.list(project)?;
    Ok(Json(tokens))
}

async fn add_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(record) = payload?;
    let repo = state.repo.write().await;
    repo.append(record)?;
    Ok(StatusCode::CREATED)
}

async fn replace_project_tokens(
    State(state): State<AppState>,
    payload: Result<Json<ReplaceRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    let repo = state.repo.write().await;
    repo.replace_project(&req.project_name, req.tokens)?;
    Ok(StatusCode::OK)
}

async fn delete_token(
    State(state): State<AppState>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(params) = params?;
    let raw = params
        .line
        .ok_or_else(|| ApiError::validation("missing `line` query parameter"))?;
    let index: i64 = raw
        .parse()
        .map_err(|_| ApiError::validation(format!("invalid line number {raw:?}")))?;

    let repo = state.repo.write().await;
    let removed = repo.delete_at(index)?;
    tracing::info!(
        index,
        project = removed.first().map(String::as_str).unwrap_or_default(),
        "deleted token row"
    );
    Ok(StatusCode::OK)
}
