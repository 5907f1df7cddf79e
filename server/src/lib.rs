use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use boolsearch_core::ingest::read_corpus;
use boolsearch_core::{DocId, Error as IndexError, FrequencyRanker, FrequencyReport, InvertedIndex, QueryEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    /// 1-based position in the result list
    pub rank: usize,
    pub external_id: String,
}

#[derive(Deserialize)]
pub struct FrequencyParams {
    #[serde(default = "default_n")]
    pub top: usize,
    #[serde(default = "default_n")]
    pub bottom: usize,
}
fn default_n() -> usize { 10 }

#[derive(Serialize)]
pub struct PostingsResponse {
    pub term: String,
    pub document_frequency: usize,
    pub postings: Vec<DocId>,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: DocId,
    pub external_id: String,
}

/// The index is built before the router exists and never mutated afterwards,
/// so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

pub struct ApiError(IndexError);

impl From<IndexError> for ApiError {
    fn from(e: IndexError) -> Self { ApiError(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            IndexError::MalformedQuery { .. } => StatusCode::BAD_REQUEST,
            IndexError::UnknownDocumentId { .. } => StatusCode::NOT_FOUND,
            IndexError::DocIdSpaceExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Read the corpus at `corpus_path`, build the index, and wire the routes.
pub fn build_app(corpus_path: &str) -> Result<Router> {
    let docs = read_corpus(corpus_path)?;
    Ok(build_app_with_index(InvertedIndex::from_documents(docs)?))
}

pub fn build_app_with_index(index: InvertedIndex) -> Router {
    let app_state = AppState { index: Arc::new(index) };

    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/frequency", get(frequency_handler))
        .route("/postings/:term", get(postings_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Comma-separated allowed origins. Unset, empty, `*` or unparsable entries
/// are dropped; with nothing left any origin is allowed.
fn cors_layer(allowed: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .filter_map(|s| s.parse().ok())
        .collect();
    let allow_origin = if origins.is_empty() { AllowOrigin::from(Any) } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let hits = QueryEngine::new(&state.index).search(&params.q)?;
    let total_hits = hits.len();
    let limit = params.limit.unwrap_or(usize::MAX);

    let mut results = Vec::with_capacity(total_hits.min(limit));
    for (i, doc_id) in hits.into_iter().take(limit).enumerate() {
        let external_id = state.index.external_id(doc_id)?.to_string();
        results.push(SearchHit { doc_id, rank: i + 1, external_id });
    }

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn frequency_handler(
    State(state): State<AppState>,
    Query(params): Query<FrequencyParams>,
) -> Json<FrequencyReport> {
    Json(FrequencyRanker::new(&state.index).report(params.top, params.bottom))
}

pub async fn postings_handler(State(state): State<AppState>, Path(term): Path<String>) -> Json<PostingsResponse> {
    let postings = state.index.postings(&term).to_vec();
    Json(PostingsResponse { document_frequency: postings.len(), term, postings })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocResponse>, ApiError> {
    let external_id = state.index.external_id(doc_id)?.to_string();
    Ok(Json(DocResponse { doc_id, external_id }))
}
