use crate::config::ServerConfig;
use crate::http_api::ApiError;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use ragcore_llm::{HttpTransport, LlmClient, ModelInvoker};
use ragcore_pipeline::{
    Document, IngestReport, MemoryRetriever, ModelNames, QueryAnswer, QueryParams, RagEngine,
};
use ragcore_protocol::{scope, CallContext};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<RagEngine<HttpTransport>>,
}

impl AppState {
    pub fn new(engine: Arc<RagEngine<HttpTransport>>) -> Self {
        Self { engine }
    }
}

/// Wires transport, invoker, cache, and retriever from the config.
pub fn build_engine(config: &ServerConfig) -> Arc<RagEngine<HttpTransport>> {
    let transport = HttpTransport::new(config.llm_base_url.clone(), config.llm_api_key.clone());
    let invoker = ModelInvoker::new(transport).with_max_attempts(config.max_attempts);
    let llm = Arc::new(LlmClient::new(invoker, config.cache_capacity));
    Arc::new(RagEngine::new(
        llm,
        Arc::new(MemoryRetriever::new()),
        ModelNames {
            query_model: config.query_model.clone(),
            build_model: config.build_model.clone(),
        },
    ))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/query", post(query))
        .route("/api/documents", post(ingest))
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(build_engine(&config));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("ragcore-server listening on {}", config.bind_addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[derive(Deserialize)]
struct QueryRequest {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

/// Public query boundary.
///
/// The one place in the system that establishes `UserQuery`: everything the
/// engine does on behalf of this request, however deep, observes that
/// context. No other entry point is permitted to mark traffic this way.
async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryAnswer>, ApiError> {
    let params = QueryParams {
        limit: request.limit.unwrap_or_else(|| QueryParams::default().limit),
    };
    let answer = scope(
        CallContext::user_query(),
        state.engine.query(&request.query, &params),
    )
    .await?;
    Ok(Json(answer))
}

#[derive(Deserialize)]
struct IngestRequest {
    id: String,
    text: String,
}

/// Ingestion trigger. Deliberately establishes no context: knowledge-base
/// construction runs under the internal default.
async fn ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestReport>, ApiError> {
    let report = state
        .engine
        .ingest(Document {
            id: request.id,
            text: request.text,
        })
        .await?;
    Ok(Json(report))
}
