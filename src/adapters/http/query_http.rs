//! Question-answering HTTP server.
//!
//! `GET /health` is a liveness probe with no dependencies. `POST /query`
//! runs the full pipeline for one question.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::models::{HealthStatus, ModelSelector, QueryResponse, ServerConfig};
use crate::infrastructure::logging::scrub_secrets;
use crate::services::QueryService;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct QueryHttpConfig {
    pub host: String,
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for QueryHttpConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for QueryHttpConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }
}

/// Body of `POST /query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    /// `groq` or `custom`; omitted means `groq`.
    #[serde(default)]
    pub model: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

/// An error as the HTTP caller sees it.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, detail: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                detail: detail.into(),
                code: code.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
            DomainError::Upstream(upstream) if upstream.is_timeout() => Self::new(
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "Upstream service timed out",
            ),
            DomainError::Upstream(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", "Upstream service failed")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_REQUEST",
            format!("Invalid request body: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Shared state for the HTTP server.
struct AppState {
    service: Arc<QueryService>,
}

/// Build the router. Exposed separately from the server so it can be
/// exercised without binding a socket.
pub fn build_router(service: Arc<QueryService>, enable_cors: bool) -> Router {
    let state = Arc::new(AppState { service });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/query", post(query))
        .route("/favicon.ico", get(favicon))
        .with_state(state);

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

/// Question-answering HTTP server.
pub struct QueryHttpServer {
    config: QueryHttpConfig,
    service: Arc<QueryService>,
}

impl QueryHttpServer {
    pub fn new(service: Arc<QueryService>, config: QueryHttpConfig) -> Self {
        Self { config, service }
    }

    /// Start the server and run until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.service, self.config.enable_cors);

        let host = self.config.host.trim_start_matches('[').trim_end_matches(']');
        let listener = TcpListener::bind((host, self.config.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", self.config.host, self.config.port))?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "query HTTP server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("query HTTP server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

// Handler functions

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.service.health_check())
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload?;
    let model = request
        .model
        .unwrap_or_else(|| ModelSelector::default().as_str().to_string());

    let span = tracing::info_span!("query", request_id = %Uuid::new_v4(), model = %model);

    async move {
        match state.service.answer_question_by_name(&request.question, &model).await {
            Ok(response) => Ok(Json(response)),
            Err(err) => {
                match &err {
                    DomainError::Validation(message) => tracing::info!(%message, "rejected query"),
                    DomainError::Upstream(upstream) => tracing::error!(
                        collaborator = %upstream.collaborator,
                        error = %scrub_secrets(&upstream.to_string()),
                        "query failed upstream"
                    ),
                }
                Err(ApiError::from(err))
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{Collaborator, UpstreamError};
    use std::time::Duration;

    #[test]
    fn test_error_status_mapping() {
        let validation = ApiError::from(DomainError::validation("Question cannot be empty"));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.detail, "Question cannot be empty");

        let timeout = ApiError::from(DomainError::from(UpstreamError::timeout(
            Collaborator::Custom,
            Duration::from_secs(300),
        )));
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);

        let failed = ApiError::from(DomainError::from(UpstreamError::status(
            Collaborator::Groq,
            401,
            "bad key gsk_abc",
        )));
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(failed.body.code, "UPSTREAM_ERROR");
        assert!(!failed.body.detail.contains("gsk_"));
    }

    #[test]
    fn test_request_model_is_optional() {
        let request: QueryRequest = serde_json::from_str(r#"{"question": "What is a qubit?"}"#).unwrap();
        assert_eq!(request.model, None);
    }

    fn mock_service() -> Arc<QueryService> {
        use crate::adapters::mock::{MockEmbeddingProvider, MockInferenceBackend, MockPassageStore};
        use crate::domain::models::RetrievalConfig;
        use crate::services::{InferenceDispatcher, PassageRetriever, PromptBuilder};

        let groq = Arc::new(MockInferenceBackend::answering(ModelSelector::Groq, "answer", 1));
        Arc::new(QueryService::new(
            Arc::new(MockEmbeddingProvider::default()),
            PassageRetriever::new(Arc::new(MockPassageStore::default()), None),
            PromptBuilder::default(),
            InferenceDispatcher::new(groq, None).unwrap(),
            RetrievalConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_binds_hostnames_and_ipv6_literals() {
        for host in ["localhost", "127.0.0.1", "[::1]", "::1"] {
            let config = QueryHttpConfig {
                host: host.to_string(),
                port: 0,
                enable_cors: false,
            };
            let result = QueryHttpServer::new(mock_service(), config)
                .serve_with_shutdown(async {})
                .await;
            // ::1 is absent on hosts without IPv6; only name resolution must not fail
            if let Err(err) = result {
                assert!(
                    host.contains(':') && !format!("{err:#}").contains("invalid socket address"),
                    "{host}: {err:#}"
                );
            }
        }
    }
}
