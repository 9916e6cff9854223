//! Composition root
//!
//! Turns a validated [`Config`] into a ready [`QueryService`]. Every client
//! is built once here and shared by all requests.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::embeddings::VoyageEmbeddingProvider;
use crate::adapters::inference::{GroqBackend, ModalBackend};
use crate::adapters::postgres::{pool_from_config, PgPassageStore};
use crate::domain::models::Config;
use crate::domain::ports::{EmbeddingProvider, InferenceBackend};
use crate::services::{InferenceDispatcher, PassageRetriever, PromptBuilder, QueryService};

/// Wire the production collaborators.
pub fn build_query_service(config: &Config) -> Result<QueryService> {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        VoyageEmbeddingProvider::new(&config.embedding).context("Failed to create embedding provider")?,
    );

    let pool = pool_from_config(&config.vector_store).context("Failed to create database pool")?;
    let store = PgPassageStore::new(pool, &config.vector_store).context("Failed to create passage store")?;
    let retriever = PassageRetriever::new(Arc::new(store), Some(embedder.dimension()));

    let groq: Arc<dyn InferenceBackend> =
        Arc::new(GroqBackend::new(&config.groq).context("Failed to create Groq client")?);
    let custom = ModalBackend::from_config(&config.custom)
        .context("Failed to create custom model client")?
        .map(|backend| Arc::new(backend) as Arc<dyn InferenceBackend>);

    if custom.is_none() {
        tracing::warn!("MODAL_URL not set; the custom model is disabled");
    }

    tracing::info!(
        embedding_model = %config.embedding.model,
        table = %config.vector_store.table,
        metric = ?config.vector_store.metric,
        groq_model = %config.groq.model,
        custom_enabled = custom.is_some(),
        "query pipeline ready"
    );

    let dispatcher = InferenceDispatcher::new(groq, custom)?;

    Ok(QueryService::new(
        embedder,
        retriever,
        PromptBuilder::from_config(&config.retrieval),
        dispatcher,
        config.retrieval.clone(),
    ))
}
