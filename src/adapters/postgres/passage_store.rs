//! pgvector implementation of the PassageStore.
//!
//! Rows hold a stored question, its answer and the embedding of both. The
//! answer is the passage body; source and question ride along as metadata.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::errors::{Collaborator, DomainResult, UpstreamError};
use crate::domain::models::{
    RetrievedPassage, SimilarityMetric, VectorStoreConfig, META_QUESTION, META_SOURCE,
};
use crate::domain::ports::PassageStore;

type PassageRow = (Option<String>, Option<String>, Option<String>, f64);

#[derive(Clone)]
pub struct PgPassageStore {
    pool: PgPool,
    sql: String,
    query_timeout: Duration,
    acquire_timeout: Duration,
}

impl PgPassageStore {
    /// # Errors
    /// Fails when the table name is not a plain (optionally schema-qualified)
    /// identifier.
    pub fn new(pool: PgPool, config: &VectorStoreConfig) -> anyhow::Result<Self> {
        if !is_valid_table_name(&config.table) {
            anyhow::bail!("invalid vector store table name '{}'", config.table);
        }
        Ok(Self {
            pool,
            sql: search_sql(&config.table, config.metric),
            query_timeout: Duration::from_secs(config.query_timeout_secs),
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
        })
    }

    fn map_error(&self, err: sqlx::Error) -> UpstreamError {
        match err {
            sqlx::Error::PoolTimedOut => UpstreamError::timeout(Collaborator::VectorStore, self.acquire_timeout),
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolClosed => {
                UpstreamError::unreachable(Collaborator::VectorStore, err.to_string())
            }
            other => UpstreamError::malformed(Collaborator::VectorStore, other.to_string()),
        }
    }
}

#[async_trait]
impl PassageStore for PgPassageStore {
    fn name(&self) -> &'static str {
        "pgvector"
    }

    async fn search(&self, vector: &[f32], top_k: usize) -> DomainResult<Vec<RetrievedPassage>> {
        let limit = i64::try_from(top_k).unwrap_or(i64::MAX);
        let query = sqlx::query_as::<_, PassageRow>(&self.sql)
            .bind(vector_literal(vector))
            .bind(limit)
            .fetch_all(&self.pool);

        let rows = tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| UpstreamError::timeout(Collaborator::VectorStore, self.query_timeout))?
            .map_err(|e| self.map_error(e))?;

        Ok(rows.into_iter().map(row_to_passage).collect())
    }
}

fn row_to_passage((source, question, answer, similarity): PassageRow) -> RetrievedPassage {
    let mut passage = RetrievedPassage::new(answer.unwrap_or_default(), similarity);
    if let Some(source) = source {
        passage = passage.with_metadata(META_SOURCE, source);
    }
    if let Some(question) = question {
        passage = passage.with_metadata(META_QUESTION, question);
    }
    passage
}

/// Render the similarity query for a table and metric.
///
/// `$1` is the query vector in pgvector text form, `$2` the row limit. The
/// score is oriented so that higher always means more similar.
pub fn search_sql(table: &str, metric: SimilarityMetric) -> String {
    let (operator, score) = match metric {
        SimilarityMetric::Cosine => ("<=>", "1 - (embedding <=> $1::vector)"),
        SimilarityMetric::InnerProduct => ("<#>", "(embedding <#> $1::vector) * -1"),
    };
    format!(
        "SELECT source, question, answer, {score} AS similarity \
         FROM {table} \
         ORDER BY embedding {operator} $1::vector \
         LIMIT $2"
    )
}

/// pgvector text literal: `[0.1,0.2,0.3]`.
pub fn vector_literal(vector: &[f32]) -> String {
    let parts: Vec<String> = vector.iter().map(f32::to_string).collect();
    format!("[{}]", parts.join(","))
}

/// Accepts `table` or `schema.table`, each part a plain SQL identifier.
pub fn is_valid_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2 && parts.iter().all(|part| is_identifier(part))
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
