//! Persistence of parsed resumes behind a pluggable store.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`: `PgResumeStore` when
//! `DATABASE_URL` is set, `InMemoryResumeStore` otherwise and in tests.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ParsedResumeRow, ResumeSummaryRow};
use crate::parser::ParsedResume;

/// A parse result about to be stored.
#[derive(Debug, Clone)]
pub struct NewParsedResume {
    pub source_filename: Option<String>,
    pub text_chars: i32,
    pub resume: ParsedResume,
}

impl NewParsedResume {
    fn into_row(self) -> Result<ParsedResumeRow, AppError> {
        let data = serde_json::to_value(&self.resume)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
        Ok(ParsedResumeRow {
            id: Uuid::new_v4(),
            candidate_name: self.resume.contact.name,
            source_filename: self.source_filename,
            text_chars: self.text_chars,
            data,
            created_at: Utc::now(),
        })
    }
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn save(&self, new: NewParsedResume) -> Result<ParsedResumeRow, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ParsedResumeRow>, AppError>;

    /// Newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<ResumeSummaryRow>, AppError>;
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn save(&self, new: NewParsedResume) -> Result<ParsedResumeRow, AppError> {
        let row = new.into_row()?;
        let stored: ParsedResumeRow = sqlx::query_as(
            r#"
            INSERT INTO parsed_resumes
                (id, candidate_name, source_filename, text_chars, data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(&row.candidate_name)
        .bind(&row.source_filename)
        .bind(row.text_chars)
        .bind(&row.data)
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ParsedResumeRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM parsed_resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ResumeSummaryRow>, AppError> {
        let rows = sqlx::query_as(
            r#"
            SELECT id, candidate_name, source_filename, created_at
            FROM parsed_resumes
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Process-local store; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryResumeStore {
    rows: RwLock<Vec<ParsedResumeRow>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn save(&self, new: NewParsedResume) -> Result<ParsedResumeRow, AppError> {
        let row = new.into_row()?;
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ParsedResumeRow>, AppError> {
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ResumeSummaryRow>, AppError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        // Rows are appended in creation order.
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .map(ResumeSummaryRow::from)
            .collect())
    }
}
