use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One stored parse. `data` holds the serialized `ParsedResume`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParsedResumeRow {
    pub id: Uuid,
    pub candidate_name: String,
    pub source_filename: Option<String>,
    pub text_chars: i32,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSummaryRow {
    pub id: Uuid,
    pub candidate_name: String,
    pub source_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ParsedResumeRow> for ResumeSummaryRow {
    fn from(row: &ParsedResumeRow) -> Self {
        ResumeSummaryRow {
            id: row.id,
            candidate_name: row.candidate_name.clone(),
            source_filename: row.source_filename.clone(),
            created_at: row.created_at,
        }
    }
}
