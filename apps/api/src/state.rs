use std::sync::Arc;

use crate::config::Config;
use crate::parser::ResumeParser;
use crate::resumes::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable store. Postgres when DATABASE_URL is set, in-memory otherwise.
    pub store: Arc<dyn ResumeStore>,
    /// Stateless engine; one instance serves every request.
    pub parser: Arc<ResumeParser>,
    pub config: Config,
}
