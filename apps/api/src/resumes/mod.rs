// Resume API: upload → extraction → parse → store, plus read-back endpoints.
// Extraction and parsing are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod store;

pub use store::{InMemoryResumeStore, NewParsedResume, PgResumeStore, ResumeStore};
