// Upstream of the parsing engine: uploaded bytes → plain text, and the
// filename-derived fallback name applied after parsing.
// Extraction is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod extract;
pub mod naming;

pub use extract::{detect_format, extract_text};
pub use naming::apply_filename_fallback;
