//! Filename-derived fallback naming, applied only when the engine fell back to
//! the sentinel name.

use crate::parser::text::title_case_word;
use crate::parser::{ParsedResume, SENTINEL_NAME};

/// Words that label the document rather than the person.
const NOISE_WORDS: &[&str] = &["resume", "cv", "résumé", "curriculum", "vitae", "final", "updated"];

/// `jane_smith-resume-2024.pdf` → `Jane Smith`.
pub fn name_from_filename(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };

    let words: Vec<String> = stem
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '.'))
        .filter(|w| !w.is_empty())
        .filter(|w| !NOISE_WORDS.contains(&w.to_lowercase().as_str()))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .map(title_case_word)
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

/// Replaces a sentinel name with the filename-derived one. Returns whether the
/// name changed.
pub fn apply_filename_fallback(resume: &mut ParsedResume, filename: Option<&str>) -> bool {
    if resume.contact.name != SENTINEL_NAME {
        return false;
    }
    match filename.and_then(name_from_filename) {
        Some(name) => {
            resume.contact.name = name;
            true
        }
        None => false,
    }
}
