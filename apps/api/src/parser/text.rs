//! Line-shape helpers shared by the segmenter and the record parsers.

/// Glyph bullets that may touch the text directly (`•Built`).
const GLYPH_BULLETS: &[char] = &['•', '●', '▪', '◦', '‣', '·', '■', '□', '➢', '►'];

/// ASCII-ish bullets that need a following space (`- Built`), so `-2020` or
/// `*nix` are left alone.
const SPACED_BULLETS: &[char] = &['-', '*', '–', '>', '+'];

/// Field separators seen on single-line records: `Title | Company | 2020`.
const FIELD_SEPARATORS: &[&str] = &[" | ", " • ", " · ", " — ", " – ", " - "];

/// Returns the text after a leading bullet marker, or `None` when the line is
/// not a bullet.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if GLYPH_BULLETS.contains(&first) {
        return Some(rest.trim());
    }
    if SPACED_BULLETS.contains(&first) && rest.starts_with(' ') {
        return Some(rest.trim());
    }
    None
}

pub fn is_bullet(line: &str) -> bool {
    strip_bullet(line).is_some()
}

/// Bullet-stripped content of a line.
pub fn content_of(line: &str) -> &str {
    strip_bullet(line).unwrap_or(line).trim()
}

/// Splits a line on the spaced separators used between record fields.
/// Empty parts are dropped.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut parts = vec![line];
    for sep in FIELD_SEPARATORS {
        parts = parts
            .into_iter()
            .flat_map(|p| p.split(sep))
            .collect();
    }
    parts
        .into_iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Upper-cases the first character and lower-cases the rest.
pub fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

pub fn starts_lowercase(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_lowercase())
}

/// Case-insensitive occurrence of `needle` in `haystack_lower` anchored at token
/// boundaries: the characters around the match are not alphanumeric.
/// `needle` must already be lower-case.
pub fn contains_token(haystack_lower: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack_lower.match_indices(needle).any(|(start, _)| {
        let before = haystack_lower[..start].chars().next_back();
        let after = haystack_lower[start + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

/// Trims separator punctuation left behind after cutting a field out of a line.
pub fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '|' | '-' | '–' | '—' | ',' | ':' | '•' | '(' | ')'))
}
