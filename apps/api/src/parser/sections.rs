//! Section Segmenter: finds heading lines and partitions the document.
//!
//! A heading candidate is a short line (< `HEADING_MAX_CHARS`, a handful of words,
//! no digits or sentence punctuation, not an institution name) containing a
//! keyword of some section kind as a whole word. It must also *look* like a
//! heading: upper-case, colon-terminated, made only of heading words, or
//! capitalised words joined by `&` / `and`.
//! Kinds are tried in `HEADING_KEYWORDS` order and the first match wins, so
//! `Projects & Experience` is an Experience heading. Front matter before the first
//! heading belongs to no section.

use regex::Regex;

use crate::parser::experience::ROLE_PATTERN;
use crate::parser::model::{Section, SectionKind};
use crate::parser::normalize::NormalizedText;
use crate::parser::text::{contains_token, is_bullet};

pub const HEADING_MAX_CHARS: usize = 50;

/// `Professional Development and Certifications` is about as long as a heading gets.
const MAX_HEADING_WORDS: usize = 5;

const SENTENCE_PUNCTUATION: &[char] = &['.', '!', '?', ';'];

/// Lower-case words allowed inside a Title-Case heading.
const CONNECTORS: &[&str] = &["&", "and", "/", "of", "the", "+"];

/// Institution names carry education keywords but open records, not sections.
const INSTITUTION_PATTERN: &str =
    r"(?i)\b(?:university|college|institute|school|academy|polytechnic)\b";

/// Keyword table in tie-break priority order.
const HEADING_KEYWORDS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Experience,
        &["experience", "employment", "work history", "career history", "internship"],
    ),
    (
        SectionKind::Education,
        &["education", "degree", "university", "academic"],
    ),
    (
        SectionKind::Skills,
        &["skill", "technologies", "competencies", "proficiencies", "tech stack", "expertise"],
    ),
    (SectionKind::Projects, &["project", "portfolio"]),
    (
        SectionKind::Summary,
        &["summary", "objective", "about", "profile"],
    ),
    (
        SectionKind::Certifications,
        &["certification", "certificate", "achievement", "award", "license", "accomplishment"],
    ),
];

/// Headings of sections the engine does not extract. They still close the
/// preceding section so their lines do not leak into it.
const OTHER_HEADINGS: &[&str] = &[
    "interests",
    "hobbies",
    "references",
    "volunteer",
    "publications",
    "activities",
    "extracurricular",
    "personal information",
    "personal details",
    "additional information",
    "contact",
];

/// Words allowed around a keyword in a heading (`Relevant Work Experience`).
const FILLER_WORDS: &[&str] = &[
    "work", "professional", "technical", "relevant", "key", "core", "personal", "academic",
    "selected", "career", "history", "background", "other", "additional", "and", "my", "me",
    "of", "the", "side", "notable", "recent", "areas", "information", "details", "stack", "tech",
    "honors", "honours", "qualifications", "highlights", "summary", "experience", "skills",
    "executive", "leadership", "volunteer", "volunteering", "training", "abilities",
    "publications", "languages", "tools", "frameworks", "courses", "coursework", "development",
    "community", "involvement", "research", "interests", "activities", "affiliations",
    "memberships", "positions", "teaching", "industry",
];

/// Finds section headings and splits the normalized text into sections.
#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    /// Job titles such as `PROJECT MANAGER` are record lines, not headings.
    role: Regex,
    institution: Regex,
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionSegmenter {
    pub fn new() -> Self {
        Self {
            role: Regex::new(ROLE_PATTERN).expect("role pattern"),
            institution: Regex::new(INSTITUTION_PATTERN).expect("institution pattern"),
        }
    }

    /// Single left-to-right scan; each heading's section runs up to the next one.
    pub fn segment(&self, text: &NormalizedText) -> Vec<Section> {
        let mut sections = Vec::new();
        if text.is_empty() {
            return sections;
        }
        let mut current: Option<Section> = None;

        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                if let Some(section) = current.as_mut() {
                    section.lines.push(String::new());
                    section.end_line = index + 1;
                }
                continue;
            }

            if let Some(kind) = self.heading_kind(line) {
                if let Some(done) = current.take() {
                    sections.push(close(done));
                }
                current = Some(Section {
                    kind,
                    heading_text: line.trim_end_matches(':').trim().to_string(),
                    lines: Vec::new(),
                    start_line: index + 1,
                    end_line: index + 1,
                });
                continue;
            }

            if let Some((kind, heading, rest)) = self.inline_heading(line) {
                if let Some(done) = current.take() {
                    sections.push(close(done));
                }
                current = Some(Section {
                    kind,
                    heading_text: heading.to_string(),
                    lines: vec![rest.to_string()],
                    start_line: index,
                    end_line: index + 1,
                });
                continue;
            }

            if let Some(section) = current.as_mut() {
                section.lines.push(line.to_string());
                section.end_line = index + 1;
            }
        }

        if let Some(done) = current.take() {
            sections.push(close(done));
        }

        tracing::debug!(
            "Segmented {} lines into {} sections",
            text.line_count(),
            sections.len()
        );
        sections
    }

    /// Section kind of a heading line, or `None` for ordinary content.
    pub fn heading_kind(&self, line: &str) -> Option<SectionKind> {
        let line = line.trim();
        if line.is_empty() || line.chars().count() >= HEADING_MAX_CHARS || is_bullet(line) {
            return None;
        }
        if line.contains('@')
            || line.contains("://")
            || line.chars().any(|c| c.is_ascii_digit() || SENTENCE_PUNCTUATION.contains(&c))
        {
            return None;
        }

        let lower = line.to_lowercase();
        let words = heading_words(&lower);
        if words.len() > MAX_HEADING_WORDS || self.institution.is_match(line) {
            return None;
        }
        let all_heading_words = words.iter().all(|w| is_heading_word(w));
        if self.role.is_match(line) && !all_heading_words {
            return None;
        }
        let shaped = all_heading_words
            || is_upper_case(line)
            || line.ends_with(':')
            || is_joined_title(line);

        let keyword_kind = HEADING_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| has_keyword(&lower, &words, k)))
            .map(|(kind, _)| *kind);
        if let Some(kind) = keyword_kind {
            return shaped.then_some(kind);
        }

        let other = OTHER_HEADINGS.iter().any(|h| has_keyword(&lower, &words, h));
        let shaped = shaped
            || words
                .iter()
                .all(|w| OTHER_HEADINGS.iter().any(|h| h.split(' ').any(|p| p == *w)));
        (other && shaped).then_some(SectionKind::Unknown)
    }

    /// `Skills: Python, Rust`: a skills label followed by content on one line.
    fn inline_heading<'a>(&self, line: &'a str) -> Option<(SectionKind, &'a str, &'a str)> {
        let (label, rest) = line.split_once(':')?;
        let label = label.trim();
        let rest = rest.trim();
        if rest.is_empty() || label.chars().count() > 30 || is_bullet(label) {
            return None;
        }
        let lower = label.to_lowercase();
        if !lower.contains("skill") {
            return None;
        }
        heading_words(&lower)
            .iter()
            .all(|w| is_heading_word(w))
            .then_some((SectionKind::Skills, label, rest))
    }
}

fn close(mut section: Section) -> Section {
    while section.lines.last().is_some_and(|l| l.is_empty()) {
        section.lines.pop();
        section.end_line -= 1;
    }
    section
}

fn heading_words(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn is_heading_word(word: &str) -> bool {
    if FILLER_WORDS.contains(&word) {
        return true;
    }
    HEADING_KEYWORDS.iter().any(|(_, keywords)| {
        keywords.iter().any(|k| {
            if k.contains(' ') {
                k.split(' ').any(|part| part == word)
            } else {
                is_keyword_word(word, k)
            }
        })
    })
}

/// Whole-word match, plurals included: `project` matches `Projects` but not `Projection`.
fn is_keyword_word(word: &str, keyword: &str) -> bool {
    word == keyword
        || word
            .strip_prefix(keyword)
            .is_some_and(|rest| rest == "s" || rest == "es")
}

fn has_keyword(lower: &str, words: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        contains_token(lower, keyword)
    } else {
        words.iter().any(|w| is_keyword_word(w, keyword))
    }
}

/// `Education & Training`: capitalised words joined by a connector.
fn is_joined_title(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    let joined = words.iter().any(|w| CONNECTORS.contains(&w.to_lowercase().as_str()));
    joined
        && words.iter().all(|w| {
            CONNECTORS.contains(&w.to_lowercase().as_str())
                || w.chars().next().is_some_and(char::is_uppercase)
        })
}

fn is_upper_case(line: &str) -> bool {
    line.chars().any(|c| c.is_alphabetic()) && !line.chars().any(|c| c.is_lowercase())
}
