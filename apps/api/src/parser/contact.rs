//! Contact extractor. Scans the whole normalized text, independent of sections.
//!
//! The candidate name comes from a strategy chain, first success wins:
//! an explicit `Name:` label, a name-shaped header line, a Title-Case line near the
//! top, the local part of the email address, and finally `SENTINEL_NAME`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parser::experience::ROLE_PATTERN;
use crate::parser::model::{ContactInfo, SENTINEL_NAME};
use crate::parser::normalize::NormalizedText;
use crate::parser::sections::SectionSegmenter;
use crate::parser::skills::is_skill_keyword;
use crate::parser::text::title_case_word;

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";
const PHONE_PATTERN: &str =
    r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{1,4}\)[\s.-]?)?\d{2,4}[\s.-]?\d{2,4}[\s.-]?\d{2,5}";
const LINKEDIN_PATTERN: &str =
    r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/([A-Za-z0-9_%-]+)/?";
const GITHUB_PATTERN: &str =
    r"(?i)(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)";
const WEBSITE_PATTERN: &str = r"(?i)^(?:https?://)?(?:www\.)?[a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:com|io|dev|me|org|net|co|ai|app|tech|site|xyz|page|info|blog)(?:/\S*)?$";
const NAME_LABEL_PATTERN: &str =
    r"(?i)^(?:full\s+name|candidate(?:\s+name)?|applicant(?:\s+name)?|name)\s*[:\-–]\s*(.+)$";

/// Symbols a name-shaped line never contains.
const NAME_FORBIDDEN: &str = "!@#$%^&*()_+={}[]|\\:;\"'<>?,./";

const PHONE_MIN_DIGITS: usize = 9;
const PHONE_MAX_DIGITS: usize = 15;
const HEADER_LINES: usize = 5;
const TITLE_CASE_LINES: usize = 10;
const WEBSITE_LINES: usize = 10;

/// Which strategy of the chain produced the candidate name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    Label,
    Header,
    TitleCase,
    Email,
    Sentinel,
    /// Set by callers that replaced the sentinel with a filename-derived name.
    Filename,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactExtraction {
    pub contact: ContactInfo,
    pub name_source: NameSource,
}

#[derive(Debug, Clone)]
pub struct ContactExtractor {
    email: Regex,
    phone: Regex,
    linkedin: Regex,
    github: Regex,
    website: Regex,
    name_label: Regex,
    role: Regex,
    headings: SectionSegmenter,
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactExtractor {
    pub fn new() -> Self {
        Self {
            email: Regex::new(EMAIL_PATTERN).expect("email pattern"),
            phone: Regex::new(PHONE_PATTERN).expect("phone pattern"),
            linkedin: Regex::new(LINKEDIN_PATTERN).expect("linkedin pattern"),
            github: Regex::new(GITHUB_PATTERN).expect("github pattern"),
            website: Regex::new(WEBSITE_PATTERN).expect("website pattern"),
            name_label: Regex::new(NAME_LABEL_PATTERN).expect("name label pattern"),
            role: Regex::new(ROLE_PATTERN).expect("role pattern"),
            headings: SectionSegmenter::new(),
        }
    }

    pub fn extract(&self, text: &NormalizedText) -> ContactExtraction {
        let full = text.as_str();
        let email = self
            .email
            .find(full)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let (name, name_source) = self.resolve_name(text, &email);
        debug!(?name_source, "Resolved candidate name");

        ContactExtraction {
            contact: ContactInfo {
                name,
                phone: self.phone(full),
                linkedin: self.linkedin(full),
                github: self.github(full),
                website: self.website(text),
                email,
            },
            name_source,
        }
    }

    fn resolve_name(&self, text: &NormalizedText, email: &str) -> (String, NameSource) {
        if let Some(name) = self.labelled_name(text) {
            return (name, NameSource::Label);
        }
        if let Some(name) = text
            .content_lines()
            .take(HEADER_LINES)
            .find(|l| self.is_name_candidate(l) && is_name_shaped(l))
        {
            return (name.to_string(), NameSource::Header);
        }
        if let Some(name) = text
            .content_lines()
            .take(TITLE_CASE_LINES)
            .find(|l| self.is_name_candidate(l) && is_title_case_name(l))
        {
            return (name.to_string(), NameSource::TitleCase);
        }
        if let Some(name) = name_from_email(email) {
            return (name, NameSource::Email);
        }
        (SENTINEL_NAME.to_string(), NameSource::Sentinel)
    }

    fn labelled_name(&self, text: &NormalizedText) -> Option<String> {
        text.content_lines().find_map(|line| {
            let value = self.name_label.captures(line)?.get(1)?.as_str().trim();
            is_name_shaped(value).then(|| value.to_string())
        })
    }

    /// Header lines that may hold a name: no contact details, no section
    /// heading, no job title.
    fn is_name_candidate(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        !line.contains('@')
            && !lower.contains("http")
            && !lower.contains("www.")
            && !self.phone.is_match(line)
            && !self.role.is_match(line)
            && self.headings.heading_kind(line).is_none()
    }

    fn phone(&self, text: &str) -> String {
        self.phone
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .find(|candidate| {
                let digits = candidate.chars().filter(char::is_ascii_digit).count();
                (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
            })
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn linkedin(&self, text: &str) -> String {
        self.linkedin
            .captures(text)
            .map(|caps| canonical_profile(&caps[0], "https://linkedin.com/in/", &caps[1]))
            .unwrap_or_default()
    }

    fn github(&self, text: &str) -> String {
        self.github
            .captures(text)
            .map(|caps| canonical_profile(&caps[0], "https://github.com/", &caps[1]))
            .unwrap_or_default()
    }

    /// First URL-like token near the top that is not an email or a profile link.
    fn website(&self, text: &NormalizedText) -> String {
        text.content_lines()
            .take(WEBSITE_LINES)
            .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == '|'))
            .map(|token| token.trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')' | '<' | '>')))
            .map(|token| token.trim_end_matches('.'))
            .find(|token| {
                let lower = token.to_lowercase();
                !token.contains('@')
                    && !lower.contains("linkedin.com")
                    && !lower.contains("github.com")
                    && self.website.is_match(token)
                    && (has_explicit_url_marker(&lower) || is_bare_site(token))
            })
            .map(|token| {
                if token.starts_with("http://") || token.starts_with("https://") {
                    token.trim_end_matches('/').to_string()
                } else {
                    format!("https://{}", token.trim_end_matches('/'))
                }
            })
            .unwrap_or_default()
    }
}

fn has_explicit_url_marker(lower: &str) -> bool {
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("www.")
        || lower.trim_end_matches('/').contains('/')
}

/// `janesmith.dev` counts; `Socket.io` and `ASP.NET` are technologies.
fn is_bare_site(token: &str) -> bool {
    !token.chars().any(char::is_uppercase) && !is_skill_keyword(token)
}

/// Keeps a match that already has a scheme; otherwise rebuilds the canonical URL.
fn canonical_profile(matched: &str, base: &str, id: &str) -> String {
    if matched.starts_with("http://") || matched.starts_with("https://") {
        matched.trim_end_matches('/').to_string()
    } else {
        format!("{base}{id}")
    }
}

/// 2–4 words, each capitalised, no digits or punctuation.
pub fn is_name_shaped(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words.iter().all(|word| {
            word.chars().next().is_some_and(char::is_uppercase)
                && !word
                    .chars()
                    .any(|c| c.is_ascii_digit() || NAME_FORBIDDEN.contains(c))
        })
}

/// Title-Case line of 2–4 words: `O'Brien`, `Mary-Jane` and `J.` are accepted.
fn is_title_case_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len()) && words.iter().all(|w| is_title_case_word(w))
}

fn is_title_case_word(word: &str) -> bool {
    let mut chars = word.chars();
    if !chars.next().is_some_and(char::is_uppercase) {
        return false;
    }
    let mut previous = ' ';
    for c in chars {
        let ok = c.is_lowercase()
            || matches!(c, '\'' | '-' | '.')
            || (c.is_uppercase() && matches!(previous, '\'' | '-'));
        if !ok {
            return false;
        }
        previous = c;
    }
    true
}

/// `jane.smith92@example.com` → `Jane Smith`.
fn name_from_email(email: &str) -> Option<String> {
    let local = email.split('@').next()?;
    let cleaned: String = local
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .map(|c| if matches!(c, '.' | '_') { ' ' } else { c })
        .collect();
    let name = cleaned
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> ContactExtraction {
        ContactExtractor::new().extract(&NormalizedText::new(raw))
    }

    #[test]
    fn test_header_name_and_email() {
        let result = extract("Jane Smith\njane.smith@example.com\n\nEXPERIENCE\nSoftware Engineer");
        assert_eq!(result.contact.name, "Jane Smith");
        assert_eq!(result.contact.email, "jane.smith@example.com");
        assert_eq!(result.name_source, NameSource::Header);
    }

    #[test]
    fn test_label_wins_over_header() {
        let result = extract("CURRICULUM VITAE\nJohn Doe Jr\nName: Maria Garcia\n");
        assert_eq!(result.contact.name, "Maria Garcia");
        assert_eq!(result.name_source, NameSource::Label);
    }

    #[test]
    fn test_job_title_line_is_not_a_name() {
        let result = extract("Senior Software Engineer\nAlex Kim\nalex@example.com");
        assert_eq!(result.contact.name, "Alex Kim");
    }

    #[test]
    fn test_title_case_strategy_accepts_apostrophes() {
        let result = extract("Seán O'Brien\nDublin");
        assert_eq!(result.contact.name, "Seán O'Brien");
        assert_eq!(result.name_source, NameSource::TitleCase);
    }

    #[test]
    fn test_name_from_email_local_part() {
        let result = extract("contact: jane_doe92@example.com\nlooking for roles");
        assert_eq!(result.contact.name, "Jane Doe");
        assert_eq!(result.name_source, NameSource::Email);
    }

    #[test]
    fn test_sentinel_when_nothing_matches() {
        let result = extract("hello world");
        assert_eq!(result.contact.name, SENTINEL_NAME);
        assert_eq!(result.name_source, NameSource::Sentinel);
        assert_eq!(result.contact.email, "");
        assert_eq!(result.contact.phone, "");
    }

    #[test]
    fn test_phone_variants() {
        assert_eq!(extract("Call (555) 123-4567").contact.phone, "(555) 123-4567");
        assert_eq!(extract("+1 555-123-4567").contact.phone, "+1 555-123-4567");
        assert_eq!(extract("Acme 2020 - 2023").contact.phone, "");
    }

    #[test]
    fn test_profiles_get_canonical_scheme() {
        let result = extract("Jane Smith\nlinkedin.com/in/janesmith | github.com/jsmith");
        assert_eq!(result.contact.linkedin, "https://linkedin.com/in/janesmith");
        assert_eq!(result.contact.github, "https://github.com/jsmith");
    }

    #[test]
    fn test_profile_with_scheme_kept_as_matched() {
        let result = extract("https://www.linkedin.com/in/jane-smith/");
        assert_eq!(result.contact.linkedin, "https://www.linkedin.com/in/jane-smith");
    }

    #[test]
    fn test_website_skips_email_and_profiles() {
        let result = extract(
            "Jane Smith\njane@smith.dev | github.com/jsmith | janesmith.dev\n",
        );
        assert_eq!(result.contact.website, "https://janesmith.dev");
    }

    #[test]
    fn test_technology_names_are_not_websites() {
        let result = extract("Jane Smith\nFull-stack developer: React, Socket.io, ASP.NET\n");
        assert_eq!(result.contact.website, "");

        let result = extract("Jane Smith\nnode.js, socket.io | www.janesmith.dev\n");
        assert_eq!(result.contact.website, "https://www.janesmith.dev");

        let result = extract("Jane Smith\nPortfolio: JaneSmith.dev/work\n");
        assert_eq!(result.contact.website, "https://JaneSmith.dev/work");
    }

    #[test]
    fn test_name_shape_check() {
        assert!(is_name_shaped("Jane Smith"));
        assert!(is_name_shaped("Mary Ann De Vries"));
        assert!(!is_name_shaped("Jane"));
        assert!(!is_name_shaped("jane smith"));
        assert!(!is_name_shaped("Jane Smith, PhD"));
        assert!(!is_name_shaped("One Two Three Four Five"));
        assert!(!is_name_shaped("Room 101 Plaza"));
    }
}
