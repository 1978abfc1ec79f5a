//! Projects parser: titles open records, `Key: value` lines fill fields, URL
//! lines resolve to `link` or `github`, everything else is description.

use regex::Regex;
use tracing::debug;

use crate::parser::dates::DatePatterns;
use crate::parser::model::ProjectEntry;
use crate::parser::records::{Draft, RecordSequence};
use crate::parser::text::{split_fields, starts_lowercase, strip_bullet, trim_separators};

const URL_PATTERN: &str = r"(?i)(?:https?://|www\.)[^\s<>()|,]+|\b(?:[a-z0-9-]+\.)+(?:com|io|dev|app|org|net|me|co|ai|tech|site|xyz|page|sh)/[^\s<>()|,]*";
const KEY_VALUE_PATTERN: &str = r"^([A-Za-z][A-Za-z /&]{0,29}?)\s*:\s*(.+)$";
const OWNER_REPO_PATTERN: &str = r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+/?$";

const MAX_TITLE_CHARS: usize = 60;
const MAX_TITLE_WORDS: usize = 8;
/// A `Title - suffix` suffix longer than this is prose, not a technology list.
const MAX_INLINE_TECH_WORDS: usize = 3;

const TECHNOLOGY_KEYS: &[&str] = &[
    "technologies", "technology", "tech stack", "tech", "built with", "stack", "tools",
    "frameworks", "languages",
];
const REPO_KEYS: &[&str] = &["github", "repository", "repo", "source", "code"];
const LINK_KEYS: &[&str] = &["live", "demo", "url", "link", "website", "deployed", "site"];
const DESCRIPTION_KEYS: &[&str] = &["description", "about", "overview", "summary"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectKey {
    Technologies,
    Repo,
    Link,
    Description,
}

impl ProjectKey {
    /// Key groups are tried in declaration order; `GitHub Link` is a repo.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        let groups = [
            (Self::Technologies, TECHNOLOGY_KEYS),
            (Self::Repo, REPO_KEYS),
            (Self::Link, LINK_KEYS),
            (Self::Description, DESCRIPTION_KEYS),
        ];
        groups
            .into_iter()
            .find(|(_, keys)| keys.iter().any(|k| label.contains(k)))
            .map(|(key, _)| key)
    }
}

#[derive(Debug, Default)]
struct ProjectDraft {
    name: String,
    description: Vec<String>,
    technologies: Vec<String>,
    link: String,
    github: String,
}

impl ProjectDraft {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn has_content(&self) -> bool {
        self.has_body() || !self.technologies.is_empty()
    }

    /// Description or links; a technology list alone does not close a project.
    fn has_body(&self) -> bool {
        !self.description.is_empty() || !self.link.is_empty() || !self.github.is_empty()
    }

    /// Adds a `,`/`;`/`|` separated list, skipping case-insensitive duplicates.
    fn add_technologies(&mut self, list: &str) {
        for item in list.split([',', ';', '|']) {
            let item = trim_separators(item);
            if item.is_empty() {
                continue;
            }
            if !self.technologies.iter().any(|t| t.eq_ignore_ascii_case(item)) {
                self.technologies.push(item.to_string());
            }
        }
    }

    /// One ambiguous URL line assigns at most one of `github` / `link`.
    /// Explicit cues win over the position-based default.
    fn assign_url(&mut self, line: &str, url: String) {
        let lower = line.to_lowercase();
        if lower.contains("github") {
            if self.github.is_empty() {
                self.github = url;
            }
        } else if ["live", "demo", "deployed"].iter().any(|cue| lower.contains(cue)) {
            if self.link.is_empty() {
                self.link = url;
            }
        } else if self.link.is_empty() {
            self.link = url;
        } else if self.github.is_empty() {
            self.github = url;
        }
    }
}

impl Draft for ProjectDraft {
    type Entry = ProjectEntry;

    fn finalize(self) -> Option<ProjectEntry> {
        if self.name.is_empty() && !self.has_content() {
            return None;
        }
        Some(ProjectEntry {
            name: self.name,
            description: self.description.join(" "),
            technologies: self.technologies,
            link: self.link,
            github: self.github,
        })
    }
}

enum ProjectLine<'a> {
    Field(ProjectKey, &'a str),
    Url(&'a str),
    Title(&'a str),
    Detail(&'a str),
}

#[derive(Debug, Clone)]
pub struct ProjectParser {
    url: Regex,
    key_value: Regex,
    owner_repo: Regex,
    dates: DatePatterns,
}

impl Default for ProjectParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectParser {
    pub fn new() -> Self {
        Self {
            url: Regex::new(URL_PATTERN).expect("url pattern"),
            key_value: Regex::new(KEY_VALUE_PATTERN).expect("key-value pattern"),
            owner_repo: Regex::new(OWNER_REPO_PATTERN).expect("owner/repo pattern"),
            dates: DatePatterns::new(),
        }
    }

    /// Blank lines are significant here: a title-shaped line after a blank line
    /// always opens a new project.
    pub fn parse<'a, I>(&self, lines: I) -> Vec<ProjectEntry>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut records: RecordSequence<ProjectDraft> = RecordSequence::new();
        let mut after_blank = false;

        for line in lines.into_iter().map(str::trim) {
            if line.is_empty() {
                after_blank = true;
                continue;
            }
            match self.classify(line, after_blank, records.current()) {
                ProjectLine::Field(key, value) => self.apply_field(&mut records, key, value),
                ProjectLine::Url(text) => self.apply_url(&mut records, text),
                ProjectLine::Title(text) => self.apply_title(&mut records, text),
                ProjectLine::Detail(text) => {
                    if let Some(draft) = records.current_mut() {
                        draft.description.push(text.to_string());
                    }
                }
            }
            after_blank = false;
        }

        let entries = records.finish();
        debug!("Parsed {} project entries", entries.len());
        entries
    }

    fn classify<'a>(
        &self,
        line: &'a str,
        after_blank: bool,
        current: Option<&ProjectDraft>,
    ) -> ProjectLine<'a> {
        let (bulleted, text) = match strip_bullet(line) {
            Some(text) => (true, text),
            None => (false, line),
        };

        if let Some((key, value)) = self.key_value(text) {
            return ProjectLine::Field(key, value);
        }
        if self.url.is_match(text) {
            return ProjectLine::Url(text);
        }
        let opens = match current {
            None => true,
            Some(draft) => draft.has_body() || after_blank,
        };
        if !bulleted && opens && self.is_title_shaped(text) {
            return ProjectLine::Title(text);
        }
        ProjectLine::Detail(text)
    }

    fn key_value<'a>(&self, text: &'a str) -> Option<(ProjectKey, &'a str)> {
        let caps = self.key_value.captures(text)?;
        let label = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str().trim();
        // `https://...` splits at the scheme colon; that is a URL line.
        if value.starts_with("//") {
            return None;
        }
        ProjectKey::from_label(label).map(|key| (key, value))
    }

    fn is_title_shaped(&self, line: &str) -> bool {
        line.chars().count() <= MAX_TITLE_CHARS
            && !line.ends_with('.')
            && !starts_lowercase(line)
            && line.split_whitespace().count() <= MAX_TITLE_WORDS
            && !self.dates.is_date_line(line)
    }

    fn apply_field(&self, records: &mut RecordSequence<ProjectDraft>, key: ProjectKey, value: &str) {
        let draft = records.current_or_start();
        match key {
            ProjectKey::Technologies => draft.add_technologies(value),
            ProjectKey::Repo => {
                if draft.github.is_empty() {
                    draft.github = self.repo_url(value);
                }
            }
            ProjectKey::Link => {
                if draft.link.is_empty() {
                    draft.link = self.link_url(value);
                }
            }
            ProjectKey::Description => draft.description.push(value.to_string()),
        }
    }

    fn apply_url(&self, records: &mut RecordSequence<ProjectDraft>, line: &str) {
        let Some(found) = self.url.find(line) else {
            return;
        };
        let url = with_scheme(found.as_str());

        if records.current().is_none() {
            let leading = trim_separators(&line[..found.start()]);
            if !leading.is_empty() {
                records.start(ProjectDraft::named(leading));
            }
        }
        records.current_or_start().assign_url(line, url);
    }

    /// `Habit Tracker | React, Node.js` or `Habit Tracker (React, Node.js)`.
    fn apply_title(&self, records: &mut RecordSequence<ProjectDraft>, line: &str) {
        let line = self.dates.strip(line);
        let (name, technologies, description) = split_title(&line);

        match records.current_mut() {
            Some(draft) if draft.name.is_empty() => draft.name = name.to_string(),
            _ => records.start(ProjectDraft::named(name)),
        }
        let draft = records.current_or_start();
        if let Some(list) = technologies {
            draft.add_technologies(list);
        }
        if let Some(text) = description {
            draft.description.push(text.to_string());
        }
    }

    fn repo_url(&self, value: &str) -> String {
        if let Some(found) = self.url.find(value) {
            return with_scheme(found.as_str());
        }
        let value = value.trim().trim_end_matches('/');
        if self.owner_repo.is_match(value) {
            return format!("https://github.com/{value}");
        }
        with_scheme(value)
    }

    fn link_url(&self, value: &str) -> String {
        match self.url.find(value) {
            Some(found) => with_scheme(found.as_str()),
            None => with_scheme(value.trim()),
        }
    }
}

/// Splits a title line into name, inline technology list and inline description.
fn split_title(line: &str) -> (&str, Option<&str>, Option<&str>) {
    // Parentheses are separator characters, so check them before trimming.
    let untrimmed = line
        .trim()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '|' | '-' | '–' | '—' | ','));
    if let Some(open) = untrimmed.find('(') {
        if untrimmed.ends_with(')') {
            let inner = untrimmed[open + 1..untrimmed.len() - 1].trim();
            let name = trim_separators(&untrimmed[..open]);
            if !name.is_empty() {
                return (name, (!inner.is_empty()).then_some(inner), None);
            }
        }
    }

    let line = trim_separators(untrimmed);
    let fields = split_fields(line);
    if let [name, rest @ ..] = fields.as_slice() {
        if let Some(suffix) = rest.first() {
            let offset = suffix.as_ptr() as usize - line.as_ptr() as usize;
            let suffix = &line[offset..];
            let tech_like = suffix.contains(',')
                || suffix.contains('/')
                || suffix.split_whitespace().count() <= MAX_INLINE_TECH_WORDS;
            return if tech_like {
                (name, Some(suffix), None)
            } else {
                (name, None, Some(suffix))
            };
        }
    }
    (line, None, None)
}

fn with_scheme(url: &str) -> String {
    let url = url.trim_end_matches(['.', ',', ';', ')']).trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<ProjectEntry> {
        ProjectParser::new().parse(text.lines())
    }

    #[test]
    fn test_github_url_line_assigns_github_only() {
        let entries = parse("My App\nhttps://github.com/me/app");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "My App");
        assert_eq!(entries[0].github, "https://github.com/me/app");
        assert_eq!(entries[0].link, "");
    }

    #[test]
    fn test_demo_cue_assigns_link() {
        let entries = parse("Portfolio Site\nLive demo at https://me.dev/portfolio");
        assert_eq!(entries[0].link, "https://me.dev/portfolio");
        assert_eq!(entries[0].github, "");
    }

    #[test]
    fn test_unlabelled_urls_fill_link_then_github() {
        let entries = parse("Tool\nhttps://tool.example.com\nhttps://gitlab.com/me/tool");
        assert_eq!(entries[0].link, "https://tool.example.com");
        assert_eq!(entries[0].github, "https://gitlab.com/me/tool");
    }

    #[test]
    fn test_key_value_lines_synthesize_schemes() {
        let entries = parse("Habit Tracker\nRepo: me/habits\nLive: habits.app/home\nTech Stack: React, Node.js; react");
        let project = &entries[0];
        assert_eq!(project.github, "https://github.com/me/habits");
        assert_eq!(project.link, "https://habits.app/home");
        assert_eq!(project.technologies, vec!["React", "Node.js"]);
    }

    #[test]
    fn test_title_with_inline_technologies() {
        let entries = parse("Chat Server | Rust, Tokio\n- Handles 10k concurrent sockets\n\nBlog Engine (Go, SQLite)\nStatic site generator with live reload");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Chat Server");
        assert_eq!(entries[0].technologies, vec!["Rust", "Tokio"]);
        assert_eq!(entries[0].description, "Handles 10k concurrent sockets");
        assert_eq!(entries[1].name, "Blog Engine");
        assert_eq!(entries[1].technologies, vec!["Go", "SQLite"]);
        assert_eq!(entries[1].description, "Static site generator with live reload");
    }

    #[test]
    fn test_parenthesised_technologies_survive_trailing_date() {
        let entries = parse("Weather App (React, D3) | 2022\n- Plots hourly forecasts per city");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Weather App");
        assert_eq!(entries[0].technologies, vec!["React", "D3"]);
        assert_eq!(entries[0].description, "Plots hourly forecasts per city");
    }

    #[test]
    fn test_short_description_line_does_not_open_new_project() {
        let entries = parse("Resume Parser\nA heuristic parser\n- Extracts sections from text");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].description,
            "A heuristic parser Extracts sections from text"
        );
    }

    #[test]
    fn test_title_after_content_opens_new_project() {
        let entries = parse("First\n- Did something useful here\nSecond\n- And another thing");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "Second");
    }

    #[test]
    fn test_url_line_with_leading_text_names_project() {
        let entries = parse("Weather Bot - https://github.com/me/weather");
        assert_eq!(entries[0].name, "Weather Bot");
        assert_eq!(entries[0].github, "https://github.com/me/weather");
    }

    #[test]
    fn test_empty_section_yields_nothing() {
        assert!(parse("").is_empty());
    }
}
