//! Experience parser: rebuilds jobs from the lines of an experience section.
//!
//! Line roles, first match wins: bullet, record start (a job title), date range,
//! company, continuation. A title line may carry company and dates inline
//! (`Software Engineer at Acme Corp | 2020 - 2023`).

use regex::Regex;
use tracing::debug;

use crate::parser::dates::{DatePatterns, DateSpan};
use crate::parser::model::ExperienceEntry;
use crate::parser::records::{Draft, RecordSequence};
use crate::parser::text::{split_fields, starts_lowercase, strip_bullet, trim_separators};

/// Seniority and role words that mark a job-title line.
pub const ROLE_PATTERN: &str = r"(?i)\b(?:engineer|developer|programmer|manager|analyst|designer|consultant|intern|architect|lead|director|specialist|scientist|administrator|coordinator|officer|associate|technician|head of|vp|vice president|president|founder|co-founder|cto|ceo|cfo|assistant|supervisor|executive|researcher|instructor|teacher|tutor|tester|accountant|devops|sre|contractor|freelancer)s?\b";

/// Responsibilities shorter than this are layout noise.
pub const MIN_RESPONSIBILITY_CHARS: usize = 10;

const MAX_TITLE_CHARS: usize = 80;

/// Irregular past-tense verbs that open achievement lines rather than titles.
const ACTION_VERBS: &[&str] = &[
    "led", "built", "ran", "wrote", "drove", "made", "won", "grew", "cut", "taught", "oversaw",
    "brought", "began", "held", "spent", "took", "set", "saw",
];

#[derive(Debug, Default)]
struct ExperienceDraft {
    position: String,
    company: String,
    dates: Option<DateSpan>,
    responsibilities: Vec<String>,
}

impl ExperienceDraft {
    /// Lower-case continuations extend the previous responsibility (a wrapped
    /// bullet); anything else becomes a responsibility of its own.
    fn continue_with(&mut self, text: &str) {
        if starts_lowercase(text) {
            if let Some(last) = self.responsibilities.last_mut() {
                last.push(' ');
                last.push_str(text);
                return;
            }
        }
        self.responsibilities.push(text.to_string());
    }
}

impl Draft for ExperienceDraft {
    type Entry = ExperienceEntry;

    fn finalize(self) -> Option<ExperienceEntry> {
        if self.position.is_empty() && self.company.is_empty() {
            return None;
        }
        let dates = self.dates.unwrap_or_default();
        Some(ExperienceEntry {
            position: self.position,
            company: self.company,
            start_date: dates.start,
            end_date: if dates.current { String::new() } else { dates.end },
            current: dates.current,
            responsibilities: self
                .responsibilities
                .into_iter()
                .filter(|r| r.chars().count() >= MIN_RESPONSIBILITY_CHARS)
                .collect(),
        })
    }
}

enum ExperienceLine<'a> {
    Bullet(&'a str),
    RecordStart(&'a str),
    Dates(&'a str),
    /// Dates placed above the next job title.
    LeadingDates(&'a str),
    Company(&'a str),
    /// Company placed above the next job title.
    LeadingCompany(&'a str),
    Continuation(&'a str),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ExperienceParser {
    role: Regex,
    dates: DatePatterns,
}

impl Default for ExperienceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperienceParser {
    pub fn new() -> Self {
        Self {
            role: Regex::new(ROLE_PATTERN).expect("role pattern"),
            dates: DatePatterns::new(),
        }
    }

    pub fn parse<'a, I>(&self, lines: I) -> Vec<ExperienceEntry>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines: Vec<&str> = lines
            .into_iter()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let mut records: RecordSequence<ExperienceDraft> = RecordSequence::new();

        for (i, line) in lines.iter().enumerate() {
            let next = lines.get(i + 1).copied();
            match self.classify(line, next, records.current()) {
                ExperienceLine::Bullet(text) => {
                    // Bullets before the first job are dropped.
                    if let Some(draft) = records.current_mut() {
                        if !text.is_empty() {
                            draft.responsibilities.push(text.to_string());
                        }
                    }
                }
                ExperienceLine::RecordStart(text) => self.start_record(&mut records, text),
                ExperienceLine::Dates(text) => {
                    records.current_or_start().dates = Some(self.dates.span(text));
                }
                ExperienceLine::LeadingDates(text) => records.start(ExperienceDraft {
                    dates: Some(self.dates.span(text)),
                    ..Default::default()
                }),
                ExperienceLine::Company(text) => {
                    records.current_or_start().company = self.company_part(text);
                }
                ExperienceLine::LeadingCompany(text) => records.start(ExperienceDraft {
                    company: self.company_part(text),
                    ..Default::default()
                }),
                ExperienceLine::Continuation(text) => {
                    if let Some(draft) = records.current_mut() {
                        draft.continue_with(text);
                    }
                }
                ExperienceLine::Ignored => {}
            }
        }

        let entries = records.finish();
        debug!("Parsed {} experience entries", entries.len());
        entries
    }

    fn classify<'a>(
        &self,
        line: &'a str,
        next: Option<&str>,
        current: Option<&ExperienceDraft>,
    ) -> ExperienceLine<'a> {
        if let Some(text) = strip_bullet(line) {
            return ExperienceLine::Bullet(text);
        }
        if self.is_record_start(line) {
            return ExperienceLine::RecordStart(line);
        }

        let opens_next = next.is_some_and(|n| self.is_record_start(n));

        if self.dates.is_date_line(line) {
            return match current {
                Some(d) if d.dates.is_some() && opens_next => ExperienceLine::LeadingDates(line),
                Some(d) if d.dates.is_some() => ExperienceLine::Ignored,
                _ => ExperienceLine::Dates(line),
            };
        }

        if is_company_shaped(line) {
            match current {
                None => return ExperienceLine::Company(line),
                Some(d) if opens_next && (!d.company.is_empty() || !d.responsibilities.is_empty()) => {
                    return ExperienceLine::LeadingCompany(line)
                }
                Some(d) if d.company.is_empty() => return ExperienceLine::Company(line),
                Some(_) => {}
            }
        }

        ExperienceLine::Continuation(line)
    }

    /// A job-title line: role keyword, short, not a sentence, not an achievement.
    fn is_record_start(&self, line: &str) -> bool {
        line.chars().count() <= MAX_TITLE_CHARS
            && !line.ends_with('.')
            && !starts_lowercase(line)
            && !starts_with_action_verb(line)
            && self.role.is_match(line)
    }

    /// Opens a job from a title line, or completes a job whose company or dates
    /// arrived before its title.
    fn start_record(&self, records: &mut RecordSequence<ExperienceDraft>, line: &str) {
        let (position, company) = self.split_title_line(line);
        let dates = self
            .dates
            .contains_date(line)
            .then(|| self.dates.span(line));

        match records.current_mut() {
            Some(draft) if draft.position.is_empty() => {
                draft.position = position;
                if draft.company.is_empty() {
                    draft.company = company;
                }
                if draft.dates.is_none() {
                    draft.dates = dates;
                }
            }
            _ => records.start(ExperienceDraft {
                position,
                company,
                dates,
                responsibilities: Vec::new(),
            }),
        }
    }

    /// `Software Engineer at Acme Corp | 2020 - 2023` → (`Software Engineer`, `Acme Corp`).
    fn split_title_line(&self, line: &str) -> (String, String) {
        let without_dates = self.dates.strip(line);
        let parts: Vec<&str> = split_fields(&without_dates)
            .into_iter()
            .flat_map(|p| p.split(" at ").flat_map(|q| q.split(" @ ")))
            .flat_map(|p| {
                let pieces: Vec<&str> = p.split(", ").collect();
                // Only split on commas when the role sits in the first piece.
                if pieces.len() > 1 && self.role.is_match(pieces[0]) {
                    pieces
                } else {
                    vec![p]
                }
            })
            .map(trim_separators)
            .filter(|p| !p.is_empty())
            .collect();

        let role_index = parts
            .iter()
            .position(|p| self.role.is_match(p))
            .unwrap_or(0);
        let position = parts
            .get(role_index)
            .map(|p| p.to_string())
            .unwrap_or_else(|| trim_separators(line).to_string());
        let company = parts
            .iter()
            .enumerate()
            .find(|(i, _)| *i != role_index)
            .map(|(_, p)| p.to_string())
            .unwrap_or_default();

        (position, company)
    }

    /// `Acme Corp | San Francisco, CA (2020 - 2023)` → `Acme Corp`.
    fn company_part(&self, line: &str) -> String {
        let without_dates = self.dates.strip(line);
        split_fields(&without_dates)
            .into_iter()
            .map(trim_separators)
            .find(|p| !p.is_empty())
            .unwrap_or_else(|| trim_separators(line))
            .to_string()
    }
}

fn is_company_shaped(line: &str) -> bool {
    line.chars().count() <= MAX_TITLE_CHARS
        && !line.ends_with('.')
        && !starts_lowercase(line)
        && !starts_with_action_verb(line)
}

fn starts_with_action_verb(line: &str) -> bool {
    let first = line
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_lowercase();
    (first.len() > 3 && first.ends_with("ed")) || ACTION_VERBS.contains(&first.as_str())
}
