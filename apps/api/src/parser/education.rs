//! Education parser. Degree and institution lines both open records; whichever
//! comes second fills the record the first one opened.

use regex::Regex;
use tracing::debug;

use crate::parser::dates::DatePatterns;
use crate::parser::model::EducationEntry;
use crate::parser::records::{Draft, RecordSequence};
use crate::parser::text::{split_fields, strip_bullet, trim_separators};

const DEGREE_PATTERN: &str = r"(?i)\b(?:bachelor|master|doctor(?:ate)?|ph\.?\s?d|associate(?:'s)?\s+degree|mba\b|bba\b|diploma|high school|b\.\s?(?:s|a|e|sc|tech|eng)\.?|m\.\s?(?:s|a|e|sc|tech|eng)\.?|bsc\b|msc\b|btech\b|mtech\b|degree)";

/// Upper-case abbreviations, matched case-sensitively so `ms` or `ba` inside prose
/// do not count.
const DEGREE_ABBREVIATION_PATTERN: &str =
    r"\b(?:BS|BA|MS|BSc|MSc|BEng|MEng|BBA|MBA|PhD|JD)\b";

const INSTITUTION_PATTERN: &str =
    r"(?i)\b(?:university|college|institute|school|academy|polytechnic|universidad|université)\b";

const GPA_PATTERN: &str = r"(?i)\b(?:c?gpa|grade point average)\s*[:\-]?\s*(\d+(?:\.\d+)?(?:\s*/\s*\d+(?:\.\d+)?)?)";

const GENERIC_MIN_CHARS: usize = 3;
const GENERIC_MAX_CHARS: usize = 80;

#[derive(Debug, Default)]
struct EducationDraft {
    degree: String,
    institution: String,
    field: String,
    graduation_date: String,
    gpa: String,
}

impl EducationDraft {
    /// Fills the empty fields of the draft from `other`.
    fn absorb(&mut self, other: EducationDraft) {
        fill(&mut self.degree, other.degree);
        fill(&mut self.institution, other.institution);
        fill(&mut self.field, other.field);
        fill(&mut self.graduation_date, other.graduation_date);
        fill(&mut self.gpa, other.gpa);
    }
}

fn fill(slot: &mut String, value: String) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value;
    }
}

impl Draft for EducationDraft {
    type Entry = EducationEntry;

    fn finalize(self) -> Option<EducationEntry> {
        if self.degree.is_empty() && self.institution.is_empty() {
            return None;
        }
        Some(EducationEntry {
            degree: self.degree,
            institution: self.institution,
            field: self.field,
            graduation_date: self.graduation_date,
            gpa: self.gpa,
        })
    }
}

enum EducationLine<'a> {
    Degree(&'a str),
    Dates(&'a str),
    Gpa(String),
    Institution(&'a str),
    Generic(&'a str),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct EducationParser {
    degree: Regex,
    degree_abbreviation: Regex,
    institution: Regex,
    gpa: Regex,
    dates: DatePatterns,
}

impl Default for EducationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EducationParser {
    pub fn new() -> Self {
        Self {
            degree: Regex::new(DEGREE_PATTERN).expect("degree pattern"),
            degree_abbreviation: Regex::new(DEGREE_ABBREVIATION_PATTERN)
                .expect("degree abbreviation pattern"),
            institution: Regex::new(INSTITUTION_PATTERN).expect("institution pattern"),
            gpa: Regex::new(GPA_PATTERN).expect("gpa pattern"),
            dates: DatePatterns::new(),
        }
    }

    pub fn parse<'a, I>(&self, lines: I) -> Vec<EducationEntry>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut records: RecordSequence<EducationDraft> = RecordSequence::new();

        for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
            match self.classify(line) {
                EducationLine::Degree(text) => {
                    let fields = self.read_fields(text);
                    match records.current_mut() {
                        Some(draft) if draft.degree.is_empty() => draft.absorb(fields),
                        _ => records.start(fields),
                    }
                }
                EducationLine::Institution(text) => {
                    let fields = self.read_fields(text);
                    match records.current_mut() {
                        Some(draft) if draft.institution.is_empty() => draft.absorb(fields),
                        _ => records.start(fields),
                    }
                }
                EducationLine::Dates(text) => {
                    let draft = records.current_or_start();
                    fill(&mut draft.graduation_date, self.dates.completion(text));
                }
                EducationLine::Gpa(gpa) => fill(&mut records.current_or_start().gpa, gpa),
                EducationLine::Generic(text) => {
                    if let Some(draft) = records.current_mut() {
                        if !draft.degree.is_empty() && draft.institution.is_empty() {
                            draft.institution = text.to_string();
                        }
                    }
                }
                EducationLine::Ignored => {}
            }
        }

        let entries = records.finish();
        debug!("Parsed {} education entries", entries.len());
        entries
    }

    fn classify<'a>(&self, line: &'a str) -> EducationLine<'a> {
        // Coursework and honours bullets only ever contribute a GPA.
        if let Some(text) = strip_bullet(line) {
            return match self.gpa_of(text) {
                Some(gpa) => EducationLine::Gpa(gpa),
                None => EducationLine::Ignored,
            };
        }
        if self.is_degree(line) {
            return EducationLine::Degree(line);
        }
        if self.dates.is_date_line(line) && !self.institution.is_match(line) {
            return EducationLine::Dates(line);
        }
        if let Some(gpa) = self.gpa_of(line) {
            return EducationLine::Gpa(gpa);
        }
        if self.institution.is_match(line) {
            return EducationLine::Institution(line);
        }
        let chars = line.chars().count();
        if (GENERIC_MIN_CHARS..=GENERIC_MAX_CHARS).contains(&chars) && !line.contains(':') {
            return EducationLine::Generic(line);
        }
        EducationLine::Ignored
    }

    fn is_degree(&self, text: &str) -> bool {
        self.degree.is_match(text) || self.degree_abbreviation.is_match(text)
    }

    fn gpa_of(&self, text: &str) -> Option<String> {
        self.gpa
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().split_whitespace().collect::<String>())
    }

    /// Distributes the inline parts of a degree or institution line:
    /// `B.S. in Computer Science, State University, 2015 - 2019, GPA: 3.8`.
    fn read_fields(&self, line: &str) -> EducationDraft {
        let mut fields = EducationDraft {
            gpa: self.gpa_of(line).unwrap_or_default(),
            ..Default::default()
        };
        if !self.dates.years(line).is_empty() || self.dates.is_ongoing(line) {
            fields.graduation_date = self.dates.completion(line);
        }

        let without_gpa = self.gpa.replace_all(line, " ");
        let rest = self.dates.strip(&without_gpa);
        let parts: Vec<&str> = split_fields(&rest)
            .into_iter()
            .flat_map(|p| p.split(", "))
            .map(trim_separators)
            .filter(|p| !p.is_empty())
            .collect();

        for part in parts {
            if fields.degree.is_empty() && self.is_degree(part) {
                match part.split_once(" in ") {
                    Some((degree, field)) => {
                        fields.degree = trim_separators(degree).to_string();
                        fields.field = trim_separators(field).to_string();
                    }
                    None => fields.degree = part.to_string(),
                }
            } else if fields.institution.is_empty() && self.institution.is_match(part) {
                fields.institution = part.to_string();
            } else if !fields.degree.is_empty() && fields.field.is_empty() {
                fields.field = part.to_string();
            }
        }
        fields
    }
}
