use serde::{Deserialize, Serialize};

/// Placeholder name used when no strategy resolves a candidate name.
pub const SENTINEL_NAME: &str = "Professional";

/// Coarse content label of a resume section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Unknown,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Unknown => "unknown",
        }
    }
}

/// A contiguous run of lines between one heading and the next.
///
/// `start_line..end_line` is the half-open range of line indices in the
/// normalized text covered by `lines`; the heading itself sits at `start_line - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub kind: SectionKind,
    pub heading_text: String,
    pub lines: Vec<String>,
    pub start_line: usize,
    pub end_line: usize,
}

impl Section {
    /// Lines carrying content, blank separators skipped.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.as_str())
            .filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,
    pub start_date: String,
    /// Always empty when `current` is set.
    pub end_date: String,
    pub current: bool,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub field: String,
    pub graduation_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    /// Unique case-insensitively, in first-seen order.
    pub technologies: Vec<String>,
    pub link: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

/// Root of the structured document produced by one parse invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    pub contact: ContactInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillCategory>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_serde_snake_case() {
        let json = serde_json::to_string(&SectionKind::Certifications).unwrap();
        assert_eq!(json, r#""certifications""#);
        let kind: SectionKind = serde_json::from_str(r#""experience""#).unwrap();
        assert_eq!(kind, SectionKind::Experience);
    }

    #[test]
    fn test_experience_entry_uses_camel_case_keys() {
        let entry = ExperienceEntry {
            position: "Software Engineer".to_string(),
            start_date: "2020".to_string(),
            current: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["startDate"], "2020");
        assert_eq!(value["endDate"], "");
        assert_eq!(value["current"], true);
    }

    #[test]
    fn test_parsed_resume_round_trips_through_json() {
        let resume = ParsedResume {
            contact: ContactInfo {
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
                ..Default::default()
            },
            certifications: vec!["AWS Certified Developer".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&resume).unwrap();
        let back: ParsedResume = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resume);
    }

    #[test]
    fn test_content_lines_skips_blank_separators() {
        let section = Section {
            kind: SectionKind::Skills,
            heading_text: "SKILLS".to_string(),
            lines: vec!["Rust".to_string(), String::new(), "Go".to_string()],
            start_line: 3,
            end_line: 6,
        };
        assert_eq!(section.content_lines().collect::<Vec<_>>(), vec!["Rust", "Go"]);
    }
}
