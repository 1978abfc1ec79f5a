// Resume parsing engine: Normalizer → Segmenter → extractors → Assembler.
// Pure and synchronous; no I/O. Callers run it inside tokio::task::spawn_blocking.

pub mod contact;
pub mod dates;
pub mod education;
pub mod experience;
pub mod model;
pub mod normalize;
pub mod projects;
pub mod records;
pub mod report;
pub mod sections;
pub mod skills;
pub mod text;

use thiserror::Error;
use tracing::debug;

use contact::ContactExtractor;
use education::EducationParser;
use experience::ExperienceParser;
use projects::ProjectParser;
use sections::SectionSegmenter;
use skills::SkillClassifier;

// Re-export the public API consumed by the ingest and resumes modules.
pub use contact::NameSource;
pub use model::{ParsedResume, SectionKind, SENTINEL_NAME};
pub use normalize::NormalizedText;
pub use report::ParseReport;

/// Inputs shorter than this are rejected by callers before parsing.
pub const MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("insufficient text: found {found} characters, at least {required} required")]
pub struct InsufficientTextError {
    pub found: usize,
    pub required: usize,
}

/// Caller-side precondition: the trimmed text must carry at least `min_chars`
/// characters. The engine itself accepts any input.
pub fn ensure_sufficient_text(text: &str, min_chars: usize) -> Result<(), InsufficientTextError> {
    let found = text.trim().chars().count();
    if found < min_chars {
        return Err(InsufficientTextError {
            found,
            required: min_chars,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub resume: ParsedResume,
    pub report: ParseReport,
}

/// Owns one instance of every extractor. Holds no mutable state, so a single
/// parser can be shared across threads behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ResumeParser {
    segmenter: SectionSegmenter,
    contact: ContactExtractor,
    experience: ExperienceParser,
    education: EducationParser,
    projects: ProjectParser,
    skills: SkillClassifier,
}

impl ResumeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine entry point without the report; the HTTP layer calls `analyze`.
    #[allow(dead_code)]
    pub fn parse(&self, raw: &str) -> ParsedResume {
        self.analyze(raw).resume
    }

    /// Full pipeline plus the section health report.
    pub fn analyze(&self, raw: &str) -> ParseOutcome {
        let text = NormalizedText::new(raw);
        let sections = self.segmenter.segment(&text);
        let contact = self.contact.extract(&text);

        let all_sections = &sections;
        let lines_of = move |kind: SectionKind| {
            all_sections
                .iter()
                .filter(move |s| s.kind == kind)
                .flat_map(|s| s.lines.iter().map(String::as_str))
        };

        let resume = ParsedResume {
            contact: contact.contact,
            summary: self.summary(lines_of(SectionKind::Summary)),
            experience: self.experience.parse(lines_of(SectionKind::Experience)),
            education: self.education.parse(lines_of(SectionKind::Education)),
            skills: self.skills.classify(lines_of(SectionKind::Skills)),
            projects: self.projects.parse(lines_of(SectionKind::Projects)),
            certifications: certifications(lines_of(SectionKind::Certifications)),
        };

        let report = report::build_report(&sections, &resume, contact.name_source);
        debug!(
            sections = sections.len(),
            experience = resume.experience.len(),
            education = resume.education.len(),
            projects = resume.projects.len(),
            score = report.overall_score,
            "Parsed resume"
        );

        ParseOutcome { resume, report }
    }

    fn summary<'a>(&self, lines: impl Iterator<Item = &'a str>) -> String {
        lines
            .map(text::content_of)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn certifications<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    lines
        .map(text::content_of)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::experience::MIN_RESPONSIBILITY_CHARS;
    use crate::parser::model::{EducationEntry, ExperienceEntry};

    const SCENARIO_A: &str = "Jane Smith\njane.smith@example.com\n\nEXPERIENCE\nSoftware Engineer\nAcme Corp\n2020 - 2023\n• Built scalable APIs\n• Led a team of 4\n\nEDUCATION\nBachelor of Science\nState University\n2019";

    const FULL_RESUME: &str = "\
John Carter\r\n\
Senior Backend Engineer\r\n\
john.carter@mail.com | +1 (415) 555-0134 | linkedin.com/in/jcarter | github.com/jcarter\r\n\
\r\n\
SUMMARY\r\n\
Backend engineer with eight years of experience building payment systems.\r\n\
\r\n\
WORK EXPERIENCE\r\n\
Senior Developer\r\n\
TechCo | Remote\r\n\
2021 - Present\r\n\
• Designed the ledger service handling 2M transactions a day\r\n\
• Mentored\r\n\
Software Engineer at Acme Corp | 2017 - 2021\r\n\
- Migrated the monolith to Kubernetes\r\n\
\r\n\
EDUCATION\r\n\
B.S. in Computer Science, State University, 2017\r\n\
\r\n\
TECHNICAL SKILLS\r\n\
Rust, Go, PostgreSQL, Docker\r\n\
\r\n\
PROJECTS\r\n\
Ledger CLI | Rust, SQLite\r\n\
Command line double-entry bookkeeping\r\n\
https://github.com/jcarter/ledger\r\n\
\r\n\
CERTIFICATIONS\r\n\
• AWS Certified Solutions Architect\r\n";

    #[test]
    fn test_mixed_case_compound_headings_keep_their_records() {
        let parser = ResumeParser::new();

        let resume = parser.parse("Jane Smith\n\nVolunteer Experience\nProgram Coordinator\nRed Cross\n2019 - 2020");
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].position, "Program Coordinator");
        assert_eq!(resume.experience[0].company, "Red Cross");

        let resume = parser.parse("Jane Smith\n\nEducation & Training\nBachelor of Science\nState University\n2019");
        assert_eq!(resume.education.len(), 1);
        assert_eq!(resume.education[0].degree, "Bachelor of Science");
        assert_eq!(resume.education[0].institution, "State University");

        let resume = parser.parse("Jane Smith\n\nSkills & Abilities\nPython, React");
        let items: Vec<&str> = resume
            .skills
            .iter()
            .flat_map(|c| c.items.iter().map(String::as_str))
            .collect();
        assert!(items.contains(&"python"));
        assert!(items.contains(&"react"));
    }

    #[test]
    fn test_projects_heading_after_experience_does_not_leak() {
        let resume = ResumeParser::new().parse(
            "Jane Smith\n\nEXPERIENCE\nSoftware Engineer\nAcme Corp\n2020 - 2023\n• Built scalable APIs\nProjects and Publications\nLedger CLI https://github.com/me/ledger",
        );
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].responsibilities, vec!["Built scalable APIs"]);
        assert_eq!(resume.projects.len(), 1);
        assert_eq!(resume.projects[0].name, "Ledger CLI");
        assert_eq!(resume.projects[0].github, "https://github.com/me/ledger");
    }

    #[test]
    fn test_scenario_a_header_experience_education() {
        let resume = ResumeParser::new().parse(SCENARIO_A);
        assert_eq!(resume.contact.name, "Jane Smith");
        assert_eq!(resume.contact.email, "jane.smith@example.com");
        assert_eq!(
            resume.experience,
            vec![ExperienceEntry {
                position: "Software Engineer".to_string(),
                company: "Acme Corp".to_string(),
                start_date: "2020".to_string(),
                end_date: "2023".to_string(),
                current: false,
                responsibilities: vec![
                    "Built scalable APIs".to_string(),
                    "Led a team of 4".to_string()
                ],
            }]
        );
        assert_eq!(
            resume.education,
            vec![EducationEntry {
                degree: "Bachelor of Science".to_string(),
                institution: "State University".to_string(),
                graduation_date: "2019".to_string(),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_scenario_b_present_job_is_current() {
        let resume = ResumeParser::new()
            .parse("Alex Kim\n\nEXPERIENCE\nSenior Developer\nTechCo\n2021 - Present\n");
        assert_eq!(resume.experience.len(), 1);
        let job = &resume.experience[0];
        assert!(job.current);
        assert_eq!(job.end_date, "");
        assert_eq!(job.start_date, "2021");
    }

    #[test]
    fn test_scenario_c_skill_categories() {
        let resume = ResumeParser::new().parse("Jane Smith\n\nSKILLS\nPython, React, PostgreSQL");
        let find = |name: &str| {
            resume
                .skills
                .iter()
                .find(|c| c.category == name)
                .map(|c| c.items.clone())
        };
        assert_eq!(find("Programming Languages"), Some(vec!["python".to_string()]));
        assert_eq!(find("Frontend"), Some(vec!["react".to_string()]));
        assert_eq!(find("Databases"), Some(vec!["postgresql".to_string()]));
    }

    #[test]
    fn test_scenario_d_short_input_rejected_by_caller_but_parses() {
        let raw = "too short";
        assert_eq!(
            ensure_sufficient_text(raw, MIN_TEXT_CHARS),
            Err(InsufficientTextError {
                found: 9,
                required: MIN_TEXT_CHARS
            })
        );

        let resume = ResumeParser::new().parse(raw);
        assert_eq!(resume.contact.name, SENTINEL_NAME);
        assert!(resume.experience.is_empty());
        assert!(resume.education.is_empty());
        assert!(resume.projects.is_empty());
        assert!(resume.skills.is_empty());
        assert!(resume.certifications.is_empty());
        assert_eq!(resume.summary, "");
    }

    #[test]
    fn test_scenario_e_project_github_link() {
        let resume = ResumeParser::new().parse("Jane Smith\n\nPROJECTS\nMy App\nhttps://github.com/me/app");
        assert_eq!(resume.projects.len(), 1);
        assert_eq!(resume.projects[0].github, "https://github.com/me/app");
        assert_eq!(resume.projects[0].link, "");
    }

    #[test]
    fn test_full_resume() {
        let outcome = ResumeParser::new().analyze(FULL_RESUME);
        let resume = &outcome.resume;

        assert_eq!(resume.contact.name, "John Carter");
        assert_eq!(resume.contact.email, "john.carter@mail.com");
        assert_eq!(resume.contact.phone, "+1 (415) 555-0134");
        assert_eq!(resume.contact.linkedin, "https://linkedin.com/in/jcarter");
        assert_eq!(resume.contact.github, "https://github.com/jcarter");
        assert_eq!(
            resume.summary,
            "Backend engineer with eight years of experience building payment systems."
        );

        assert_eq!(resume.experience.len(), 2);
        assert_eq!(resume.experience[0].position, "Senior Developer");
        assert_eq!(resume.experience[0].company, "TechCo");
        assert!(resume.experience[0].current);
        assert_eq!(
            resume.experience[0].responsibilities,
            vec!["Designed the ledger service handling 2M transactions a day"]
        );
        assert_eq!(resume.experience[1].company, "Acme Corp");
        assert_eq!(resume.experience[1].start_date, "2017");
        assert_eq!(resume.experience[1].end_date, "2021");

        assert_eq!(resume.education.len(), 1);
        assert_eq!(resume.education[0].degree, "B.S.");
        assert_eq!(resume.education[0].field, "Computer Science");
        assert_eq!(resume.education[0].institution, "State University");
        assert_eq!(resume.education[0].graduation_date, "2017");

        assert!(resume.skills.iter().any(|c| c.items.contains(&"rust".to_string())));
        assert!(resume.skills.iter().any(|c| c.items.contains(&"docker".to_string())));

        assert_eq!(resume.projects.len(), 1);
        assert_eq!(resume.projects[0].name, "Ledger CLI");
        assert_eq!(resume.projects[0].technologies, vec!["Rust", "SQLite"]);
        assert_eq!(resume.projects[0].github, "https://github.com/jcarter/ledger");

        assert_eq!(resume.certifications, vec!["AWS Certified Solutions Architect"]);

        assert_eq!(outcome.report.name_source, NameSource::Header);
        assert!(outcome.report.missing_sections.is_empty());
        assert!(outcome.report.overall_score > 0.5);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = ResumeParser::new();
        assert_eq!(parser.analyze(FULL_RESUME), parser.analyze(FULL_RESUME));
        assert_eq!(
            serde_json::to_string(&parser.parse(SCENARIO_A)).unwrap(),
            serde_json::to_string(&parser.parse(SCENARIO_A)).unwrap()
        );
    }

    #[test]
    fn test_name_always_present() {
        let parser = ResumeParser::new();
        for raw in ["", "   ", "\u{0}\u{1}", "12345 67890", SCENARIO_A, FULL_RESUME] {
            assert!(!parser.parse(raw).contact.name.is_empty());
        }
    }

    #[test]
    fn test_no_heading_means_empty_records() {
        let raw = "Jane Smith\njane@example.com\nI write Python and React apps for a living and enjoy it a lot.";
        let resume = ResumeParser::new().parse(raw);
        assert!(resume.experience.is_empty());
        assert!(resume.education.is_empty());
        assert!(resume.projects.is_empty());
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_current_jobs_never_have_end_dates() {
        let resume = ResumeParser::new().parse(FULL_RESUME);
        assert!(resume
            .experience
            .iter()
            .filter(|e| e.current)
            .all(|e| e.end_date.is_empty()));
    }

    #[test]
    fn test_noise_filter_applies_to_all_responsibilities() {
        let resume = ResumeParser::new().parse(FULL_RESUME);
        assert!(resume
            .experience
            .iter()
            .flat_map(|e| e.responsibilities.iter())
            .all(|r| r.chars().count() >= MIN_RESPONSIBILITY_CHARS));
    }

    #[test]
    fn test_repeated_sections_are_concatenated() {
        let raw = "Jane Smith\n\nEXPERIENCE\nData Analyst\nInitech\n\nSKILLS\nSQL\n\nEXPERIENCE\nIntern\nHooli";
        let resume = ResumeParser::new().parse(raw);
        assert_eq!(resume.experience.len(), 2);
        assert_eq!(resume.experience[1].company, "Hooli");
    }

    #[test]
    fn test_ensure_sufficient_text_counts_trimmed_chars() {
        let padded = format!("   {}   ", "a".repeat(MIN_TEXT_CHARS));
        assert!(ensure_sufficient_text(&padded, MIN_TEXT_CHARS).is_ok());
        assert!(ensure_sufficient_text(&"a".repeat(MIN_TEXT_CHARS - 1), MIN_TEXT_CHARS).is_err());
    }
}
