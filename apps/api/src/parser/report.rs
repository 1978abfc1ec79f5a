use serde::{Deserialize, Serialize};

use crate::parser::contact::NameSource;
use crate::parser::model::{ParsedResume, Section, SectionKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

impl SectionStatus {
    fn score(self) -> f64 {
        match self {
            SectionStatus::Strong => 1.0,
            SectionStatus::Moderate => 0.6,
            SectionStatus::Weak => 0.25,
            SectionStatus::Missing => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionHealth {
    pub kind: SectionKind,
    /// Heading text of the first section of this kind, empty when missing.
    pub heading: String,
    pub line_count: usize,
    pub entry_count: usize,
    pub score: f64,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

/// How much of a resume the heuristics could recover, section by section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<SectionKind>,
    pub name_source: NameSource,
}

const SECTION_WEIGHTS: &[(SectionKind, f64)] = &[
    (SectionKind::Experience, 0.35),
    (SectionKind::Education, 0.20),
    (SectionKind::Skills, 0.20),
    (SectionKind::Projects, 0.10),
    (SectionKind::Summary, 0.10),
    (SectionKind::Certifications, 0.05),
];

/// Summaries shorter than this many words are rated Moderate.
const SHORT_SUMMARY_WORDS: usize = 20;

pub fn build_report(
    sections: &[Section],
    resume: &ParsedResume,
    name_source: NameSource,
) -> ParseReport {
    let mut section_healths = Vec::new();
    let mut missing_sections = Vec::new();
    let mut weighted_score_sum = 0.0;

    for (kind, weight) in SECTION_WEIGHTS {
        let matching: Vec<&Section> = sections.iter().filter(|s| s.kind == *kind).collect();
        let label = kind.as_str();

        if matching.is_empty() {
            missing_sections.push(*kind);
            section_healths.push(SectionHealth {
                kind: *kind,
                heading: String::new(),
                line_count: 0,
                entry_count: 0,
                score: 0.0,
                status: SectionStatus::Missing,
                recommendations: vec![format!("Add a {} section with a clear heading", label)],
            });
            continue;
        }

        let line_count = matching.iter().map(|s| s.content_lines().count()).sum();
        let entry_count = entry_count(*kind, resume);
        let status = match entry_count {
            0 => SectionStatus::Weak,
            n if n < strong_threshold(*kind) || is_short_summary(*kind, resume) => {
                SectionStatus::Moderate
            }
            _ => SectionStatus::Strong,
        };

        let mut recommendations = Vec::new();
        match status {
            SectionStatus::Weak => recommendations.push(format!(
                "A {} section was found but no entries could be read; use one item per line",
                label
            )),
            SectionStatus::Moderate => recommendations.push(format!(
                "Only {} {} entr{} recovered; add more detail",
                entry_count,
                label,
                if entry_count == 1 { "y" } else { "ies" }
            )),
            _ => {}
        }
        if *kind == SectionKind::Experience {
            let undated = resume
                .experience
                .iter()
                .filter(|e| e.start_date.is_empty())
                .count();
            if undated > 0 {
                recommendations.push(format!(
                    "{} experience entries have no dates; add a year range to each role",
                    undated
                ));
            }
        }

        weighted_score_sum += status.score() * weight;
        section_healths.push(SectionHealth {
            kind: *kind,
            heading: matching[0].heading_text.clone(),
            line_count,
            entry_count,
            score: status.score(),
            status,
            recommendations,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let overall_score = if total_weight > 0.0 {
        (weighted_score_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ParseReport {
        overall_score,
        sections: section_healths,
        missing_sections,
        name_source,
    }
}

fn entry_count(kind: SectionKind, resume: &ParsedResume) -> usize {
    match kind {
        SectionKind::Experience => resume.experience.len(),
        SectionKind::Education => resume.education.len(),
        SectionKind::Skills => resume.skills.iter().map(|c| c.items.len()).sum(),
        SectionKind::Projects => resume.projects.len(),
        SectionKind::Summary => usize::from(!resume.summary.is_empty()),
        SectionKind::Certifications => resume.certifications.len(),
        SectionKind::Unknown => 0,
    }
}

fn strong_threshold(kind: SectionKind) -> usize {
    match kind {
        SectionKind::Experience | SectionKind::Projects | SectionKind::Certifications => 2,
        SectionKind::Skills => 5,
        _ => 1,
    }
}

fn is_short_summary(kind: SectionKind, resume: &ParsedResume) -> bool {
    kind == SectionKind::Summary && resume.summary.split_whitespace().count() < SHORT_SUMMARY_WORDS
}
