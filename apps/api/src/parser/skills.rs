//! Skills classifier: maps a skills section onto a fixed category table.

use tracing::debug;

use crate::parser::model::SkillCategory;
use crate::parser::text::{content_of, contains_token};

pub const FALLBACK_CATEGORY: &str = "Technical Skills";

/// Categories in output order. Keywords are lower-case; the matched keyword is
/// the stored item.
const CATEGORY_TABLE: &[(&str, &[&str])] = &[
    (
        "Programming Languages",
        &[
            "python", "javascript", "typescript", "java", "c++", "c#", "go", "golang", "rust",
            "ruby", "php", "swift", "kotlin", "scala", "perl", "dart", "elixir", "haskell", "lua",
            "matlab", "bash",
        ],
    ),
    (
        "Frontend",
        &[
            "react", "angular", "vue", "svelte", "next.js", "nuxt", "html", "css", "sass",
            "tailwind", "bootstrap", "jquery", "redux", "webpack", "vite",
        ],
    ),
    (
        "Backend",
        &[
            "node.js", "express", "django", "flask", "fastapi", "spring", "rails", "laravel",
            "asp.net", ".net", "graphql", "rest api", "grpc", "nestjs", "actix", "axum", "socket.io",
        ],
    ),
    (
        "Databases",
        &[
            "postgresql", "postgres", "mysql", "sqlite", "mongodb", "redis", "cassandra",
            "dynamodb", "elasticsearch", "oracle", "sql server", "mariadb", "firebase", "sql",
        ],
    ),
    (
        "Tools & Technologies",
        &[
            "git", "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "ansible",
            "jenkins", "linux", "jira", "ci/cd", "github actions", "figma", "kafka", "rabbitmq",
            "nginx",
        ],
    ),
];

/// `Languages: Python` → `Python`; longer text before the colon is content.
const MAX_LABEL_CHARS: usize = 30;

/// True when `token` is exactly one of the table's keywords.
pub fn is_skill_keyword(token: &str) -> bool {
    let lower = token.to_lowercase();
    CATEGORY_TABLE
        .iter()
        .any(|(_, keywords)| keywords.contains(&lower.as_str()))
}

#[derive(Debug, Clone)]
pub struct SkillClassifier {
    table: &'static [(&'static str, &'static [&'static str])],
}

impl Default for SkillClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillClassifier {
    pub fn new() -> Self {
        Self {
            table: CATEGORY_TABLE,
        }
    }

    /// Table categories with at least one keyword in the text; when none match,
    /// a single `Technical Skills` category with the raw comma-separated tokens.
    pub fn classify<'a, I>(&self, lines: I) -> Vec<SkillCategory>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines: Vec<&str> = lines.into_iter().filter(|l| !l.trim().is_empty()).collect();
        let blob = lines.join("\n").to_lowercase();

        let categories: Vec<SkillCategory> = self
            .table
            .iter()
            .filter_map(|(category, keywords)| {
                let items: Vec<String> = keywords
                    .iter()
                    .filter(|k| contains_token(&blob, k))
                    .map(|k| k.to_string())
                    .collect();
                (!items.is_empty()).then(|| SkillCategory {
                    category: category.to_string(),
                    items,
                })
            })
            .collect();

        if !categories.is_empty() {
            debug!("Classified skills into {} categories", categories.len());
            return categories;
        }

        let items: Vec<String> = lines
            .iter()
            .map(|line| strip_label(content_of(line)))
            .flat_map(|line| line.split([',', ';']))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            return Vec::new();
        }
        debug!("No skill keywords matched; using {} raw tokens", items.len());
        vec![SkillCategory {
            category: FALLBACK_CATEGORY.to_string(),
            items,
        }]
    }
}

fn strip_label(line: &str) -> &str {
    match line.split_once(':') {
        Some((label, rest)) if label.chars().count() <= MAX_LABEL_CHARS => rest.trim(),
        _ => line,
    }
}
