//! Date-shape detection for record lines (year ranges, month-year, bare years).

use regex::Regex;

const MONTH: &str = r"(?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?";

/// Start/end years resolved from a date line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSpan {
    pub start: String,
    /// Empty when `current` is set.
    pub end: String,
    pub current: bool,
}

/// Compiled date patterns. Each record parser owns its own instance.
#[derive(Debug, Clone)]
pub struct DatePatterns {
    year: Regex,
    range: Regex,
    month_year: Regex,
    bare_year: Regex,
    ongoing: Regex,
}

impl Default for DatePatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl DatePatterns {
    pub fn new() -> Self {
        let point = format!(r"(?:{MONTH},?\s+)?(?:\d{{1,2}}[/.])?(?:19|20)\d{{2}}");
        let range = format!(
            r"(?i)\b{point}\s*(?:-|–|—|to|until|till)\s*(?:{point}|present|current|now|date|today)\b"
        );
        Self {
            year: Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern"),
            range: Regex::new(&range).expect("range pattern"),
            month_year: Regex::new(&format!(r"(?i)\b{MONTH},?\s+(?:19|20)\d{{2}}\b"))
                .expect("month-year pattern"),
            bare_year: Regex::new(
                r"(?i)^(?:(?:expected|graduated|graduation|class of|since)\s*:?\s*)?(?:19|20)\d{2}$",
            )
            .expect("bare year pattern"),
            ongoing: Regex::new(r"(?i)\b(?:present|current|now)\b").expect("ongoing pattern"),
        }
    }

    /// True when the line is a date sub-field: contains a year range or a
    /// month-year, or is a lone year.
    pub fn is_date_line(&self, line: &str) -> bool {
        self.contains_date(line) || self.bare_year.is_match(line.trim())
    }

    /// True when the line carries a range or month-year anywhere inside it.
    pub fn contains_date(&self, line: &str) -> bool {
        self.range.is_match(line) || self.month_year.is_match(line)
    }

    pub fn years<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.year.find_iter(line).map(|m| m.as_str()).collect()
    }

    pub fn is_ongoing(&self, line: &str) -> bool {
        self.ongoing.is_match(line)
    }

    /// First two years become start/end; an ongoing marker clears the end.
    pub fn span(&self, line: &str) -> DateSpan {
        let years = self.years(line);
        let current = self.is_ongoing(line);
        DateSpan {
            start: years.first().map(|y| y.to_string()).unwrap_or_default(),
            end: if current {
                String::new()
            } else {
                years.get(1).map(|y| y.to_string()).unwrap_or_default()
            },
            current,
        }
    }

    /// Completion date of a line: `Present` for ongoing, else its last year.
    pub fn completion(&self, line: &str) -> String {
        if self.is_ongoing(line) {
            return "Present".to_string();
        }
        self.years(line)
            .last()
            .map(|y| y.to_string())
            .unwrap_or_default()
    }

    /// Removes every date expression, leaving the surrounding text.
    pub fn strip(&self, line: &str) -> String {
        let without_ranges = self.range.replace_all(line, " ");
        let without_months = self.month_year.replace_all(&without_ranges, " ");
        let without_years = self.year.replace_all(&without_months, " ");
        without_years.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_is_date_line() {
        let d = DatePatterns::new();
        assert!(d.is_date_line("2020 - 2023"));
        assert!(d.is_date_line("2019 – Present"));
        assert!(d.is_date_line("Jan 2020 to Mar 2023"));
        assert!(d.is_date_line("01/2020 - 03/2023"));
    }

    #[test]
    fn test_month_year_and_bare_year() {
        let d = DatePatterns::new();
        assert!(d.is_date_line("May 2019"));
        assert!(d.is_date_line("2019"));
        assert!(d.is_date_line("Expected 2025"));
    }

    #[test]
    fn test_prose_is_not_date_line() {
        let d = DatePatterns::new();
        assert!(!d.is_date_line("Acme Corp"));
        assert!(!d.is_date_line("Marketing 2020 campaign lead"));
        assert!(!d.is_date_line("Led a team of 4"));
    }

    #[test]
    fn test_span_closed_range() {
        let span = DatePatterns::new().span("2020 - 2023");
        assert_eq!(span.start, "2020");
        assert_eq!(span.end, "2023");
        assert!(!span.current);
    }

    #[test]
    fn test_span_present_clears_end() {
        let span = DatePatterns::new().span("2021 - Present");
        assert_eq!(span.start, "2021");
        assert_eq!(span.end, "");
        assert!(span.current);
    }

    #[test]
    fn test_span_single_year_leaves_end_empty() {
        let span = DatePatterns::new().span("Since 2018");
        assert_eq!(span.start, "2018");
        assert_eq!(span.end, "");
        assert!(!span.current);
    }

    #[test]
    fn test_completion_takes_last_year() {
        let d = DatePatterns::new();
        assert_eq!(d.completion("2015 - 2019"), "2019");
        assert_eq!(d.completion("2022 - Present"), "Present");
        assert_eq!(d.completion("no dates"), "");
    }

    #[test]
    fn test_strip_removes_dates() {
        let d = DatePatterns::new();
        assert_eq!(d.strip("State University 2015 - 2019"), "State University");
        assert_eq!(d.strip("Acme Corp (Jan 2020 - Present)"), "Acme Corp ( )");
    }
}
