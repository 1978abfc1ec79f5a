//! Normalizer: canonical line-oriented form of raw extracted text.
//!
//! CRLF and lone CR become LF, whitespace runs collapse to one space, control and
//! invisible format characters are dropped, each line is trimmed and blank-line
//! runs shrink to a single separator. `normalize(normalize(x)) == normalize(x)`.

/// Immutable normalized text plus its line-split view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    /// Byte ranges of each line inside `text`.
    spans: Vec<(usize, usize)>,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let text = normalize(raw);
        let mut spans = Vec::new();
        if !text.is_empty() {
            let mut start = 0;
            for line in text.split('\n') {
                spans.push((start, start + line.len()));
                start += line.len() + 1;
            }
        }
        Self { text, spans }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.spans.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|&(s, e)| &self.text[s..e])
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.line_count()).filter_map(move |index| self.line(index))
    }

    /// Non-empty lines, in order.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines().filter(|l| !l.is_empty())
    }
}

/// Produces the canonical string form. Never fails; degenerate input yields "".
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut in_blank_run = false;

    for line in unified.split('\n') {
        let cleaned = clean_line(line);
        if cleaned.is_empty() {
            if !lines.is_empty() && !in_blank_run {
                lines.push(String::new());
                in_blank_run = true;
            }
            continue;
        }
        in_blank_run = false;
        lines.push(cleaned);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

fn clean_line(line: &str) -> String {
    let mut cleaned = String::with_capacity(line.len());
    let mut pending_space = false;

    for c in line.chars() {
        if c.is_whitespace() {
            pending_space = !cleaned.is_empty();
            continue;
        }
        if is_invisible(c) {
            continue;
        }
        if pending_space {
            cleaned.push(' ');
            pending_space = false;
        }
        cleaned.push(c);
    }

    cleaned
}

fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{00AD}'
                | '\u{200B}'..='\u{200F}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2060}'..='\u{2064}'
                | '\u{FEFF}'
        )
}
