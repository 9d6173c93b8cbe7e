//! Response parsing
//!
//! Turns the oracle's free text into snippet bodies. The model is only asked
//! for a numbered list, so this is a heuristic line scanner with a paragraph
//! fallback. It never fails; the worst case is an empty result.

/// Upper word bound for an accepted snippet (target length plus 20%).
pub const MAX_WORDS: usize = 120;

/// Accepted snippets must be strictly longer than this many characters.
pub const MIN_CHARS: usize = 20;

/// Lower word bound for paragraphs accepted by the fallback split.
pub const FALLBACK_MIN_WORDS: usize = 5;

const BULLETS: [char; 3] = ['•', '-', '*'];

/// A text span extracted from the response, not yet accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    text: String,
    word_count: usize,
}

impl Candidate {
    fn new(text: &str) -> Self {
        let text = text.trim();
        Self {
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
        }
    }

    fn is_acceptable(&self) -> bool {
        self.word_count <= MAX_WORDS && self.text.chars().count() > MIN_CHARS
    }
}

/// Scanner state: either no item is being built, or one is open.
#[derive(Debug)]
enum ScanState {
    Idle,
    Open(String),
}

impl ScanState {
    /// Start an item from `text`; an empty remainder leaves nothing open.
    fn begin(text: &str) -> Self {
        if text.is_empty() {
            ScanState::Idle
        } else {
            ScanState::Open(text.to_string())
        }
    }
}

/// Parse a raw response into at most `max_count` snippet bodies, in the
/// order they appear.
pub fn parse(raw: &str, max_count: usize) -> Vec<String> {
    let mut accepted = scan_items(raw);
    if accepted.is_empty() {
        accepted = split_paragraphs(raw);
    }
    accepted.truncate(max_count);
    accepted
}

fn scan_items(raw: &str) -> Vec<String> {
    let mut accepted = Vec::new();
    let mut state = ScanState::Idle;

    for line in raw.trim().split('\n').map(str::trim) {
        state = if is_item_start(line) {
            close(state, &mut accepted);
            ScanState::begin(strip_number_marker(line))
        } else if line.is_empty() {
            state
        } else {
            match state {
                ScanState::Open(mut text) => {
                    text.push(' ');
                    text.push_str(line);
                    ScanState::Open(text)
                }
                ScanState::Idle => match strip_bullet(line) {
                    Some(rest) => ScanState::begin(rest),
                    None => ScanState::Idle,
                },
            }
        };
    }
    close(state, &mut accepted);

    accepted
}

fn close(state: ScanState, accepted: &mut Vec<String>) {
    if let ScanState::Open(text) = state {
        let candidate = Candidate::new(&text);
        if candidate.is_acceptable() {
            accepted.push(candidate.text);
        }
    }
}

fn split_paragraphs(raw: &str) -> Vec<String> {
    raw.split("\n\n")
        .map(Candidate::new)
        .filter(|c| {
            (FALLBACK_MIN_WORDS..=MAX_WORDS).contains(&c.word_count)
                && c.text.chars().count() > MIN_CHARS
        })
        .map(|c| c.text)
        .collect()
}

/// A new numbered item: leading digit, and a `.` or `)` anywhere on the line.
fn is_item_start(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit()) && (line.contains('.') || line.contains(')'))
}

/// Strip a leading `<digits><.|)>` marker and following whitespace, if present.
fn strip_number_marker(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    match line[digits..].strip_prefix(&['.', ')'][..]) {
        Some(rest) if digits > 0 => rest.trim_start(),
        _ => line,
    }
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix(&BULLETS[..]).map(str::trim_start)
}
