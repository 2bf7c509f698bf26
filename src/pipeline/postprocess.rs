//! Post-processing: deterministic cleanup of extracted page text.
//!
//! pdfium returns text with the line endings, padding and invisible
//! characters of the source content stream. These rules tidy it without
//! touching content; each is a pure `&str → String` pass.
//!
//! ## Rule Order
//!
//! Line endings are normalised first so every later rule sees `\n` only.
//! Invisible characters go before trimming so a line holding nothing but a
//! zero-width space becomes blank and collapses with its neighbours.

use once_cell::sync::Lazy;
use regex::Regex;

/// Clean raw page text, returning `None` when nothing visible remains.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip invisible Unicode and stray control characters
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 2
/// 5. Drop leading and trailing blank lines
pub fn clean_text(input: &str) -> Option<String> {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = s.trim_matches('\n');
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible characters ──────────────────────────────────────

// C0 controls other than tab and newline; pdfium emits some of these for
// hyphenation and form breaks.
static RE_CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());

fn remove_invisible_chars(input: &str) -> String {
    let s = input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FFFE}',
        ],
        "",
    );
    RE_CONTROL.replace_all(&s, "").into_owned()
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────
