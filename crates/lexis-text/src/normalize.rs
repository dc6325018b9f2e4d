use regex::Regex;
use std::sync::LazyLock;

use crate::NormalizedText;

/// Marker separating paragraphs in normalized text.
pub const PARAGRAPH_BREAK: &str = "\n\n";

static HYPHEN_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\n[ \t]*").expect("valid hyphen-break regex"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank-line regex"));

/// Convert CRLF and lone CR line endings to LF.
pub fn unify_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Repair extraction artifacts and collapse whitespace.
///
/// Rules, in order:
/// 1. line endings are unified to `\n`;
/// 2. a hyphen at the end of a line joins the word fragments on either side;
/// 3. two or more line breaks become one paragraph break, any other line
///    break becomes a space;
/// 4. whitespace runs collapse to one space and the ends are trimmed.
///
/// Empty input gives empty output. The function is idempotent.
pub fn normalize(text: &str) -> NormalizedText {
    if text.trim().is_empty() {
        return NormalizedText::default();
    }

    let unified = unify_line_endings(text);
    let repaired = repair_hyphenation(&unified);

    let paragraphs: Vec<String> = BLANK_LINES
        .split(&repaired)
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .collect();

    NormalizedText::from_normalized(paragraphs.join(PARAGRAPH_BREAK))
}

/// Drop `-\n` (and indentation on the next line) when it sits between two
/// word characters. Hyphens before a paragraph break or next to punctuation
/// are left alone.
fn repair_hyphenation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in HYPHEN_BREAK.find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        out.push_str(&text[last..m.start()]);
        let joins_word = before.is_some_and(char::is_alphanumeric)
            && after.is_some_and(char::is_alphanumeric);
        if !joins_word {
            out.push_str(m.as_str());
        }
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(normalize("").is_empty());
        assert!(normalize(" \r\n\t ").is_empty());
    }

    #[test]
    fn test_crlf_and_single_breaks_become_spaces() {
        let text = normalize("The cell\r\nmembrane is\rthin.");
        assert_eq!(text.as_str(), "The cell membrane is thin.");
    }

    #[test]
    fn test_hyphenation_repair() {
        let text = normalize("photo-\n   synthesis and respi-\nration");
        assert_eq!(text.as_str(), "photosynthesis and respiration");
    }

    #[test]
    fn test_hyphen_before_paragraph_break_is_kept() {
        let text = normalize("a list item -\n\nNext paragraph");
        assert_eq!(text.as_str(), "a list item -\n\nNext paragraph");
    }

    #[test]
    fn test_paragraph_breaks_collapse_to_one_marker() {
        let text = normalize("First  paragraph.\n\n\n  \nSecond\tparagraph.");
        assert_eq!(text.as_str(), "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_idempotent_on_messy_input() {
        let once = normalize("  Intro-\nduction\r\n\r\n\r\nBody  text -  \n\n x-\n\ny ");
        let twice = normalize(once.as_str());
        assert_eq!(once, twice);
    }
}
