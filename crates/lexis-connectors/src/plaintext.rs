use lexis_common::types::SourceFormat;

use crate::traits::{ExtractedDocument, Extractor};

/// Form feed, the page separator in plain-text exports.
const PAGE_BREAK: char = '\u{c}';

/// UTF-8 text; pages are separated by form feeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl Extractor for PlainTextExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::PlainText
    }

    fn extract(&self, bytes: &[u8]) -> ExtractedDocument {
        match std::str::from_utf8(bytes) {
            Ok(text) => ExtractedDocument::from_pages(split_pages(text)),
            Err(e) => ExtractedDocument::failed(format!("document is not valid UTF-8: {e}")),
        }
    }
}

/// UTF-8 HTML reduced to its text content as a single page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::Html
    }

    fn extract(&self, bytes: &[u8]) -> ExtractedDocument {
        match std::str::from_utf8(bytes) {
            Ok(html) => {
                let text = extract_html(html);
                if text.is_empty() {
                    ExtractedDocument::from_pages(Vec::new())
                } else {
                    ExtractedDocument::from_pages(vec![text])
                }
            }
            Err(e) => ExtractedDocument::failed(format!("document is not valid UTF-8: {e}")),
        }
    }
}

fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
    // A trailing form feed does not open a new page.
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    if pages.len() == 1 && pages[0].trim().is_empty() {
        pages.clear();
    }
    pages
}

/// Basic HTML-to-text extraction (strip tags). Block-level closing tags
/// become line breaks so paragraphs survive normalization. Script and style
/// bodies are dropped and the common character entities are decoded.
pub fn extract_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut tag = String::new();
    let mut prev_was_space = false;
    let mut skipping: Option<&'static str> = None;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag_name(&tag);
                if let Some(raw) = skipping {
                    if tag.starts_with('/') && name == raw {
                        skipping = None;
                    }
                    continue;
                }
                if !tag.starts_with('/') && !tag.ends_with('/') {
                    skipping = RAW_TEXT_TAGS.iter().copied().find(|raw| *raw == name);
                }
                if is_block_tag(&name) {
                    result.truncate(result.trim_end_matches(' ').len());
                    if !result.is_empty() && !result.ends_with("\n\n") {
                        result.push_str("\n\n");
                    }
                    prev_was_space = true;
                } else if !prev_was_space {
                    result.push(' ');
                    prev_was_space = true;
                }
            }
            _ if in_tag => tag.push(ch),
            _ if skipping.is_some() => {}
            _ => {
                if ch.is_whitespace() {
                    if !prev_was_space {
                        result.push(' ');
                        prev_was_space = true;
                    }
                } else {
                    result.push(ch);
                    prev_was_space = false;
                }
            }
        }
    }

    decode_entities(result.trim())
}

/// Elements whose body is code, not document text.
const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// `&amp;` goes last so `&amp;lt;` stays `&lt;`.
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "br" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "tr" | "section"
    )
}
