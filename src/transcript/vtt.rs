//! WebVTT caption to plain text conversion.

use regex::Regex;
use std::sync::OnceLock;

fn tag_regex() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    // Inline cue markup: <c>, </c>, <00:00:01.500>, <v Speaker>, ...
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Convert a WebVTT document to running plain text.
///
/// Drops the header, NOTE/STYLE/REGION blocks, cue identifiers and timing
/// lines, strips inline tags, and collapses the consecutive duplicate lines
/// that rolling auto-generated captions produce.
pub fn vtt_to_text(vtt: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut skipping_block = false;
    let mut in_header = true;

    for raw in vtt.lines() {
        let line = raw.trim();

        if line.is_empty() {
            skipping_block = false;
            in_header = false;
            continue;
        }
        if in_header {
            // WEBVTT line plus header metadata (Kind:, Language:)
            continue;
        }
        if skipping_block {
            continue;
        }
        if line.starts_with("NOTE") || line == "STYLE" || line == "REGION" {
            skipping_block = true;
            continue;
        }
        if line.contains("-->") || line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let text = decode_entities(&tag_regex().replace_all(line, ""));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }
        if lines.last().is_some_and(|prev| *prev == text) {
            continue;
        }
        lines.push(text);
    }

    lines.join(" ")
}
