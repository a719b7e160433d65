//! Lenient recovery of a JSON value from free-form model text.

/// Code fence delimiter.
const FENCE: &str = "```";

/// Drop a fenced code block's delimiters and language tag, keeping its body.
///
/// Text without a fence is returned as is. An unterminated fence keeps
/// everything after the opening delimiter.
fn strip_fence(text: &str) -> &str {
    let Some(open) = text.find(FENCE) else {
        return text;
    };

    let after = &text[open + FENCE.len()..];
    // Optional language tag such as `json` right after the opening fence
    let after = after.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    match after.rfind(FENCE) {
        Some(close) => &after[..close],
        None => after,
    }
}

/// Locate the JSON value in a model reply.
///
/// Strips a surrounding code fence, then spans from the first `{` or `[` to
/// the last matching `}` or `]`. Returns `None` when no bracket pair exists.
/// This is a heuristic, not a parser: the span still has to be parsed.
pub fn extract_json(text: &str) -> Option<&str> {
    let body = strip_fence(text);

    let start = body.find(|c: char| c == '{' || c == '[')?;
    let close = if body[start..].starts_with('{') { '}' } else { ']' };
    let end = body.rfind(close)?;

    if end < start {
        return None;
    }

    Some(body[start..=end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commentary_and_fence() {
        let text = "Sure! ```json\n[{\"a\":1}]\n```";
        assert_eq!(extract_json(text), Some("[{\"a\":1}]"));
    }

    #[test]
    fn test_no_brackets() {
        assert_eq!(extract_json("I cannot help with that."), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn test_plain_json_passthrough() {
        let text = "  {\"question\": \"q\", \"answer\": \"a\"}  ";
        assert_eq!(
            extract_json(text),
            Some("{\"question\": \"q\", \"answer\": \"a\"}")
        );
    }

    #[test]
    fn test_trailing_commentary() {
        let text = "Here is the JSON:\n[1, 2, 3]\nLet me know if you need more!";
        assert_eq!(extract_json(text), Some("[1, 2, 3]"));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = "```\n{\"ok\": true}\n```";
        assert_eq!(extract_json(text), Some("{\"ok\": true}"));
    }

    #[test]
    fn test_unterminated_fence() {
        let text = "```json\n[{\"a\": [1, 2]}]";
        assert_eq!(extract_json(text), Some("[{\"a\": [1, 2]}]"));
    }

    #[test]
    fn test_open_without_close() {
        assert_eq!(extract_json("[ this never closes"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }
}
