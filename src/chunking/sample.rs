//! Lossy head/middle/tail sampling of oversized text.

use super::char_len;

/// Marker placed between sampled spans.
pub const SAMPLE_SEPARATOR: &str = "\n\n...\n\n";

/// Reduce `text` to three excerpts of `max_chars / 3` characters each.
///
/// Returns the input unchanged when it already fits. Otherwise the head, the
/// span centred on the middle, and the tail are joined with [`SAMPLE_SEPARATOR`].
pub fn sample_text(text: &str, max_chars: usize) -> String {
    let total = char_len(text);
    if total <= max_chars {
        return text.to_string();
    }

    let part = max_chars / 3;
    let chars: Vec<char> = text.chars().collect();

    let head: String = chars[..part].iter().collect();

    let middle_start = (total / 2).saturating_sub(part / 2);
    let middle: String = chars[middle_start..middle_start + part].iter().collect();

    let tail: String = chars[total - part..].iter().collect();

    [head, middle, tail].join(SAMPLE_SEPARATOR)
}
