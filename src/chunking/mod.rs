//! Text segmentation for fitting transcripts into a bounded prompt size.
//!
//! All budgets are measured in characters (Unicode scalar values), never bytes,
//! so splitting is always on a `char` boundary.
//!
//! - [`chunk_text`] splits on sentence boundaries and guarantees every chunk is
//!   within budget.
//! - [`sample_text`] keeps a head, middle and tail excerpt of an oversized text.

mod sample;

pub use sample::{sample_text, SAMPLE_SEPARATOR};

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` into sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace. Surrounding
/// whitespace is trimmed and empty sentences are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let ends_sentence = chars.peek().is_some_and(|(_, next)| next.is_whitespace());
        if ends_sentence {
            let end = idx + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}

/// Hard-split `text` into pieces of at most `max_chars` characters.
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Split `text` into ordered chunks of at most `max_chars` characters.
///
/// Sentences are accumulated greedily, joined by a single space, until the
/// next one would overflow the budget. A sentence longer than the budget is
/// hard-split into fixed-size pieces. Text already within budget is returned
/// unchanged as a single chunk; blank text yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    if text.trim().is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let sentence_len = char_len(sentence);

        if sentence_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(hard_split(sentence, max_chars));
            continue;
        }

        let joined_len = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if joined_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_len = sentence_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
            current_len = joined_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_whitespace(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Deterministic pseudo-random lecture-like text.
    fn generated_text(seed: u64, words: usize) -> String {
        let vocab = [
            "entropy", "is", "a", "measure", "of", "disorder", "über", "naïve", "energy",
            "the", "system", "heat", "flows", "élan", "temperature", "界",
        ];
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut out = String::new();
        for i in 0..words {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let word = vocab[(state >> 33) as usize % vocab.len()];
            if i > 0 {
                out.push(if (state >> 20) % 7 == 0 { '\n' } else { ' ' });
            }
            out.push_str(word);
            match (state >> 40) % 9 {
                0 => out.push('.'),
                1 => out.push('?'),
                2 => out.push('!'),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("First one. Second?  Third!\nFourth without end");
        assert_eq!(
            sentences,
            vec!["First one.", "Second?", "Third!", "Fourth without end"]
        );
    }

    #[test]
    fn test_split_keeps_decimal_points() {
        let sentences = split_sentences("Pi is 3.14 roughly. Next.");
        assert_eq!(sentences, vec!["Pi is 3.14 roughly.", "Next."]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("   \n\t ", 100).is_empty());
    }

    #[test]
    fn test_small_input_is_unchanged() {
        let text = "  Short text.   With odd   spacing.  ";
        assert_eq!(chunk_text(text, 500), vec![text.to_string()]);
    }

    #[test]
    fn test_greedy_accumulation() {
        let text = "Aaaa aaaa. Bbbb bbbb. Cccc cccc. Dddd dddd.";
        let chunks = chunk_text(text, 21);
        assert_eq!(
            chunks,
            vec!["Aaaa aaaa. Bbbb bbbb.", "Cccc cccc. Dddd dddd."]
        );
    }

    #[test]
    fn test_long_sentence_is_hard_split() {
        let long = "x".repeat(25);
        let text = format!("Intro. {} Outro.", long);
        let chunks = chunk_text(&text, 10);

        assert_eq!(chunks[0], "Intro.");
        assert!(chunks.iter().all(|c| char_len(c) <= 10));
        assert_eq!(non_whitespace(&chunks.concat()), non_whitespace(&text));
    }

    #[test]
    fn test_multibyte_hard_split_stays_on_char_boundary() {
        let text = "日本語のテキストはとても長いです".repeat(3);
        let chunks = chunk_text(&text, 7);
        assert!(chunks.iter().all(|c| char_len(c) <= 7));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_budget_and_content_preserved_for_generated_inputs() {
        for seed in 0..40u64 {
            let text = generated_text(seed, 50 + (seed as usize * 37) % 400);
            for budget in [1usize, 2, 5, 17, 64, 250, 1000] {
                let chunks = chunk_text(&text, budget);
                for chunk in &chunks {
                    assert!(
                        char_len(chunk) <= budget,
                        "seed {} budget {}: chunk of {} chars",
                        seed,
                        budget,
                        char_len(chunk)
                    );
                }
                assert_eq!(
                    non_whitespace(&chunks.concat()),
                    non_whitespace(&text),
                    "seed {} budget {}",
                    seed,
                    budget
                );
            }
        }
    }

    #[test]
    fn test_twenty_thousand_chars_make_two_chunks() {
        let sentence = "The mitochondria is the powerhouse of the cell. ";
        let mut text = String::new();
        while char_len(&text) < 20_000 {
            text.push_str(sentence);
        }
        let text: String = text.chars().take(20_000).collect();

        let chunks = chunk_text(&text, 15_000);
        assert_eq!(chunks.len(), 2);
    }
}
