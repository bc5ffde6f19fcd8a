//! Deterministic snippet-to-context extraction.
//!
//! Finds the sentence of a fetched document most similar to a search
//! snippet (bag-of-words F1) and returns a bounded window around it.

use std::collections::HashSet;

/// A sentence must beat this F1 against the snippet to anchor a window.
const F1_FLOOR: f64 = 0.2;

/// Split text into sentences, keeping each sentence's byte offset in the
/// original. Breaks after `.`, `!` or `?` (plus trailing closers) when
/// followed by whitespace; the scan order is stable.
pub fn split_sentences(text: &str) -> Vec<(usize, &str)> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let mut end = i + ch.len_utf8();
        while let Some(&(j, closer)) = chars.peek() {
            if matches!(closer, '.' | '!' | '?' | '"' | '\'' | ')' | ']') {
                chars.next();
                end = j + closer.len_utf8();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if at_boundary {
            push_trimmed(&mut sentences, text, start, end);
            start = end;
        }
    }
    push_trimmed(&mut sentences, text, start, text.len());
    sentences
}

fn push_trimmed<'a>(out: &mut Vec<(usize, &'a str)>, text: &'a str, start: usize, end: usize) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let offset = start + (raw.len() - raw.trim_start().len());
    out.push((offset, trimmed));
}

/// Punctuation-stripped, lower-cased bag of words.
pub fn bag_of_words(text: &str) -> HashSet<String> {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Set-overlap F1 between a reference bag and a candidate bag.
pub fn set_f1(reference: &HashSet<String>, candidate: &HashSet<String>) -> f64 {
    let intersection = reference.intersection(candidate).count();
    if intersection == 0 {
        return 0.0;
    }
    let precision = intersection as f64 / candidate.len() as f64;
    let recall = intersection as f64 / reference.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

/// Extract the window of `raw` most relevant to `snippet`.
///
/// The best-scoring sentence anchors a window of `window` characters on
/// each side; on a tie the first sentence wins. When no sentence clears
/// the floor, the fallback is the first `2 * window` characters.
pub fn extract_context(raw: &str, snippet: &str, window: usize) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let snippet_bag = bag_of_words(snippet);
    let mut best_f1 = F1_FLOOR;
    let mut best: Option<&str> = None;
    for (_, sentence) in split_sentences(raw) {
        let f1 = set_f1(&snippet_bag, &bag_of_words(sentence));
        if f1 > best_f1 {
            best_f1 = f1;
            best = Some(sentence);
        }
    }

    match best {
        Some(sentence) => {
            // First occurrence of the sentence text in document order.
            let anchor = raw.find(sentence).unwrap_or(0);
            let start = back_by_chars(raw, anchor, window);
            let end = forward_by_chars(raw, anchor + sentence.len(), window);
            raw[start..end].to_string()
        }
        None => raw.chars().take(2 * window).collect(),
    }
}

/// Byte index `n` characters before `pos`, clamped to the text start.
fn back_by_chars(text: &str, pos: usize, n: usize) -> usize {
    text[..pos]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(pos, |(i, _)| i)
}

/// Byte index `n` characters after `pos`, clamped to the text end.
fn forward_by_chars(text: &str, pos: usize, n: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| pos + i)
}
