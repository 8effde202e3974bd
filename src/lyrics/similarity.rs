//! Text similarity used to line up lyric lines with transcribed speech.
//!
//! Works on grapheme clusters rather than words, so lyrics without spaces
//! (Chinese, Japanese) still score by shared characters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

static PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn normalize_string(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    // Lowercase, replace non-word chars with spaces, collapse whitespace
    let lower = s.to_lowercase();
    let replaced = PUNCT_RE.replace_all(&lower, " ");
    WS_RE.replace_all(&replaced, " ").trim().to_string()
}

fn graphemes(s: &str) -> Vec<&str> {
    s.graphemes(true).collect()
}

fn get_ngrams(chars: &[&str], size: usize) -> HashSet<String> {
    let mut out = HashSet::new();
    if chars.len() < size || size == 0 {
        return out;
    }
    for window in chars.windows(size) {
        out.insert(window.concat());
    }
    out
}

fn get_dice_coefficient(a: &[&str], b: &[&str]) -> f64 {
    let a_grams = get_ngrams(a, 2);
    let b_grams = get_ngrams(b, 2);
    if a_grams.is_empty() && b_grams.is_empty() {
        // Single characters: bigrams say nothing, compare directly.
        return if a == b { 1.0 } else { 0.0 };
    }
    if a_grams.is_empty() || b_grams.is_empty() {
        return 0.0;
    }
    let inter = a_grams.intersection(&b_grams).count() as f64;
    (2.0 * inter) / ((a_grams.len() + b_grams.len()) as f64)
}

fn levenshtein_distance(a: &[&str], b: &[&str]) -> usize {
    if a == b {
        return 0;
    }
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut curr: Vec<usize> = vec![0; a.len() + 1];
    for (j, bj) in b.iter().enumerate() {
        curr[0] = j + 1;
        for (i, ai) in a.iter().enumerate() {
            let cost = if ai == bj { 0 } else { 1 };
            curr[i + 1] = std::cmp::min(
                std::cmp::min(prev[i + 1] + 1, curr[i] + 1),
                prev[i] + cost,
            );
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[a.len()]
}

/// Similarity of two lines in `0.0..=1.0`; 0 when either side is empty.
pub fn ratio(a: &str, b: &str) -> f64 {
    let na = normalize_string(a);
    let nb = normalize_string(b);
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }
    let ga = graphemes(&na);
    let gb = graphemes(&nb);
    let dice = get_dice_coefficient(&ga, &gb);
    let max_len = ga.len().max(gb.len()) as f64;
    let lev = 1.0 - (levenshtein_distance(&ga, &gb) as f64 / max_len);
    (dice * 0.6 + lev * 0.4).clamp(0.0, 1.0)
}
