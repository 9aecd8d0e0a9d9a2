//! String similarity scoring.

use crate::normalize::tokens;

/// Levenshtein distance, two-row DP over chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Normalized edit similarity in [0, 1]. Two empty strings are identical.
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Token-set similarity, intersection-biased: word order and extra modifier
/// tokens matter less than the shared core. Both inputs must already be
/// normalized.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let mut shared: Vec<&str> = ta.iter().filter(|t| tb.contains(t)).copied().collect();
    shared.sort_unstable();
    shared.dedup();
    let mut only_a: Vec<&str> = ta.iter().filter(|t| !tb.contains(t)).copied().collect();
    only_a.sort_unstable();
    only_a.dedup();
    let mut only_b: Vec<&str> = tb.iter().filter(|t| !ta.contains(t)).copied().collect();
    only_b.sort_unstable();
    only_b.dedup();

    let core = shared.join(" ");
    let full_a = join_nonempty(&core, &only_a.join(" "));
    let full_b = join_nonempty(&core, &only_b.join(" "));

    edit_ratio(&core, &full_a)
        .max(edit_ratio(&core, &full_b))
        .max(edit_ratio(&full_a, &full_b))
}

fn join_nonempty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

/// Composite similarity: weighted token-set plus edit-distance ratio.
pub fn composite(a: &str, b: &str, token_weight: f64) -> f64 {
    let w = token_weight.clamp(0.0, 1.0);
    let score = w * token_set_ratio(a, b) + (1.0 - w) * edit_ratio(a, b);
    score.clamp(0.0, 1.0)
}
