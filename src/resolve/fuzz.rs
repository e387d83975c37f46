//! String similarity scorers on a 0-100 scale.
//!
//! All scorers compare Unicode scalar values. The base metric is the indel
//! similarity `2 * LCS / (len_a + len_b)`; the other scorers build on it by
//! sliding windows over the longer string or by normalising token order.

/// Normalise a string for scoring: every character that is not alphanumeric
/// (or `_`) becomes a space, then the result is lowercased and trimmed.
pub fn full_process(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();
    replaced.to_lowercase().trim().to_string()
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Unrounded similarity in `0.0..=1.0`. An empty side scores 0.
fn similarity(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    2.0 * lcs_len(a, b) as f64 / (a.len() + b.len()) as f64
}

fn to_score(similarity: f64) -> u32 {
    (similarity * 100.0).round() as u32
}

/// Whole-string similarity.
pub fn ratio(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    to_score(similarity(&a, &b))
}

/// Best similarity of the shorter string against any equally long window
/// of the longer one. A substring match scores 100.
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    if a == b {
        return 100;
    }
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0.0f64;
    for window in longer.windows(shorter.len()) {
        let s = similarity(shorter, window);
        if s > 0.995 {
            return 100;
        }
        best = best.max(s);
    }
    to_score(best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// [`ratio`] after sorting whitespace-separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// [`partial_ratio`] after sorting whitespace-separated tokens.
pub fn partial_token_sort_ratio(a: &str, b: &str) -> u32 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_with(a: &str, b: &str, scorer: fn(&str, &str) -> u32) -> u32 {
    use std::collections::BTreeSet;

    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |set: Vec<&str>| set.join(" ");
    let common = join(ta.intersection(&tb).copied().collect());
    let only_a = join(ta.difference(&tb).copied().collect());
    let only_b = join(tb.difference(&ta).copied().collect());

    let combined_a = format!("{} {}", common, only_a).trim().to_string();
    let combined_b = format!("{} {}", common, only_b).trim().to_string();

    [
        scorer(&common, &combined_a),
        scorer(&common, &combined_b),
        scorer(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Compare the shared token set against each side's remainder.
pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    token_set_with(a, b, ratio)
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> u32 {
    token_set_with(a, b, partial_ratio)
}

/// Weighted blend of the scorers above.
///
/// Inputs are normalised with [`full_process`]. When one string is at least
/// 1.5 times longer than the other, partial scorers are used (scaled by 0.9,
/// or 0.6 beyond an 8x length difference); otherwise token scorers scaled by
/// 0.95 compete with the plain ratio.
pub fn wratio(a: &str, b: &str) -> u32 {
    let a = full_process(a);
    let b = full_process(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    const UNBASE_SCALE: f64 = 0.95;
    let base = ratio(&a, &b) as f64;
    let (la, lb) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = la.max(lb) / la.min(lb);

    let best = if len_ratio >= 1.5 {
        let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
        [
            base,
            partial_ratio(&a, &b) as f64 * partial_scale,
            partial_token_sort_ratio(&a, &b) as f64 * UNBASE_SCALE * partial_scale,
            partial_token_set_ratio(&a, &b) as f64 * UNBASE_SCALE * partial_scale,
        ]
    } else {
        [
            base,
            token_sort_ratio(&a, &b) as f64 * UNBASE_SCALE,
            token_set_ratio(&a, &b) as f64 * UNBASE_SCALE,
            0.0,
        ]
    };

    best.into_iter().fold(0.0, f64::max).round() as u32
}
