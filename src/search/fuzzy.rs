//! Approximate string matching for keyword search.
//!
//! `token_sort_ratio` lowercases both inputs, splits them on whitespace, sorts
//! the tokens and rejoins them with single spaces, then scores the two strings
//! with the normalized indel similarity `200 * lcs / (len_a + len_b)`, giving a
//! value in `[0, 100]` that ignores word order.

/// Order-insensitive similarity between two strings, in `[0, 100]`
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Indel similarity of two strings, in `[0, 100]`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(&a, &b) as f64 / total as f64
}

fn sorted_tokens(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
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
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_and_reordered_tokens_score_full() {
        assert!(approx(token_sort_ratio("Gaming Laptop", "gaming laptop"), 100.0));
        assert!(approx(token_sort_ratio("Laptop Gaming", "  gaming   LAPTOP "), 100.0));
    }

    #[test]
    fn partial_overlap() {
        // "bike" vs "bike mountain": lcs 4 over 17 chars
        assert!(approx(token_sort_ratio("bike", "Mountain Bike"), 800.0 / 17.0));
        // "kitten" vs "sitting": lcs "ittn"
        assert!(approx(ratio("kitten", "sitting"), 800.0 / 13.0));
    }

    #[test]
    fn empty_inputs() {
        assert!(approx(ratio("", ""), 100.0));
        assert!(approx(ratio("abc", ""), 0.0));
        assert!(approx(token_sort_ratio("   ", "desk"), 0.0));
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert!(approx(ratio("abc", "xyz"), 0.0));
    }
}
