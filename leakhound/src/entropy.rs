//! Shannon entropy over a token's character distribution.

use rustc_hash::FxHashMap;

/// Calculates Shannon entropy in bits per character, rounded to 2 decimals
/// for stable comparison.
///
/// Typical values:
/// - English text: ~3.5-4.5
/// - Random alphanumeric: ~5.5-6.0
/// - API keys/secrets: ~4.5-6.0
#[must_use]
pub fn calculate_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut char_counts: FxHashMap<char, usize> = FxHashMap::default();
    let mut len = 0usize;
    for c in s.chars() {
        *char_counts.entry(c).or_insert(0) += 1;
        len += 1;
    }
    let len = len as f64;

    let entropy: f64 = char_counts
        .values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum();

    (entropy * 100.0).round() / 100.0
}

/// Counts how many of {uppercase, lowercase, digit} appear in the token.
/// Secrets usually mix at least two classes; single-class strings are
/// mostly identifiers or padding.
#[must_use]
pub fn char_class_count(s: &str) -> usize {
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = s.chars().any(|c| c.is_ascii_digit());
    usize::from(has_upper) + usize::from(has_lower) + usize::from(has_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_of_empty_string_is_zero() {
        assert_eq!(calculate_entropy(""), 0.0);
    }

    #[test]
    fn entropy_of_repeated_char_is_zero() {
        assert_eq!(calculate_entropy("aaaa"), 0.0);
        assert_eq!(calculate_entropy("a"), 0.0);
    }

    #[test]
    fn entropy_is_permutation_invariant() {
        assert_eq!(
            calculate_entropy("aB3xK9pQ2mL7nR4wE6yT"),
            calculate_entropy("TyE6w4Rn7Lm2Qp9Kx3Ba")
        );
    }

    #[test]
    fn entropy_of_mixed_random_token_exceeds_threshold() {
        // 62 distinct characters: A-Z, a-z, 0-9
        let token: String = ('A'..='Z').chain('a'..='z').chain('0'..='9').collect();
        assert_eq!(token.len(), 62);
        assert!(calculate_entropy(&token) > 4.5);
    }

    #[test]
    fn entropy_of_two_chars() {
        let e = calculate_entropy("ab");
        assert!((e - 1.0).abs() < 0.01, "entropy: {e}");
    }

    #[test]
    fn entropy_of_variable_name_is_low() {
        assert!(calculate_entropy("user_password_value") < 4.0);
    }

    #[test]
    fn char_classes() {
        assert_eq!(char_class_count("abcdef"), 1);
        assert_eq!(char_class_count("abcDEF"), 2);
        assert_eq!(char_class_count("abcDEF123"), 3);
        assert_eq!(char_class_count("____"), 0);
    }
}
