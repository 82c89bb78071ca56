//! Normalized edit similarity between a cell keyword and candidate labels.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::normalize::remove_brackets;

fn fold(s: &str) -> String {
    s.to_lowercase()
        .trim()
        .replace('–', "")
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// "john ronald tolkien" -> "j. ronald tolkien"
fn to_initial(label: &str) -> String {
    let mut tokens = label.split(' ');
    let first = tokens.next().and_then(|t| t.chars().next());
    let rest: Vec<&str> = tokens.collect();

    match first {
        Some(initial) => format!("{}. {}", initial, rest.join(" ")),
        None => label.to_string(),
    }
}

fn strip_punctuation(s: &str) -> String {
    remove_brackets(s)
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Similarity in `[0, 1]`, 1 meaning equal after normalization.
///
/// When the keyword looks like an abbreviated name (`"j. smith"`), the
/// label's first token is reduced to its initial before comparing.
pub fn similarity(keyword: &str, label: &str) -> f64 {
    let keyword = fold(keyword);
    let mut label = fold(label);

    if !label.is_empty() && keyword.chars().nth(1) == Some('.') {
        label = to_initial(&label);
    }

    let keyword = strip_punctuation(&keyword);
    let label = strip_punctuation(&label);

    if keyword.is_empty() || label.is_empty() {
        return 0.0;
    }

    strsim::normalized_levenshtein(&keyword, &label)
}

/// Best similarity against any label, 0 when there are none.
pub fn max_similarity<S: AsRef<str>>(keyword: &str, labels: &[S]) -> f64 {
    labels
        .iter()
        .map(|l| similarity(keyword, l.as_ref()))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_after_normalization() {
        assert_eq!(similarity("Paris", "paris"), 1.0);
        assert_eq!(similarity("  Étienne ", "Etienne"), 1.0);
        assert_eq!(similarity("Saint-Denis", "SaintDenis"), 1.0);
        assert_eq!(similarity("Mercury", "Mercury (planet)"), 1.0);
    }

    #[test]
    fn test_initials() {
        assert_eq!(similarity("J. Smith", "John Smith"), 1.0);
        assert!(similarity("Jo Smith", "John Smith") < 1.0);
    }

    #[test]
    fn test_empty_side_is_zero() {
        assert_eq!(similarity("", "Paris"), 0.0);
        assert_eq!(similarity("Paris", "(disambiguation)"), 0.0);
    }

    #[test]
    fn test_partial_match() {
        let s = similarity("Pari", "Paris");
        assert!((s - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_max_similarity() {
        let labels = ["Lutetia", "Paris", "City of Light"];
        assert_eq!(max_similarity("paris", &labels), 1.0);
        assert_eq!(max_similarity::<&str>("paris", &[]), 0.0);
    }
}
