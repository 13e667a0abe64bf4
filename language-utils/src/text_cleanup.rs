//! Answer normalization for grading
//!
//! Answers typed by the user and reference translations from the word list
//! rarely match byte for byte. These helpers bring both sides to a common
//! form before they are compared.

use crate::Language;

/// Normalize text for grading purposes
///
/// This function performs language-specific normalization:
/// - Replaces various Unicode quote and hyphen variants with standard ASCII equivalents
/// - For English: expands contractions (e.g., "it's" → "it is")
/// - For Arabic: removes diacritics and tatweel and unifies alef/yeh/teh marbuta forms
/// - Converts to lowercase
/// - Removes punctuation (except apostrophes and hyphens) and normalizes whitespace
pub fn normalize_for_grading(text: &str, language: Language) -> String {
    let normalized_chars = text
        .chars()
        .map(|c| match c {
            // Single quote variants: ' (U+2018), ' (U+2019), ‚ (U+201A), ‛ (U+201B),
            // ′ (U+2032), ＇ (U+FF07), ʼ (U+02BC), `, ´ (U+00B4)
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{FF07}'
            | '\u{02BC}' | '`' | '\u{00B4}' => '\'',

            // Double quote variants: " (U+201C), " (U+201D), „ (U+201E), ＂ (U+FF02),
            // « (U+00AB), » (U+00BB)
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{FF02}' | '\u{00AB}' | '\u{00BB}' => '"',

            // Hyphen/dash variants: ‐ (U+2010), ‑ (U+2011), – (U+2013), — (U+2014),
            // − (U+2212), － (U+FF0D)
            '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' | '\u{2212}' | '\u{FF0D}' => '-',

            // Arabic comma, semicolon and question mark
            '\u{060C}' => ',',
            '\u{061B}' => ';',
            '\u{061F}' => '?',

            _ => c,
        })
        .collect::<String>();

    let mut result = normalized_chars.to_lowercase();

    match language {
        Language::English => result = expand_english_contractions(&result),
        Language::Arabic => result = normalize_arabic_letters(&result),
        Language::Chinese => {}
    }

    result
        .chars()
        .map(|c| {
            if c.is_ascii_punctuation() && c != '\'' && c != '-' {
                ' '
            } else {
                c
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Arabic short vowels, shadda, sukun and superscript alef.
pub fn is_arabic_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

const TATWEEL: char = '\u{0640}';

/// Strip diacritics and tatweel, and fold letter variants that learners
/// commonly type interchangeably.
fn normalize_arabic_letters(text: &str) -> String {
    text.chars()
        .filter(|&c| !is_arabic_diacritic(c) && c != TATWEEL)
        .map(|c| match c {
            // أ إ آ ٱ -> ا
            '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}' => '\u{0627}',
            // ى -> ي
            '\u{0649}' => '\u{064A}',
            // ة -> ه
            '\u{0629}' => '\u{0647}',
            _ => c,
        })
        .collect()
}

/// Expand English contractions to their full forms
fn expand_english_contractions(text: &str) -> String {
    let contractions = [
        ("won't", "will not"),
        ("can't", "cannot"),
        ("i'm", "i am"),
        ("you're", "you are"),
        ("we're", "we are"),
        ("they're", "they are"),
        ("it's", "it is"),
        ("that's", "that is"),
        ("what's", "what is"),
        ("there's", "there is"),
        ("he's", "he is"),
        ("she's", "she is"),
        ("i've", "i have"),
        ("i'd", "i would"),
        ("i'll", "i will"),
        ("don't", "do not"),
        ("doesn't", "does not"),
        ("didn't", "did not"),
        ("isn't", "is not"),
        ("aren't", "are not"),
        ("wasn't", "was not"),
    ];

    let mut result = text.to_string();
    for (contraction, expansion) in &contractions {
        result = result.replace(contraction, expansion);
    }
    result
}

/// Split a reference translation into the answers it accepts.
///
/// Word lists often carry several glosses in one cell ("book / volume",
/// "to write; to record"). Each one counts as a valid answer.
pub fn answer_alternatives(reference: &str) -> Vec<&str> {
    reference
        .split(['/', ',', ';', '\u{060C}', '\u{061B}'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether `answer` matches one of the glosses in `reference` after
/// normalization, ignoring a leading "to", "the" or "a" on either side.
///
/// Near misses are not accepted here: "later" is one letter away from
/// "water" and still wrong. Those go to the model or the learner.
pub fn matches_reference(answer: &str, reference: &str, language: Language) -> bool {
    let answer = normalize_for_grading(answer, language);
    if answer.is_empty() {
        return false;
    }

    answer_alternatives(reference).into_iter().any(|alternative| {
        let alternative = normalize_for_grading(alternative, language);
        alternative == answer || strip_article(&alternative) == strip_article(&answer)
    })
}

fn strip_article(text: &str) -> &str {
    ["to ", "the ", "a "]
        .iter()
        .find_map(|article| text.strip_prefix(article))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_for_grading_english_contractions() {
        assert_eq!(
            normalize_for_grading("It's a test", Language::English),
            "it is a test"
        );
        assert_eq!(
            normalize_for_grading("I\u{2019}m happy", Language::English),
            "i am happy"
        );
    }

    #[test]
    fn test_normalize_for_grading_punctuation() {
        assert_eq!(
            normalize_for_grading("  Hello,   world! ", Language::English),
            "hello world"
        );
        assert_eq!(
            normalize_for_grading("well-known", Language::English),
            "well-known"
        );
    }

    #[test]
    fn test_normalize_for_grading_arabic() {
        // كِتَابٌ with harakat, and a tatweel-stretched form
        assert_eq!(normalize_for_grading("كِتَابٌ", Language::Arabic), "كتاب");
        assert_eq!(normalize_for_grading("كتـــاب", Language::Arabic), "كتاب");
        assert_eq!(normalize_for_grading("أحمد", Language::Arabic), "احمد");
        assert_eq!(normalize_for_grading("مدرسة", Language::Arabic), "مدرسه");
    }

    #[test]
    fn test_answer_alternatives() {
        assert_eq!(
            answer_alternatives("book / volume; tome,"),
            vec!["book", "volume", "tome"]
        );
        assert!(answer_alternatives("  ").is_empty());
    }

    #[test]
    fn test_matches_reference() {
        assert!(matches_reference("Book", "book / volume", Language::English));
        assert!(matches_reference("volume", "book / volume", Language::English));
        assert!(matches_reference("write", "to write", Language::English));
        assert!(matches_reference("the book", "book", Language::English));
        assert!(!matches_reference("pen", "book", Language::English));
        assert!(!matches_reference("", "book", Language::English));
    }

    #[test]
    fn test_matches_reference_rejects_lookalike_words() {
        assert!(!matches_reference("later", "water", Language::English));
        assert!(!matches_reference("house", "horse", Language::English));
        assert!(!matches_reference("wrote", "to write", Language::English));
        assert!(!matches_reference("break", "bread / loaf", Language::English));
        assert!(!matches_reference("schoul", "school", Language::English));
    }
}
