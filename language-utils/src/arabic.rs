//! Arabic token classification for frequency counting.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::text_cleanup::is_arabic_diacritic;

/// Function words that would otherwise crowd out the vocabulary list.
pub const STOPWORDS: &[&str] = &[
    "في", "من", "على", "إلى", "الى", "عن", "مع", "أن", "ان", "إن", "أو", "او", "ثم", "لا", "لم",
    "لن", "ما", "ماذا", "متى", "كيف", "أين", "اين", "هل", "قد", "لقد", "كان", "كانت", "يكون",
    "تكون", "كانوا", "ليس", "ليست", "هذا", "هذه", "ذلك", "تلك", "هؤلاء", "أولئك", "هنا", "هناك",
    "الذي", "التي", "الذين", "اللذان", "اللتان", "اللاتي", "اللواتي", "هو", "هي", "هم", "هن", "هما",
    "أنا", "انا", "نحن", "أنت", "انت", "أنتم", "انتم", "أنتما", "أنتن", "له", "لها", "لهم", "لهن",
    "لهما", "به", "بها", "بهم", "فيه", "فيها", "فيهم", "منه", "منها", "منهم", "عليه", "عليها",
    "عليهم", "إليه", "اليه", "إليها", "اليها", "عنه", "عنها", "معه", "معها", "بين", "بعد", "قبل",
    "حتى", "عند", "عندما", "لدى", "لدي", "حيث", "حين", "بل", "لكن", "لكنه", "لأن", "لان", "إذا",
    "اذا", "إذ", "اذ", "لو", "لولا", "كل", "كلا", "بعض", "غير", "سوى", "أي", "اي", "أيضا", "ايضا",
    "كما", "مثل", "منذ", "خلال", "ضمن", "نحو", "دون", "عبر", "حول", "تحت", "فوق", "أمام", "امام",
    "وراء", "خلف", "جدا", "فقط", "أكثر", "اكثر", "أقل", "اقل", "وقد", "وكان", "وكانت", "وهو", "وهي",
    "وفي", "ومن", "وعلى", "وإلى", "والى", "وأن", "وان", "ولا", "ولم", "وما", "وهذا", "وهذه", "وذلك",
    "التى", "الذى", "فى", "علي", "الي", "يا", "أم", "ام", "إلا", "الا", "أما", "اما", "إما", "بما",
    "مما", "عما", "كذلك", "هكذا", "لذلك", "أيضًا", "ف", "و", "ب", "ل", "ك", "س", "يمكن", "تم", "عام",
    "أحد", "احد", "إحدى", "احدى",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Whether every character of `token` is in the Arabic block (U+0600–U+06FF).
pub fn is_arabic_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Arabic punctuation that sits inside the Arabic block and must still split words.
fn is_arabic_punctuation(c: char) -> bool {
    match c {
        '\u{060C}' | '\u{060D}' | '\u{061B}' | '\u{061E}' | '\u{061F}' => true,
        '\u{066A}'..='\u{066D}' | '\u{06D4}' => true,
        _ => false,
    }
}

/// Split a line into word tokens.
///
/// Anything that is neither alphanumeric nor a combining Arabic mark ends a
/// token, so "كتاب،" and "(كتاب)" both yield "كتاب".
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| {
        is_arabic_punctuation(c) || !(c.is_alphanumeric() || is_arabic_diacritic(c))
    })
    .filter(|token| !token.is_empty())
}

/// Tokens that count towards the vocabulary frequency table.
pub fn vocabulary_tokens(line: &str) -> impl Iterator<Item = &str> {
    tokenize(line).filter(|token| is_arabic_token(token) && !is_stopword(token))
}
