//! Builds the quiz word set from the vocabulary database and an exam list.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, bail};
use language_utils::text_cleanup::normalize_for_grading;
use language_utils::{ExamRecord, Language, VocabRecord};
use quiz_scheduler::QuizEntity;

fn clean_word(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Words are joined ignoring harakat, tatweel and alef/yeh/teh marbuta
/// spelling variants.
fn join_key(word: &str) -> String {
    normalize_for_grading(word, Language::Arabic)
}

/// Spreadsheet exports often start with a byte order mark, which would
/// otherwise end up glued to the first header name.
fn csv_reader(mut content: String) -> csv::Reader<Cursor<String>> {
    if content.starts_with('\u{FEFF}') {
        content.drain(..'\u{FEFF}'.len_utf8());
    }
    csv::Reader::from_reader(Cursor::new(content))
}

fn open_csv(path: &Path) -> anyhow::Result<csv::Reader<Cursor<String>>> {
    if !path.exists() {
        bail!(
            "Could not find file {}. Make sure it exists.",
            path.display()
        );
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(csv_reader(content))
}

/// Vocabulary database keyed by normalized word. The first row for a word
/// wins.
pub fn load_vocab_database(path: &Path) -> anyhow::Result<HashMap<String, VocabRecord>> {
    let mut reader = open_csv(path)?;
    let mut records = HashMap::new();

    for (row, record) in reader.deserialize::<VocabRecord>().enumerate() {
        let mut record =
            record.with_context(|| format!("Bad row {} in {}", row + 2, path.display()))?;
        let word = clean_word(&record.arabic_word).to_string();
        if word.is_empty() {
            continue;
        }
        let key = join_key(&word);
        record.arabic_word = word;
        records.entry(key).or_insert(record);
    }

    log::info!(
        "Loaded {} words from vocabulary database {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

pub fn load_exam_list(path: &Path) -> anyhow::Result<Vec<ExamRecord>> {
    let mut reader = open_csv(path)?;
    let mut records = Vec::new();

    for (row, record) in reader.deserialize::<ExamRecord>().enumerate() {
        let record = record.with_context(|| format!("Bad row {} in {}", row + 2, path.display()))?;
        records.push(record);
    }

    Ok(records)
}

/// Join the exam list onto the vocabulary database.
///
/// Every exam word becomes one quiz entity. Its frequency comes from the
/// database, or 1 if the database does not know the word. Its answer is the
/// exam list's translation, falling back to the database's translation
/// into `language`.
pub fn merge(
    exam_list: Vec<ExamRecord>,
    database: &HashMap<String, VocabRecord>,
    language: Language,
) -> anyhow::Result<Vec<QuizEntity>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut entities = Vec::new();

    for (row, exam) in exam_list.into_iter().enumerate() {
        let word = clean_word(&exam.arabic_word);
        if word.is_empty() {
            continue;
        }
        let key = join_key(word);
        if let Some(first_row) = seen.insert(key.clone(), row) {
            bail!(
                "Duplicate word '{word}' in exam list (rows {} and {})",
                first_row + 2,
                row + 2
            );
        }

        let vocab = database.get(&key);
        let translation = exam
            .translation
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| vocab.and_then(|v| v.translation(language)));
        let Some(translation) = translation else {
            bail!(
                "No translation for '{word}': add one to the exam list or the {} column of the vocabulary database",
                language.name()
            );
        };

        let frequency = vocab.and_then(|v| v.frequency).unwrap_or(1.0);
        if vocab.is_none() {
            log::debug!("'{word}' is not in the vocabulary database, using frequency 1");
        }

        let entity = QuizEntity::new(word, translation).with_base_frequency(frequency);
        entities.push(entity);
    }

    if entities.is_empty() {
        bail!("The exam list contains no words");
    }
    Ok(entities)
}

pub fn load_quiz_dataset(
    database_path: &Path,
    exam_list_path: &Path,
    language: Language,
) -> anyhow::Result<Vec<QuizEntity>> {
    let database = load_vocab_database(database_path)?;
    let exam_list = load_exam_list(exam_list_path)?;
    let entities = merge(exam_list, &database, language)?;
    println!("Word list initialised with {} words!", entities.len());
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database() -> HashMap<String, VocabRecord> {
        let data = "\u{FEFF}id,arabic_word,frequency,english_translation,chinese_translation,status\n\
                    1,كتاب,532,book,書,new\n\
                    2,قلم,,pen,,new\n\
                    3,باب,77,,門,new\n";
        let mut reader = csv_reader(data.to_string());
        reader
            .deserialize::<VocabRecord>()
            .map(|r| {
                let r = r.unwrap();
                (join_key(&r.arabic_word), r)
            })
            .collect()
    }

    fn exam(word: &str, translation: Option<&str>) -> ExamRecord {
        ExamRecord {
            arabic_word: word.to_string(),
            translation: translation.map(str::to_string),
        }
    }

    #[test]
    fn test_merge_joins_frequencies() {
        let entities = merge(
            vec![
                exam("كتاب", Some("book")),
                exam(" قلم ", Some("pen")),
                exam("شمس", Some("sun")),
            ],
            &database(),
            Language::English,
        )
        .unwrap();

        assert_eq!(
            entities,
            vec![
                QuizEntity::new("كتاب", "book").with_base_frequency(532.0),
                QuizEntity::new("قلم", "pen").with_base_frequency(1.0),
                QuizEntity::new("شمس", "sun").with_base_frequency(1.0),
            ]
        );
    }

    #[test]
    fn test_merge_falls_back_to_database_translation() {
        let entities = merge(
            vec![exam("باب", None), exam("كتاب", Some("  "))],
            &database(),
            Language::Chinese,
        )
        .unwrap();
        assert_eq!(entities[0].reference_answer, "門");
        assert_eq!(entities[1].reference_answer, "書");
    }

    #[test]
    fn test_merge_ignores_harakat_and_letter_variants() {
        let mut database = database();
        let record = VocabRecord {
            id: 4,
            arabic_word: "مدرسة".to_string(),
            frequency: Some(640.0),
            english_translation: "school".to_string(),
            chinese_translation: String::new(),
            status: "new".to_string(),
        };
        database.insert(join_key(&record.arabic_word), record);

        let entities = merge(
            vec![exam("كِتَابٌ", None), exam("مدرسه", None)],
            &database,
            Language::English,
        )
        .unwrap();
        assert_eq!(
            entities,
            vec![
                QuizEntity::new("كِتَابٌ", "book").with_base_frequency(532.0),
                QuizEntity::new("مدرسه", "school").with_base_frequency(640.0),
            ]
        );
    }

    #[test]
    fn test_merge_requires_translation() {
        let err = merge(vec![exam("باب", None)], &database(), Language::English).unwrap_err();
        assert!(err.to_string().contains("No translation for 'باب'"));
    }

    #[test]
    fn test_merge_rejects_duplicates() {
        let err = merge(
            vec![
                exam("كتاب", Some("book")),
                exam("قلم", Some("pen")),
                exam("كتـاب ", Some("volume")),
            ],
            &database(),
            Language::English,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate word 'كتـاب' in exam list (rows 2 and 4)"
        );
    }

    #[test]
    fn test_merge_rejects_empty_list() {
        let blank_word = vec![exam("  ", Some("x"))];
        assert!(merge(blank_word, &database(), Language::English).is_err());
        assert!(merge(Vec::new(), &database(), Language::English).is_err());
    }
}
