pub mod arabic;
pub mod text_cleanup;

#[derive(
    Clone,
    Copy,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    parse_display::Display,
    parse_display::FromStr,
)]
pub enum Language {
    #[display("ara")]
    Arabic,
    #[display("eng")]
    English,
    #[display("zho")]
    Chinese,
}

impl Language {
    pub fn iso_639_3(&self) -> &'static str {
        match self {
            Language::Arabic => "ara",
            Language::English => "eng",
            Language::Chinese => "zho",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Arabic => "Arabic",
            Language::English => "English",
            Language::Chinese => "Chinese",
        }
    }
}

/// A word and how many times it occurred in the corpus.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrequencyEntry {
    pub word: String,
    pub count: u64,
}

/// One row of the vocabulary database CSV.
///
/// Column names are the on-disk header; translations start out empty and
/// are filled in by hand.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VocabRecord {
    pub id: u64,
    pub arabic_word: String,
    /// Unparsable frequencies read back as `None`.
    #[serde(
        deserialize_with = "csv::invalid_option",
        serialize_with = "serialize_frequency"
    )]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub english_translation: String,
    #[serde(default)]
    pub chinese_translation: String,
    #[serde(default = "VocabRecord::default_status")]
    pub status: String,
}

impl VocabRecord {
    pub const HEADER: [&'static str; 6] = [
        "id",
        "arabic_word",
        "frequency",
        "english_translation",
        "chinese_translation",
        "status",
    ];

    pub fn new(id: u64, entry: FrequencyEntry) -> Self {
        Self {
            id,
            arabic_word: entry.word,
            frequency: Some(entry.count as f64),
            english_translation: String::new(),
            chinese_translation: String::new(),
            status: Self::default_status(),
        }
    }

    fn default_status() -> String {
        "new".to_string()
    }

    /// The stored translation into `language`, if one has been filled in.
    pub fn translation(&self, language: Language) -> Option<&str> {
        let translation = match language {
            Language::English => &self.english_translation,
            Language::Chinese => &self.chinese_translation,
            Language::Arabic => return None,
        };
        let translation = translation.trim();
        (!translation.is_empty()).then_some(translation)
    }
}

/// Whole counts are written without a trailing `.0`.
fn serialize_frequency<S: serde::Serializer>(
    frequency: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match frequency {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => serializer.serialize_some(&(*f as i64)),
        Some(f) => serializer.serialize_some(f),
        None => serializer.serialize_none(),
    }
}

/// One row of a learner's exam word list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExamRecord {
    pub arabic_word: String,
    #[serde(default)]
    pub translation: Option<String>,
}
