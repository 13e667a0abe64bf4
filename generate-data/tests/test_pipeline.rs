use std::fs::File;
use std::io::Write;

use bzip2::Compression;
use bzip2::write::BzEncoder;
use generate_data::{frequencies, wiki_dump};
use language_utils::VocabRecord;

fn article(words: &str, repeat: usize) -> String {
    std::iter::repeat_n(words, repeat)
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_dump_to_vocabulary_database() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = dir.path().join("arwiki.xml.bz2");
    let text_path = dir.path().join("wiki_arabic_text.txt");
    let database_path = dir.path().join("voc_database.csv");

    let first = article("الكتاب على الطاولة والقلم [[مكتب|بجانبه]]", 15);
    let second = article("{{قالب|مدينة}} المدينة كبيرة الكتاب قديم", 15);
    let xml = format!(
        "<mediawiki>\n\
         <page>\n<title>أ</title>\n<ns>0</ns>\n<revision>\n<text xml:space=\"preserve\">{first}\n</text>\n</revision>\n</page>\n\
         <page>\n<title>ب</title>\n<ns>0</ns>\n<revision>\n<text xml:space=\"preserve\">{second}</text>\n</revision>\n</page>\n\
         <page>\n<title>ج</title>\n<ns>0</ns>\n<redirect title=\"أ\" />\n<revision>\n<text xml:space=\"preserve\">{first}</text>\n</revision>\n</page>\n\
         </mediawiki>\n"
    );

    let mut encoder = BzEncoder::new(File::create(&dump_path).unwrap(), Compression::fast());
    encoder.write_all(xml.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let stats = wiki_dump::extract_dump(&dump_path, &text_path).unwrap();
    assert_eq!(stats.pages, 3);
    assert_eq!(stats.articles, 2);

    let text = std::fs::read_to_string(&text_path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(!text.contains("مكتب"));
    assert!(text.contains("بجانبه"));
    assert!(!text.contains("قالب"));

    let entries = frequencies::compute_frequencies_file(&text_path).unwrap();
    assert_eq!(entries[0].word, "الكتاب");
    assert_eq!(entries[0].count, 30);

    frequencies::write_vocab_database_file(&entries, 3, &database_path).unwrap();

    let content = std::fs::read_to_string(&database_path).unwrap();
    let content = content.strip_prefix('\u{FEFF}').unwrap();
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let records: Vec<VocabRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[0].arabic_word, "الكتاب");
    assert_eq!(records[0].frequency, Some(30.0));
    assert!(records.iter().all(|r| r.status == "new"));
}
