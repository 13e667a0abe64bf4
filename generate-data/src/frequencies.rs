use indicatif::{ProgressBar, ProgressStyle};
use language_utils::{FrequencyEntry, VocabRecord, arabic};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;

const LOG_EVERY_LINES: u64 = 500_000;

/// Count vocabulary tokens line by line, so the corpus never has to be
/// loaded whole.
///
/// Only tokens made entirely of Arabic-block characters that are not
/// stopwords are counted.
pub fn compute_frequencies<R: BufRead>(reader: R) -> anyhow::Result<FxHashMap<String, u64>> {
    let mut frequencies: FxHashMap<String, u64> = FxHashMap::default();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} lines ({per_sec})")
            .unwrap(),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut line_count: u64 = 0;
    for line in reader.lines() {
        let line = line.context("Failed to read corpus line")?;
        for token in arabic::vocabulary_tokens(&line) {
            if let Some(count) = frequencies.get_mut(token) {
                *count += 1;
            } else {
                frequencies.insert(token.to_string(), 1);
            }
        }

        line_count += 1;
        pb.inc(1);
        if line_count % LOG_EVERY_LINES == 0 {
            log::info!("...processed {line_count} lines");
        }
    }

    pb.finish();
    log::info!(
        "Counted {} distinct words over {line_count} lines",
        frequencies.len()
    );
    Ok(frequencies)
}

/// Sort by count, most frequent first. Equal counts are ordered by word so
/// the output is stable between runs.
pub fn most_common(frequencies: FxHashMap<String, u64>) -> Vec<FrequencyEntry> {
    let mut entries: Vec<FrequencyEntry> = frequencies
        .into_iter()
        .map(|(word, count)| FrequencyEntry { word, count })
        .collect();

    entries.sort_by(|a, b| {
        Reverse(a.count)
            .cmp(&Reverse(b.count))
            .then_with(|| a.word.cmp(&b.word))
    });
    entries
}

pub fn compute_frequencies_file(path: &Path) -> anyhow::Result<Vec<FrequencyEntry>> {
    log::info!("Analyzing {} line by line", path.display());
    let start = Instant::now();

    let file =
        File::open(path).with_context(|| format!("Failed to open corpus {}", path.display()))?;
    let frequencies = compute_frequencies(BufReader::new(file))?;

    println!(
        "Word counting finished in {:.2}s",
        start.elapsed().as_secs_f64()
    );
    Ok(most_common(frequencies))
}

/// Write the `limit` most common words as a vocabulary database.
///
/// The file starts with a UTF-8 byte order mark so spreadsheet tools pick
/// the right encoding for the Arabic column.
pub fn write_vocab_database<W: Write>(
    entries: &[FrequencyEntry],
    limit: usize,
    mut writer: W,
) -> anyhow::Result<usize> {
    writer.write_all("\u{FEFF}".as_bytes())?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut written = 0;
    for (id, entry) in (1..).zip(entries.iter().take(limit)) {
        csv_writer.serialize(VocabRecord::new(id, entry.clone()))?;
        written += 1;
    }

    if written == 0 {
        csv_writer.write_record(VocabRecord::HEADER)?;
    }
    csv_writer.flush()?;
    Ok(written)
}

pub fn write_vocab_database_file(
    entries: &[FrequencyEntry],
    limit: usize,
    output_path: &Path,
) -> anyhow::Result<()> {
    println!(
        "Saving the top {limit} words to {}...",
        output_path.display()
    );
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let written = write_vocab_database(entries, limit, file)?;
    println!(
        "Saved {written} words. Vocabulary database '{}' is ready.",
        output_path.display()
    );
    Ok(())
}
