//! Plain-text extraction from a MediaWiki XML dump.
//!
//! Dumps are read as a stream of lines so that multi-gigabyte archives never
//! have to fit in memory. Only main-namespace articles that are not
//! redirects make it into the output, one article per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

use anyhow::Context;
use bzip2::read::MultiBzDecoder;
use html_escape::decode_html_entities;
use indicatif::{ProgressBar, ProgressStyle};
use language_utils::arabic;
use language_utils::text_cleanup::is_arabic_diacritic;
use regex::Regex;

/// Articles with fewer tokens than this are stubs and get skipped.
pub const ARTICLE_MIN_TOKENS: usize = 50;
pub const TOKEN_MIN_LEN: usize = 2;
pub const TOKEN_MAX_LEN: usize = 15;

static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<title>([^<]*)</title>").unwrap());
static NAMESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<ns>(-?\d+)</ns>").unwrap());

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static REF_SELF_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<ref[^>]*/>").unwrap());
static REF_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<ref[^>]*>.*?</ref>").unwrap());
static FILE_OR_CATEGORY_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[\[(?:ملف|صورة|تصنيف|ميديا|file|image|category|media):[^\[\]]*(?:\[\[[^\[\]]*\]\][^\[\]]*)*\]\]",
    )
    .unwrap()
});
static INTERLANGUAGE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[a-z][a-z\-]{1,11}:[^\]]*\]\]").unwrap());
static INTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(?:[^\]|]*\|)?([^\]]*)\]\]").unwrap());
static EXTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?:https?|ftp)://[^\s\]]+\s*([^\]]*)\]").unwrap());
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:https?|ftp)://\S+").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static FORMATTING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'{2,}|={2,}").unwrap());

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub title: String,
    pub namespace: i64,
    pub is_redirect: bool,
    pub text: String,
}

impl Page {
    pub fn is_article(&self) -> bool {
        self.namespace == 0 && !self.is_redirect
    }
}

/// Iterator over the `<page>` elements of a dump.
pub struct PageReader<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> PageReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for PageReader<R> {
    type Item = io::Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut page: Option<Page> = None;
        let mut in_text = false;

        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };

            let Some(current) = page.as_mut() else {
                if line.trim_start().starts_with("<page>") {
                    page = Some(Page::default());
                }
                continue;
            };

            if in_text {
                if let Some((body, _)) = line.split_once("</text>") {
                    current.text.push_str(body);
                    in_text = false;
                } else {
                    current.text.push_str(&line);
                    current.text.push('\n');
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.starts_with("</page>") {
                return page.map(Ok);
            } else if let Some(caps) = TITLE.captures(trimmed) {
                current.title = decode_html_entities(&caps[1]).into_owned();
            } else if let Some(caps) = NAMESPACE.captures(trimmed) {
                current.namespace = caps[1].parse().unwrap_or(0);
            } else if trimmed.starts_with("<redirect") {
                current.is_redirect = true;
            } else if let Some(rest) = trimmed.strip_prefix("<text") {
                let Some(tag_end) = rest.find('>') else {
                    continue;
                };
                if rest[..tag_end].ends_with('/') {
                    continue;
                }
                let body = &rest[tag_end + 1..];
                if let Some((body, _)) = body.split_once("</text>") {
                    current.text.push_str(body);
                } else {
                    current.text.push_str(body);
                    current.text.push('\n');
                    in_text = true;
                }
            }
        }

        // A page cut off by the end of the input is dropped
        None
    }
}

/// Remove balanced `open ... close` spans, including nested ones.
fn remove_nested(text: &str, open: &str, close: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut rest = text;

    while !rest.is_empty() {
        if rest.starts_with(open) {
            depth += 1;
            rest = &rest[open.len()..];
        } else if depth > 0 && rest.starts_with(close) {
            depth -= 1;
            rest = &rest[close.len()..];
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                if depth == 0 {
                    result.push(c);
                }
            }
            rest = chars.as_str();
        }
    }

    result
}

/// Turn wikitext into plain prose.
pub fn strip_markup(wikitext: &str) -> String {
    let text = decode_html_entities(wikitext);
    let text = COMMENT.replace_all(&text, "");
    let text = REF_SELF_CLOSING.replace_all(&text, "");
    let text = REF_BLOCK.replace_all(&text, "");
    let text = remove_nested(&text, "{{", "}}");
    let text = remove_nested(&text, "{|", "|}");
    let text = FILE_OR_CATEGORY_LINK.replace_all(&text, "");
    let text = INTERLANGUAGE_LINK.replace_all(&text, "");
    let text = INTERNAL_LINK.replace_all(&text, "$1");
    let text = EXTERNAL_LINK.replace_all(&text, "$1");
    let text = BARE_URL.replace_all(&text, " ");
    let text = HTML_TAG.replace_all(&text, " ");
    FORMATTING.replace_all(&text, " ").into_owned()
}

/// Lowercased word tokens of an article, digits and very short or very
/// long tokens excluded.
pub fn article_tokens(plain_text: &str) -> Vec<String> {
    arabic::tokenize(plain_text)
        .filter(|token| {
            token.chars().all(|c| c.is_alphabetic() || is_arabic_diacritic(c))
        })
        .filter(|token| {
            let len = token.chars().count();
            (TOKEN_MIN_LEN..=TOKEN_MAX_LEN).contains(&len)
        })
        .map(str::to_lowercase)
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub pages: u64,
    pub articles: u64,
}

/// Write one line of tokens per kept article to `output`.
pub fn extract_articles<R: BufRead, W: Write>(
    reader: R,
    mut output: W,
    progress: &ProgressBar,
) -> anyhow::Result<ExtractStats> {
    let mut stats = ExtractStats::default();

    for page in PageReader::new(reader) {
        let page = page.context("Failed to read page from dump")?;
        stats.pages += 1;
        progress.inc(1);

        if !page.is_article() {
            continue;
        }

        let tokens = article_tokens(&strip_markup(&page.text));
        if tokens.len() < ARTICLE_MIN_TOKENS {
            log::trace!("Skipping short article '{}'", page.title);
            continue;
        }

        writeln!(output, "{}", tokens.join(" "))?;
        stats.articles += 1;
        if stats.articles % 10_000 == 0 {
            log::info!("Processed {} articles...", stats.articles);
            progress.set_message(format!("{} articles", stats.articles));
        }
    }

    output.flush()?;
    Ok(stats)
}

/// Extract a bzip2-compressed dump at `dump_path` into `output_path`.
pub fn extract_dump(dump_path: &Path, output_path: &Path) -> anyhow::Result<ExtractStats> {
    log::info!("Processing Wikipedia dump: {}", dump_path.display());
    let start = Instant::now();

    let dump = File::open(dump_path)
        .with_context(|| format!("Failed to open dump {}", dump_path.display()))?;
    let reader = BufReader::new(MultiBzDecoder::new(BufReader::new(dump)));
    let output = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} pages ({per_sec}) {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let stats = extract_articles(reader, BufWriter::new(output), &pb)?;
    pb.finish();

    println!(
        "Done: {} articles kept out of {} pages in {:.2}s",
        stats.articles,
        stats.pages,
        start.elapsed().as_secs_f64()
    );
    println!("Plain text saved to {}", output_path.display());
    Ok(stats)
}
