use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use csv::WriterBuilder;
use log::info;

use crate::aggregate::HashtagCounts;
use crate::encoding::OutputEncoding;
use crate::error::{HashtagError, Result};

/// Header row of the CSV export.
pub const CSV_HEADER: [&str; 2] = ["Hashtag", "Anzahl"];

///Sorts the tally into `(hashtag, count)` pairs: highest count first, equal
///counts by hashtag text ascending.
/// # Example
/// ```
/// use mastodon_hashtags::{HashtagCounts, rank};
/// let mut counts = HashtagCounts::new();
/// counts.add_hashtags(vec!["b".to_string()]);
/// counts.add_hashtags(vec!["a".to_string()]);
/// counts.add_hashtags(vec!["c".to_string(), "c".to_string()]);
/// let expected = vec![("c".to_string(), 2), ("a".to_string(), 1), ("b".to_string(), 1)];
/// assert_eq!(rank(&counts), expected);
/// ```
pub fn rank(counts: &HashtagCounts) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts
        .counts()
        .iter()
        .map(|(hashtag, count)| (hashtag.clone(), *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Renders the first `n` ranked entries as a numbered table.
pub fn format_top(ranked: &[(String, u64)], n: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Top {} hashtags:", n.min(ranked.len()));
    let _ = writeln!(out, "{}", "-".repeat(50));
    for (i, (hashtag, count)) in ranked.iter().take(n).enumerate() {
        let tag = format!("#{hashtag}");
        let _ = writeln!(out, "{:2}. {:<31} {:>6}x", i + 1, tag, count);
    }
    out
}

pub fn print_top(ranked: &[(String, u64)], n: usize) {
    print!("{}", format_top(ranked, n));
}

/// Serializes the ranking as CSV in the given encoding.
pub fn encode_csv(
    ranked: &[(String, u64)],
    encoding: OutputEncoding,
    delimiter: u8,
) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for (hashtag, count) in ranked {
        writer.write_record([hashtag.as_str(), count.to_string().as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))?;

    encoding.encode(&text).map_err(|character| {
        let hashtag = ranked
            .iter()
            .find(|(hashtag, _)| hashtag.contains(character))
            .map(|(hashtag, _)| hashtag.clone())
            .unwrap_or_default();
        HashtagError::Encoding {
            encoding: encoding.name(),
            character,
            hashtag,
        }
    })
}

/// Writes the ranking to `path`. The file is only touched once the whole
/// CSV has been encoded, so a failed export leaves nothing behind.
pub fn write_csv(
    ranked: &[(String, u64)],
    path: &Path,
    encoding: OutputEncoding,
    delimiter: u8,
) -> Result<()> {
    let bytes = encode_csv(ranked, encoding, delimiter)?;
    fs::write(path, bytes).map_err(|source| HashtagError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} hashtag rows to {}", ranked.len(), path.display());
    Ok(())
}
