#![forbid(unsafe_code)]
//! # Mastodon hashtag CLI
//!
//! Command-line front end of the `mastodon_hashtags` crate: reads a Mastodon
//! archive (a single outbox JSON file or a directory of JSON files), prints
//! the most used hashtags and exports the full ranking as CSV.
//!
//! ## Example
//! ```bash
//! cargo run --release -- archive/outbox.json --top 50
//! cargo run --release -- archive/ --encoding windows-1252 --delimiter ";"
//! ```
//!
//! See `--help` for all available options.

use clap::Parser;
use log::error;
use mastodon_hashtags::{
    AnalysisOptions, FileOutcome, OutputEncoding, Result, analyze_files, discover_json_files,
    print_top, rank, write_csv,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Mastodon archive: an outbox JSON file or a directory containing JSON files
    archive: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "mastodon_hashtags.csv")]
    output: PathBuf,

    /// Number of top hashtags to print
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Text encoding of the CSV file (utf-8-sig adds a BOM for spreadsheet programs)
    #[arg(long, value_enum, default_value_t = OutputEncoding::Utf8Bom)]
    encoding: OutputEncoding,

    /// CSV delimiter, a single ASCII character (e.g. ";" for German spreadsheets, "tab")
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Also read JSON files in sub-directories of the archive directory
    #[arg(short, long, default_value_t = false)]
    recursive: bool,

    /// Count hashtags case-insensitively (folds them to lowercase)
    #[arg(long, default_value_t = false)]
    lowercase: bool,
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    if s == "tab" || s == "\\t" {
        return Ok(b'\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\n' | '\r') => Ok(c as u8),
        (Some(_), None) => Err(format!("'{s}' cannot be used as CSV delimiter")),
        _ => Err(format!("delimiter must be a single character, got '{s}'")),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = AnalysisOptions {
        recursive: cli.recursive,
        lowercase: cli.lowercase,
    };

    println!("Reading archive: {}", cli.archive.display());
    let files = discover_json_files(&cli.archive, options.recursive)?;
    println!("JSON files found: {}", files.len());

    let analysis = analyze_files(&files, &options, |outcome| {
        let name = outcome
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.path().display().to_string());
        match outcome {
            FileOutcome::Parsed {
                posts_with_hashtags,
                ..
            } => println!("   Processing {name}... ✓ ({posts_with_hashtags} posts with hashtags)"),
            FileOutcome::Failed { error, .. } => {
                println!("   Processing {name}... ⚠ skipped: {error}")
            }
        }
    })?;

    let counts = &analysis.counts;
    println!();
    println!(
        "Files processed: {}/{}",
        analysis.parsed_files(),
        analysis.files.len()
    );
    println!("Posts with hashtags: {}", counts.posts_with_hashtags());
    println!("Distinct hashtags: {}", counts.distinct());
    if counts.is_empty() {
        println!("\n⚠ No hashtags found.");
    }

    let ranked = rank(counts);
    println!();
    print_top(&ranked, cli.top);

    println!("\nExporting to: {}", cli.output.display());
    println!(
        "   Encoding: {}, delimiter: '{}'",
        cli.encoding,
        (cli.delimiter as char).escape_default()
    );
    write_csv(&ranked, &cli.output, cli.encoding, cli.delimiter)?;
    println!("✓ Export complete");

    println!("\nStatistics:");
    println!("   Distinct hashtags: {}", counts.distinct());
    println!("   Total hashtag uses: {}", counts.total_uses());
    Ok(())
}
