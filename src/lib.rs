//! # Mastodon hashtag analysis
//!
//! Counts the hashtags used in a Mastodon data export and ranks them.
//!
//! The pipeline is: [`discover_json_files`] finds the archive files,
//! [`analyze_files`] streams their posts through [`extract_hashtags`] into a
//! [`HashtagCounts`] tally, and [`rank`] / [`write_csv`] turn the tally into
//! the report.
//!
//! ```no_run
//! use std::path::Path;
//! use mastodon_hashtags::{AnalysisOptions, OutputEncoding, analyze_archive, rank, write_csv};
//!
//! let analysis = analyze_archive(Path::new("archive/"), &AnalysisOptions::default())?;
//! let ranked = rank(&analysis.counts);
//! write_csv(&ranked, Path::new("hashtags.csv"), OutputEncoding::default(), b',')?;
//! # Ok::<(), mastodon_hashtags::HashtagError>(())
//! ```

use std::path::{Path, PathBuf};

use log::{debug, warn};

mod aggregate;
mod archive;
mod encoding;
mod error;
mod extract;
mod report;

pub use aggregate::{HashtagCounts, aggregate};
pub use archive::{discover_json_files, for_each_post, load_posts};
pub use encoding::OutputEncoding;
pub use error::{HashtagError, Result};
pub use extract::{HASHTAG_TYPE, extract_hashtags};
pub use report::{CSV_HEADER, encode_csv, format_top, print_top, rank, write_csv};

/// Knobs of the read/count phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    /// Also read JSON files in sub-directories of a directory archive.
    pub recursive: bool,
    /// Fold hashtags to lowercase before counting.
    pub lowercase: bool,
}

/// What happened to one archive file.
#[derive(Debug)]
pub enum FileOutcome {
    Parsed {
        path: PathBuf,
        posts: usize,
        posts_with_hashtags: usize,
    },
    Failed {
        path: PathBuf,
        error: HashtagError,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Parsed { path, .. } | FileOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, FileOutcome::Parsed { .. })
    }
}

/// Result of reading a whole archive.
#[derive(Debug)]
pub struct ArchiveAnalysis {
    pub counts: HashtagCounts,
    pub files: Vec<FileOutcome>,
}

impl ArchiveAnalysis {
    pub fn parsed_files(&self) -> usize {
        self.files.iter().filter(|f| f.is_parsed()).count()
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| !f.is_parsed())
    }
}

/// Discovers the JSON files under `path` and analyzes them.
pub fn analyze_archive(path: &Path, options: &AnalysisOptions) -> Result<ArchiveAnalysis> {
    let files = discover_json_files(path, options.recursive)?;
    analyze_files(&files, options, |_| {})
}

/// Reads `files` one after another and counts their hashtags.
///
/// A file that fails to parse is reported through `on_file` and contributes
/// nothing, not even the posts read before the error. Only when every file
/// fails is the run an error.
pub fn analyze_files<F>(
    files: &[PathBuf],
    options: &AnalysisOptions,
    mut on_file: F,
) -> Result<ArchiveAnalysis>
where
    F: FnMut(&FileOutcome),
{
    let mut counts = HashtagCounts::new();
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let mut file_counts = HashtagCounts::new();
        let read = for_each_post(path, |post| {
            let hashtags = extract_hashtags(&post);
            if options.lowercase {
                file_counts.add_hashtags(hashtags.into_iter().map(|h| h.to_lowercase()));
            } else {
                file_counts.add_hashtags(hashtags);
            }
        });

        let outcome = match read {
            Ok(posts) => {
                debug!("{}: {posts} posts", path.display());
                let posts_with_hashtags = file_counts.posts_with_hashtags();
                counts.merge(file_counts);
                FileOutcome::Parsed {
                    path: path.clone(),
                    posts,
                    posts_with_hashtags,
                }
            }
            Err(error) => {
                warn!("Skipping {}: {error}", path.display());
                FileOutcome::Failed {
                    path: path.clone(),
                    error,
                }
            }
        };
        on_file(&outcome);
        outcomes.push(outcome);
    }

    if !files.is_empty() && !outcomes.iter().any(FileOutcome::is_parsed) {
        return Err(HashtagError::AllFilesFailed(files.len()));
    }
    Ok(ArchiveAnalysis {
        counts,
        files: outcomes,
    })
}
