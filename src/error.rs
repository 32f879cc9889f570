use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors of a run. `FileRead` and `FileParse` only cost the affected file
/// when other archive files can still be read.
#[derive(Debug, Error)]
pub enum HashtagError {
    /// Bad input path or option value; raised before any file is read.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// One archive file could not be opened.
    #[error("Could not read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One archive file is not valid JSON or has an unexpected shape.
    /// Like `FileRead`, recovered per file when a directory is processed.
    #[error("Could not parse {}: {source}", .path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("None of the {0} JSON file(s) could be parsed")]
    AllFilesFailed(usize),

    #[error(
        "Hashtag \"{hashtag}\" contains '{character}', which {encoding} cannot represent; \
         try another --encoding (e.g. utf-8-sig)"
    )]
    Encoding {
        encoding: &'static str,
        character: char,
        hashtag: String,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HashtagError>;
