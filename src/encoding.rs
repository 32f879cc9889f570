//! Byte encodings for the CSV export.

use std::fmt;

use clap::ValueEnum;
use encoding_rs::{EncoderResult, Encoding, ISO_8859_15, WINDOWS_1252};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding of the written CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputEncoding {
    /// UTF-8 with a byte-order mark, so spreadsheet programs detect it.
    #[default]
    #[value(name = "utf-8-sig", alias = "utf-8-bom")]
    Utf8Bom,
    #[value(name = "utf-8")]
    Utf8,
    /// ISO-8859-15 (Latin-9).
    #[value(name = "iso-8859-15")]
    Latin9,
    #[value(name = "windows-1252")]
    Windows1252,
}

impl OutputEncoding {
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8Bom => "utf-8-sig",
            Self::Utf8 => "utf-8",
            Self::Latin9 => "iso-8859-15",
            Self::Windows1252 => "windows-1252",
        }
    }

    /// Encodes `text`, failing with the first character the encoding has
    /// no byte for.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, char> {
        match self {
            Self::Utf8Bom => {
                let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
                out.extend_from_slice(UTF8_BOM);
                out.extend_from_slice(text.as_bytes());
                Ok(out)
            }
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin9 => encode_legacy(ISO_8859_15, text),
            Self::Windows1252 => encode_legacy(WINDOWS_1252, text),
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn encode_legacy(encoding: &'static Encoding, text: &str) -> Result<Vec<u8>, char> {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4096];
    let mut read_total = 0;
    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(&text[read_total..], &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        read_total += read;
        match result {
            EncoderResult::InputEmpty => return Ok(out),
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(c) => return Err(c),
        }
    }
}
