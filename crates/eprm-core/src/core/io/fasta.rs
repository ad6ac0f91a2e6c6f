use crate::core::models::record::{STANDARD_AMINO_ACIDS, SequenceError, SequenceRecord};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Bytes inspected when sniffing whether a file holds sequence data.
const SNIFF_WINDOW_BYTES: u64 = 1024;
/// Minimum number of residue characters for content to count as a sequence.
const MIN_SEQUENCE_CHARS: usize = 10;
/// A line is a sequence line when more than this fraction of it is residues.
const LINE_RESIDUE_RATIO: f64 = 0.8;
/// Content is FASTA-like when more than this fraction of it is residues.
const CONTENT_RESIDUE_RATIO: f64 = 0.5;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// An entry that could not be turned into a valid [`SequenceRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub header: String,
    pub reason: SequenceError,
}

/// Outcome of reading one FASTA source: the valid records plus every entry
/// that failed sequence validation, with its reason.
#[derive(Debug, Default)]
pub struct FastaContents {
    pub records: Vec<SequenceRecord>,
    pub skipped: Vec<SkippedEntry>,
}

pub struct FastaFile;

impl FastaFile {
    pub fn read_from(reader: &mut impl BufRead) -> Result<FastaContents, FastaError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(Self::parse(&content))
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<FastaContents, FastaError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Splits on `>` and treats the first line of each chunk as the header.
    /// A headerless file therefore yields one entry whose header is its first
    /// line; invalid entries are collected, never dropped silently.
    fn parse(content: &str) -> FastaContents {
        let mut contents = FastaContents::default();

        for entry in content.split('>') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let mut lines = entry.lines();
            let header = lines.next().unwrap_or("").trim();
            let header = if header.is_empty() { "Unknown" } else { header };
            let body: String = lines.collect();

            match SequenceRecord::new(header, &body) {
                Ok(record) => contents.records.push(record),
                Err(reason) => contents.skipped.push(SkippedEntry {
                    header: header.to_string(),
                    reason,
                }),
            }
        }

        contents
    }
}

/// Content-based check for FASTA-like text.
///
/// Accepts content with a `>` header, or with enough residue characters to be
/// a bare sequence; in both cases residues must dominate the non-whitespace
/// content.
pub fn looks_like_fasta(content: &str) -> bool {
    let mut has_header = false;
    let mut has_sequence = false;
    let mut residue_chars = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            has_header = true;
            continue;
        }

        let compact: String = line.split_whitespace().collect::<String>().to_uppercase();
        if compact.is_empty() {
            continue;
        }
        let valid = compact
            .chars()
            .filter(|c| STANDARD_AMINO_ACIDS.contains(*c))
            .count();
        if valid as f64 / compact.len() as f64 > LINE_RESIDUE_RATIO {
            has_sequence = true;
            residue_chars += valid;
        }
    }

    let total_chars = content.chars().filter(|c| !c.is_whitespace()).count();
    if total_chars == 0 {
        return false;
    }

    (has_header || has_sequence)
        && residue_chars >= MIN_SEQUENCE_CHARS
        && residue_chars as f64 / total_chars as f64 > CONTENT_RESIDUE_RATIO
}

/// Sniffs the head of a file for FASTA-like content.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let file = File::open(path)?;
    let mut head = Vec::new();
    file.take(SNIFF_WINDOW_BYTES).read_to_end(&mut head)?;
    Ok(looks_like_fasta(&String::from_utf8_lossy(&head)))
}
