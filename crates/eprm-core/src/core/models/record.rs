use serde::Serialize;
use thiserror::Error;

/// The twenty standard amino acid one-letter codes.
pub const STANDARD_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

const MIN_SEQUENCE_LENGTH: usize = 2;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    Empty,
    #[error("Sequence is too short ({length} residues); at least 2 are required")]
    TooShort { length: usize },
    #[error("Sequence contains non-standard amino acid characters: {found}")]
    NonStandardResidues { found: String },
}

/// One named amino-acid sequence, as parsed from a FASTA entry.
///
/// The sequence is stored uppercase with all whitespace removed and is
/// guaranteed to contain only standard amino acid codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceRecord {
    header: String,
    sequence: String,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, raw_sequence: &str) -> Result<Self, SequenceError> {
        let sequence: String = raw_sequence
            .split_whitespace()
            .collect::<String>()
            .to_uppercase();

        if sequence.is_empty() {
            return Err(SequenceError::Empty);
        }

        let mut invalid: Vec<char> = sequence
            .chars()
            .filter(|c| !STANDARD_AMINO_ACIDS.contains(*c))
            .collect();
        if !invalid.is_empty() {
            invalid.sort_unstable();
            invalid.dedup();
            return Err(SequenceError::NonStandardResidues {
                found: invalid.into_iter().collect(),
            });
        }

        if sequence.len() < MIN_SEQUENCE_LENGTH {
            return Err(SequenceError::TooShort {
                length: sequence.len(),
            });
        }

        Ok(Self {
            header: header.into(),
            sequence,
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn residue_count(&self) -> usize {
        self.sequence.len()
    }

    /// The first whitespace-delimited token of the header, the conventional
    /// record identifier in FASTA headers.
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or(&self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_standard_sequence_and_normalizes_case() {
        let record = SequenceRecord::new("sp|P12345 test", "mktay iakqr").unwrap();
        assert_eq!(record.sequence(), "MKTAYIAKQR");
        assert_eq!(record.residue_count(), 10);
        assert_eq!(record.id(), "sp|P12345");
        assert_eq!(record.header(), "sp|P12345 test");
    }

    #[test]
    fn rejects_an_empty_sequence() {
        let result = SequenceRecord::new("empty", "  \n\t ");
        assert_eq!(result.unwrap_err(), SequenceError::Empty);
    }

    #[test]
    fn rejects_a_single_residue_sequence() {
        let result = SequenceRecord::new("short", "M");
        assert_eq!(result.unwrap_err(), SequenceError::TooShort { length: 1 });
    }

    #[test]
    fn rejects_non_standard_residues_and_reports_them_sorted() {
        let result = SequenceRecord::new("bad", "MKXB1TAY");
        assert_eq!(
            result.unwrap_err(),
            SequenceError::NonStandardResidues {
                found: "1BX".to_string()
            }
        );
    }

    #[test]
    fn id_falls_back_to_full_header_without_whitespace() {
        let record = SequenceRecord::new("lysozyme", "MKTAY").unwrap();
        assert_eq!(record.id(), "lysozyme");
    }
}
