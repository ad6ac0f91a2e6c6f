use crate::core::models::properties::SequenceProperties;
use crate::core::models::record::SequenceRecord;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("No properties found for record '{id}'")]
    NotFound { id: String },

    #[error("Malformed property table row for '{id}': {message}")]
    MalformedRow { id: String, message: String },

    #[error("Failed to read property table: {source}")]
    Table {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Property extraction failed for '{id}': {message}")]
    Extraction { id: String, message: String },
}

/// Boundary to the external sequence-analysis capability.
///
/// Implementors supply the physicochemical scalars (molecular weight,
/// instability index, GRAVY, isoelectric point) for a record. The recovery
/// engine never computes these itself; failures at this boundary are reported
/// here and nowhere else.
pub trait PropertyProvider {
    fn properties_for(&self, record: &SequenceRecord) -> Result<SequenceProperties, PropertyError>;
}
