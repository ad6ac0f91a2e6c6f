use super::traits::{PropertyError, PropertyProvider};
use crate::core::models::properties::SequenceProperties;
use crate::core::models::record::SequenceRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct PropertyRow {
    id: String,
    molecular_weight_kda: f64,
    instability_index: f64,
    gravy: f64,
    isoelectric_point: f64,
}

/// Property table produced by an external sequence-analysis tool.
///
/// CSV with a header row
/// `id,molecular_weight_kda,instability_index,gravy,isoelectric_point`.
/// Lookups match a record's id (first header token) first, then its full
/// header. Duplicate ids keep the last occurrence.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    entries: HashMap<String, SequenceProperties>,
}

impl PropertyTable {
    pub fn from_reader(reader: impl Read) -> Result<Self, PropertyError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = HashMap::new();

        for row in csv_reader.deserialize() {
            let row: PropertyRow = row?;
            let properties = SequenceProperties {
                molecular_weight_kda: row.molecular_weight_kda,
                instability_index: row.instability_index,
                gravy: row.gravy,
                isoelectric_point: row.isoelectric_point,
            };
            validate_row(&row.id, &properties)?;

            if entries.insert(row.id.clone(), properties).is_some() {
                warn!(
                    id = %row.id,
                    "Duplicate property table entry; keeping the last occurrence."
                );
            }
        }

        debug!(entries = entries.len(), "Property table loaded.");
        Ok(Self { entries })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PropertyError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn get(&self, id: &str) -> Option<&SequenceProperties> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_row(id: &str, properties: &SequenceProperties) -> Result<(), PropertyError> {
    let fields = [
        ("molecular_weight_kda", properties.molecular_weight_kda),
        ("instability_index", properties.instability_index),
        ("gravy", properties.gravy),
        ("isoelectric_point", properties.isoelectric_point),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(PropertyError::MalformedRow {
                id: id.to_string(),
                message: format!("{name} is not a finite number: {value}"),
            });
        }
    }
    Ok(())
}

impl PropertyProvider for PropertyTable {
    fn properties_for(&self, record: &SequenceRecord) -> Result<SequenceProperties, PropertyError> {
        self.entries
            .get(record.id())
            .or_else(|| self.entries.get(record.header()))
            .copied()
            .ok_or_else(|| PropertyError::NotFound {
                id: record.id().to_string(),
            })
    }
}
