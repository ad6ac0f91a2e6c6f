use serde::{Deserialize, Serialize};

/// Physicochemical scalars for one sequence, as produced by an external
/// sequence-analysis capability.
///
/// The recovery model consumes these values as given; it never derives them
/// from the sequence itself and enforces no internal invariants on them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceProperties {
    /// Molecular weight in kilodaltons.
    pub molecular_weight_kda: f64,
    /// Instability index; values above ~40 conventionally indicate an
    /// unstable protein.
    pub instability_index: f64,
    /// Grand Average of Hydropathy; positive values are hydrophobic.
    pub gravy: f64,
    /// Isoelectric point, the pH of zero net charge.
    pub isoelectric_point: f64,
}
