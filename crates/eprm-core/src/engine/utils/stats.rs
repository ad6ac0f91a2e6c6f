use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Cannot summarize an empty sample population")]
    EmptySample,
    #[error("Percentile fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),
}

pub fn mean(samples: &[f64]) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (divides by n, not n − 1).
pub fn population_std_dev(samples: &[f64]) -> Result<f64, StatsError> {
    let mean = mean(samples)?;
    let variance = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>()
        / samples.len() as f64;
    Ok(variance.sqrt())
}

/// Empirical percentile with linear interpolation between order statistics.
///
/// `sorted_samples` must be sorted ascending; `fraction` is in [0, 1]
/// (0.025 for the 2.5th percentile).
pub fn percentile(sorted_samples: &[f64], fraction: f64) -> Result<f64, StatsError> {
    if sorted_samples.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if !(0.0..=1.0).contains(&fraction) {
        return Err(StatsError::InvalidFraction(fraction));
    }

    let rank = fraction * (sorted_samples.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Ok(sorted_samples[lower]);
    }

    let weight = rank - lower as f64;
    Ok(sorted_samples[lower] * (1.0 - weight) + sorted_samples[upper] * weight)
}
