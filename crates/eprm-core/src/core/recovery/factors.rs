/// Maximum fractional loss through the pI/pH solubility channel.
const PI_PENALTY_CEILING: f64 = 0.15;

/// Stability factor from the instability index.
///
/// Exactly 1.0 at or below the threshold, linear decay above it. The result is
/// not floored here; only the combined protein efficiency is clamped, once,
/// downstream.
#[inline]
pub fn stability_factor(instability_index: f64, threshold: f64, penalty_factor: f64) -> f64 {
    1.0 - (instability_index - threshold).max(0.0) / penalty_factor
}

/// Surface-adsorption factor from hydropathy.
///
/// Symmetric in the sign of GRAVY; only the magnitude drives the loss.
#[inline]
pub fn adsorption_factor(gravy: f64, gravy_penalty_factor: f64) -> f64 {
    1.0 - gravy.abs() * gravy_penalty_factor
}

/// pI/pH solubility factor.
///
/// Gaussian-shaped penalty centered where the buffer pH equals the isoelectric
/// point (factor 0.85 there), decaying toward 1.0 as the two separate.
#[inline]
pub fn pi_solubility_factor(buffer_ph: f64, isoelectric_point: f64) -> f64 {
    let delta = (buffer_ph - isoelectric_point).abs();
    1.0 - PI_PENALTY_CEILING * (-(delta * delta) / 2.0).exp()
}
