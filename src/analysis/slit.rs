use crate::config::ExperimentParameters;
use crate::error::{Error, Result};

/// Fraunhofer single-slit relation: dark fringes are `λ·d / a` apart on the
/// screen, so `a = d·λ / spacing`. The result is in the parameters' unit.
pub fn slit_width(params: &ExperimentParameters, spacing: f64) -> Result<f64> {
    params.validate()?;
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(Error::InvalidParameter {
            name: "mean_spacing",
            value: spacing,
        });
    }
    Ok(params.screen_distance * params.wavelength / spacing)
}
