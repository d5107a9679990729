//! Regression coefficient tables of ITU-R P.1814-1.
//!
//! Both tables are keyed by the drop-size-distribution shape parameter
//! μ ∈ {-2, -1, 0, 1, 2}. The decimal constants reproduce the published
//! fits verbatim; they are compiled in and never mutated.

use crate::{AttenuationError, Result};

/// Valid range of the DSD shape parameter μ.
pub const DSD_SHAPE_MIN: i32 = -2;
pub const DSD_SHAPE_MAX: i32 = 2;

/// One row of the power-law fit γ_rain = k · R^α.
#[derive(Debug, Clone, Copy)]
pub struct PowerLawRow {
    pub mu: i32,
    pub k: f64,
    pub alpha: f64,
}

/// Power-law coefficients (k, α) for the specific rain attenuation.
pub const SPECIFIC_RAIN_TABLE: [PowerLawRow; 5] = [
    PowerLawRow { mu: -2, k: 2.2838, alpha: 0.4050 },
    PowerLawRow { mu: -1, k: 1.5921, alpha: 0.5506 },
    PowerLawRow { mu: 0, k: 1.2924, alpha: 0.6436 },
    PowerLawRow { mu: 1, k: 1.1394, alpha: 0.7057 },
    PowerLawRow { mu: 2, k: 1.0505, alpha: 0.7497 },
];

/// One row of the log-polynomial saturation correction
/// a(R) = p0 + p1·ln R + p2·ln²R, b(R) = k0 + k1·ln R + k2·ln²R.
#[derive(Debug, Clone, Copy)]
pub struct PathCorrectionRow {
    pub mu: i32,
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
    pub k0: f64,
    pub k1: f64,
    pub k2: f64,
}

/// Correction coefficients for the path rain attenuation.
pub const PATH_CORRECTION_TABLE: [PathCorrectionRow; 5] = [
    PathCorrectionRow { mu: -2, p0: 0.010012, p1: 0.025381, p2: -0.001606, k0: 0.250329, k1: -0.035278, k2: 0.008349 },
    PathCorrectionRow { mu: -1, p0: 0.014551, p1: 0.010932, p2: 0.001532, k0: 0.279336, k1: 0.023974, k2: 0.004421 },
    PathCorrectionRow { mu: 0, p0: 0.015940, p1: -0.001476, p2: 0.008297, k0: 0.117663, k1: 0.029602, k2: 0.002142 },
    PathCorrectionRow { mu: 1, p0: 0.023468, p1: 0.002897, p2: 0.008912, k0: 0.090689, k1: 0.034955, k2: 0.004583 },
    PathCorrectionRow { mu: 2, p0: -0.000316, p1: 0.062233, p2: -0.007835, k0: 0.192092, k1: -0.081869, k2: 0.033669 },
];

fn invalid_shape(mu: i32) -> AttenuationError {
    AttenuationError::InvalidParameter(format!(
        "DSD shape parameter (mu) must be an integer between {DSD_SHAPE_MIN} and {DSD_SHAPE_MAX}, got {mu}"
    ))
}

/// Look up the (k, α) power-law row for a shape parameter.
pub fn power_law_coefficients(mu: i32) -> Result<&'static PowerLawRow> {
    SPECIFIC_RAIN_TABLE
        .iter()
        .find(|row| row.mu == mu)
        .ok_or_else(|| invalid_shape(mu))
}

/// Look up the saturation-correction row for a shape parameter.
pub fn path_correction_coefficients(mu: i32) -> Result<&'static PathCorrectionRow> {
    PATH_CORRECTION_TABLE
        .iter()
        .find(|row| row.mu == mu)
        .ok_or_else(|| invalid_shape(mu))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_law_rows_cover_all_shapes() {
        for mu in DSD_SHAPE_MIN..=DSD_SHAPE_MAX {
            let row = power_law_coefficients(mu).unwrap();
            assert_eq!(row.mu, mu);
            assert!(row.k > 0.0 && row.alpha > 0.0);
        }
    }

    #[test]
    fn test_path_correction_rows_cover_all_shapes() {
        for mu in DSD_SHAPE_MIN..=DSD_SHAPE_MAX {
            let row = path_correction_coefficients(mu).unwrap();
            assert_eq!(row.mu, mu);
        }
    }

    #[test]
    fn test_out_of_range_shape_rejected() {
        for mu in [-3, 3, 10, i32::MIN] {
            assert!(power_law_coefficients(mu).is_err(), "mu={mu}");
            assert!(path_correction_coefficients(mu).is_err(), "mu={mu}");
        }
    }

    #[test]
    fn test_known_coefficients() {
        let row = power_law_coefficients(0).unwrap();
        assert_eq!(row.k, 1.2924);
        assert_eq!(row.alpha, 0.6436);

        let row = path_correction_coefficients(2).unwrap();
        assert_eq!(row.p0, -0.000316);
        assert_eq!(row.k2, 0.033669);
    }
}
