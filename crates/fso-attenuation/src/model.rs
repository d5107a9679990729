//! Versioned implementations of ITU-R P.1814 and the dispatcher over them.
//!
//! Each revision of the recommendation is a separate type; the
//! [`Recommendation`] enum selects one and forwards every formula to it.
//! New revisions are added as new variants without touching call sites.

use std::f64::consts::PI;

use crate::tables;
use crate::{AttenuationError, Result};

/// ITU-R P.1814-1 (09/2025), the current revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P1814Version1;

impl P1814Version1 {
    pub const VERSION: u8 = 1;
    pub const YEAR: u16 = 2025;
    pub const MONTH: u8 = 9;
    pub const REFERENCE: &'static str = "https://www.itu.int/rec/R-REC-P.1814-1-202509-I/en";

    /// Link margin (dB): power left above receiver sensitivity after all
    /// budget terms. A plain budget summation, no validation.
    pub fn link_margin(
        &self,
        emitter_power_dbm: f64,
        receiver_sensitivity_dbm: f64,
        geometrical_db: f64,
        atmospheric_db: f64,
        scintillation_db: f64,
        system_db: f64,
    ) -> f64 {
        emitter_power_dbm
            - receiver_sensitivity_dbm
            - geometrical_db
            - atmospheric_db
            - scintillation_db
            - system_db
    }

    /// Geometrical (beam-spreading) attenuation in dB.
    ///
    /// The receiver is a circular aperture of diameter `capture_diameter_m`;
    /// the transmit beam footprint at range is a disc whose diameter is the
    /// distance-divergence product (km · mrad, numerically a length by the
    /// recommendation's unit convention). Zero when the aperture captures
    /// the whole beam.
    pub fn geometrical_attenuation(
        &self,
        capture_diameter_m: f64,
        distance_km: f64,
        divergence_mrad: f64,
    ) -> Result<f64> {
        if capture_diameter_m <= 0.0 {
            return Err(AttenuationError::InvalidInput(format!(
                "capture diameter must be greater than zero, got {capture_diameter_m}"
            )));
        }

        let capture_area = (PI / 4.0) * capture_diameter_m.powi(2);
        let beam_area = (PI / 4.0) * (distance_km * divergence_mrad).powi(2);

        if capture_area >= beam_area {
            return Ok(0.0);
        }
        Ok(10.0 * (beam_area / capture_area).log10())
    }

    /// Specific atmospheric attenuation (extinction coefficient) in dB/km:
    /// the clear-air term plus the excess term (aerosol, fog, rain, ...).
    pub fn specific_atmospheric_attenuation(
        &self,
        gamma_clear_air_db_km: f64,
        gamma_excess_db_km: f64,
    ) -> f64 {
        gamma_clear_air_db_km + gamma_excess_db_km
    }

    /// Specific attenuation due to suspended particles (dB/km) from
    /// visibility (km, 2% threshold) and wavelength (μm, 0.4–1.55).
    pub fn specific_attenuation_due_to_suspended_particles(
        &self,
        visibility_km: f64,
        wavelength_um: f64,
    ) -> Result<f64> {
        if !(0.4..=1.55).contains(&wavelength_um) {
            return Err(AttenuationError::InvalidInput(format!(
                "wavelength must be between 0.4 um and 1.55 um, got {wavelength_um}"
            )));
        }

        // Size-distribution coefficient q, piecewise in visibility.
        let q = if visibility_km > 50.0 {
            1.6
        } else if visibility_km > 6.0 {
            1.3
        } else if visibility_km >= 1.0 {
            0.16 * visibility_km + 0.34
        } else if visibility_km >= 0.5 {
            visibility_km - 0.5
        } else {
            0.0
        };

        Ok(17.0 * visibility_km * (0.55 / wavelength_um).powf(q))
    }

    /// Specific attenuation due to rain (dB/km): γ_rain = k · R^α with
    /// (k, α) selected by the DSD shape parameter μ.
    pub fn specific_attenuation_due_to_rain(&self, rain_rate: f64, mu: i32) -> Result<f64> {
        let row = tables::power_law_coefficients(mu)?;
        if rain_rate < 0.0 {
            return Err(AttenuationError::InvalidInput(format!(
                "rain rate must be non-negative, got {rain_rate}"
            )));
        }
        Ok(row.k * rain_rate.powf(row.alpha))
    }

    /// Path attenuation due to rain (dB) over a link of `path_length_km`.
    ///
    /// The specific attenuation is reduced by the path-averaging factor
    /// F = 1 / (1 + L·(R − 6.2)/2623), then a saturation correction
    /// G = a(R)·L^b(R) is subtracted. R ≤ 0 and a non-positive corrected
    /// value both yield exactly 0 dB; the clamp is part of the
    /// recommendation, not a numerical guard.
    pub fn path_attenuation_due_to_rain(
        &self,
        rain_rate: f64,
        mu: i32,
        path_length_km: f64,
    ) -> Result<f64> {
        let gamma_rain = self.specific_attenuation_due_to_rain(rain_rate, mu)?;
        let row = tables::path_correction_coefficients(mu)?;

        if rain_rate <= 0.0 {
            return Ok(0.0);
        }

        let reduction = 1.0 / (1.0 + path_length_km * (rain_rate - 6.2) / 2623.0);
        let nominal = gamma_rain * path_length_km * reduction;

        let ln_r = rain_rate.ln();
        let a = row.p0 + row.p1 * ln_r + row.p2 * ln_r.powi(2);
        let b = row.k0 + row.k1 * ln_r + row.k2 * ln_r.powi(2);
        let correction = a * path_length_km.powf(b);

        let attenuation = nominal - correction;
        if attenuation <= 0.0 {
            return Ok(0.0);
        }
        Ok(attenuation)
    }
}

/// Dispatcher over the implemented revisions of ITU-R P.1814.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    V1(P1814Version1),
}

impl Recommendation {
    pub const LATEST_VERSION: u8 = P1814Version1::VERSION;

    /// Construct the requested revision, or fail with
    /// `InvalidConfiguration` for anything not implemented.
    pub fn new(version: u8) -> Result<Self> {
        match version {
            1 => Ok(Recommendation::V1(P1814Version1)),
            other => Err(AttenuationError::InvalidConfiguration(format!(
                "version {other} is not implemented for the ITU-R P.1814 model"
            ))),
        }
    }

    pub fn latest() -> Self {
        Recommendation::V1(P1814Version1)
    }

    pub fn version(&self) -> u8 {
        match self {
            Recommendation::V1(_) => P1814Version1::VERSION,
        }
    }

    /// Publication (year, month) of the active revision.
    pub fn published(&self) -> (u16, u8) {
        match self {
            Recommendation::V1(_) => (P1814Version1::YEAR, P1814Version1::MONTH),
        }
    }

    /// Reference URL of the active revision.
    pub fn reference(&self) -> &'static str {
        match self {
            Recommendation::V1(_) => P1814Version1::REFERENCE,
        }
    }

    pub fn link_margin(
        &self,
        emitter_power_dbm: f64,
        receiver_sensitivity_dbm: f64,
        geometrical_db: f64,
        atmospheric_db: f64,
        scintillation_db: f64,
        system_db: f64,
    ) -> f64 {
        match self {
            Recommendation::V1(model) => model.link_margin(
                emitter_power_dbm,
                receiver_sensitivity_dbm,
                geometrical_db,
                atmospheric_db,
                scintillation_db,
                system_db,
            ),
        }
    }

    pub fn geometrical_attenuation(
        &self,
        capture_diameter_m: f64,
        distance_km: f64,
        divergence_mrad: f64,
    ) -> Result<f64> {
        match self {
            Recommendation::V1(model) => {
                model.geometrical_attenuation(capture_diameter_m, distance_km, divergence_mrad)
            }
        }
    }

    pub fn specific_atmospheric_attenuation(
        &self,
        gamma_clear_air_db_km: f64,
        gamma_excess_db_km: f64,
    ) -> f64 {
        match self {
            Recommendation::V1(model) => {
                model.specific_atmospheric_attenuation(gamma_clear_air_db_km, gamma_excess_db_km)
            }
        }
    }

    pub fn specific_attenuation_due_to_suspended_particles(
        &self,
        visibility_km: f64,
        wavelength_um: f64,
    ) -> Result<f64> {
        match self {
            Recommendation::V1(model) => {
                model.specific_attenuation_due_to_suspended_particles(visibility_km, wavelength_um)
            }
        }
    }

    pub fn specific_attenuation_due_to_rain(&self, rain_rate: f64, mu: i32) -> Result<f64> {
        match self {
            Recommendation::V1(model) => model.specific_attenuation_due_to_rain(rain_rate, mu),
        }
    }

    pub fn path_attenuation_due_to_rain(
        &self,
        rain_rate: f64,
        mu: i32,
        path_length_km: f64,
    ) -> Result<f64> {
        match self {
            Recommendation::V1(model) => {
                model.path_attenuation_due_to_rain(rain_rate, mu, path_length_km)
            }
        }
    }
}

impl Default for Recommendation {
    fn default() -> Self {
        Recommendation::latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-4;

    fn model() -> P1814Version1 {
        P1814Version1
    }

    #[test]
    fn test_specific_rain_reference_values() {
        // Reference values of the power-law fit at places=4.
        let cases = [
            (10.0, -2, 5.8031),
            (20.0, -1, 8.2855),
            (30.0, 0, 11.5365),
            (40.0, 1, 15.3904),
            (50.0, 2, 19.7294),
        ];
        for (rate, mu, expected) in cases {
            let gamma = model().specific_attenuation_due_to_rain(rate, mu).unwrap();
            assert!(
                (gamma - expected).abs() < TOL,
                "R={rate} mu={mu}: got {gamma}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_specific_rain_matches_table_directly() {
        for row in &tables::SPECIFIC_RAIN_TABLE {
            let gamma = model().specific_attenuation_due_to_rain(12.5, row.mu).unwrap();
            assert_eq!(gamma, row.k * 12.5f64.powf(row.alpha));
        }
    }

    #[test]
    fn test_specific_rain_zero_rate() {
        for mu in -2..=2 {
            let gamma = model().specific_attenuation_due_to_rain(0.0, mu).unwrap();
            assert_eq!(gamma, 0.0, "mu={mu}");
        }
    }

    #[test]
    fn test_specific_rain_invalid_shape() {
        for mu in [-3, 3] {
            let err = model().specific_attenuation_due_to_rain(10.0, mu).unwrap_err();
            assert!(matches!(err, AttenuationError::InvalidParameter(_)), "mu={mu}");
        }
    }

    #[test]
    fn test_specific_rain_negative_rate() {
        let err = model().specific_attenuation_due_to_rain(-5.0, 0).unwrap_err();
        assert!(matches!(err, AttenuationError::InvalidInput(_)));
    }

    #[test]
    fn test_geometrical_attenuation_capture_exceeds_beam() {
        // 3 m aperture against a 1 m beam footprint.
        let a = model().geometrical_attenuation(3.0, 1.0, 1.0).unwrap();
        assert_eq!(a, 0.0);
        // Equal areas are also lossless.
        let a = model().geometrical_attenuation(2.0, 1.0, 1.0).unwrap();
        assert_eq!(a, 0.0);
    }

    #[test]
    fn test_geometrical_attenuation_beam_exceeds_capture() {
        let a = model().geometrical_attenuation(0.1, 10.0, 10.0).unwrap();
        let expected = 10.0
            * (((PI / 4.0) * (10.0f64 * 10.0).powi(2)) / ((PI / 4.0) * 0.1f64.powi(2))).log10();
        assert!((a - expected).abs() < 1e-12, "a={a} expected={expected}");
        // (100 m beam)^2 / (0.1 m aperture)^2 is a 60 dB spread.
        assert!((a - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometrical_attenuation_monotonic_in_range_and_divergence() {
        let base = model().geometrical_attenuation(0.2, 5.0, 1.0).unwrap();
        let farther = model().geometrical_attenuation(0.2, 10.0, 1.0).unwrap();
        let wider = model().geometrical_attenuation(0.2, 5.0, 2.0).unwrap();
        assert!(farther > base, "farther={farther} base={base}");
        assert!(wider > base, "wider={wider} base={base}");
    }

    #[test]
    fn test_geometrical_attenuation_rejects_nonpositive_aperture() {
        for d in [0.0, -0.5] {
            let err = model().geometrical_attenuation(d, 1.0, 1.0).unwrap_err();
            assert!(matches!(err, AttenuationError::InvalidInput(_)), "d={d}");
        }
    }

    #[test]
    fn test_path_rain_zero_rate_is_zero() {
        let a = model().path_attenuation_due_to_rain(0.0, 0, 15.0).unwrap();
        assert_eq!(a, 0.0);
    }

    #[test]
    fn test_path_rain_matches_closed_form() {
        let (rate, mu, length) = (25.0, 0, 10.0);
        let gamma = model().specific_attenuation_due_to_rain(rate, mu).unwrap();
        let row = tables::path_correction_coefficients(mu).unwrap();
        let f = 1.0 / (1.0 + length * (rate - 6.2) / 2623.0);
        let ln_r = rate.ln();
        let a_ms = row.p0 + row.p1 * ln_r + row.p2 * ln_r * ln_r;
        let b_ms = row.k0 + row.k1 * ln_r + row.k2 * ln_r * ln_r;
        let expected = gamma * length * f - a_ms * length.powf(b_ms);

        let a = model().path_attenuation_due_to_rain(rate, mu, length).unwrap();
        assert!((a - expected).abs() < 1e-12, "a={a} expected={expected}");
        assert!(a > 0.0);
    }

    #[test]
    fn test_path_rain_monotonic_in_rate() {
        // Below the saturation regime the path attenuation grows with rain rate.
        let mut last = 0.0;
        for rate in [1.0, 5.0, 10.0, 20.0, 40.0] {
            let a = model().path_attenuation_due_to_rain(rate, 0, 10.0).unwrap();
            assert!(a >= last, "rate={rate}: {a} < {last}");
            last = a;
        }
    }

    #[test]
    fn test_path_rain_clamped_to_zero() {
        // A drizzle over a short path drives the corrected value negative;
        // the result is clamped to exactly 0, never reported negative.
        let a = model().path_attenuation_due_to_rain(0.01, 0, 0.001).unwrap();
        assert_eq!(a, 0.0);
    }

    #[test]
    fn test_path_rain_validation_mirrors_specific() {
        assert!(model().path_attenuation_due_to_rain(10.0, 5, 10.0).is_err());
        assert!(model().path_attenuation_due_to_rain(-1.0, 0, 10.0).is_err());
    }

    #[test]
    fn test_atmospheric_attenuation_is_sum() {
        let gamma = model().specific_atmospheric_attenuation(0.43, 2.17);
        assert!((gamma - 2.6).abs() < 1e-12);
    }

    #[test]
    fn test_suspended_particles_wavelength_bounds() {
        assert!(model()
            .specific_attenuation_due_to_suspended_particles(10.0, 0.3)
            .is_err());
        assert!(model()
            .specific_attenuation_due_to_suspended_particles(10.0, 2.0)
            .is_err());
        assert!(model()
            .specific_attenuation_due_to_suspended_particles(10.0, 1.55)
            .is_ok());
    }

    #[test]
    fn test_suspended_particles_q_branches() {
        let m = model();
        // V > 50 km: q = 1.6.
        let g = m.specific_attenuation_due_to_suspended_particles(60.0, 0.55).unwrap();
        assert!((g - 17.0 * 60.0).abs() < 1e-9, "g={g}");
        // 1 <= V <= 6: q = 0.16 V + 0.34.
        let g = m.specific_attenuation_due_to_suspended_particles(2.0, 1.55).unwrap();
        let q = 0.16 * 2.0 + 0.34;
        assert!((g - 17.0 * 2.0 * (0.55f64 / 1.55).powf(q)).abs() < 1e-9);
        // V < 0.5: q = 0, wavelength drops out.
        let g = m.specific_attenuation_due_to_suspended_particles(0.2, 0.85).unwrap();
        assert!((g - 17.0 * 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_link_margin_budget() {
        let m = model().link_margin(10.0, -30.0, 6.0, 9.0, 2.0, 3.0);
        assert!((m - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_dispatcher_versions() {
        let rec = Recommendation::new(1).unwrap();
        assert_eq!(rec.version(), 1);
        assert_eq!(rec.published(), (2025, 9));
        assert!(rec.reference().contains("P.1814-1"));

        let err = Recommendation::new(2).unwrap_err();
        assert!(matches!(err, AttenuationError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_dispatcher_forwards_formulas() {
        let rec = Recommendation::default();
        assert_eq!(rec.version(), Recommendation::LATEST_VERSION);
        let direct = model().specific_attenuation_due_to_rain(10.0, -2).unwrap();
        let via_rec = rec.specific_attenuation_due_to_rain(10.0, -2).unwrap();
        assert_eq!(direct, via_rec);
    }
}
