//! FSO Attenuation Library
//!
//! Implements the closed-form attenuation and link-margin formulas of
//! ITU-R Recommendation P.1814 for terrestrial free-space optical links:
//! geometrical (beam-spreading) attenuation, rain-induced specific and
//! path attenuation, atmospheric extinction, suspended-particle
//! attenuation, and the overall link margin.
//!
//! The module-level functions forward to a process-wide active revision
//! of the recommendation (see [`change_version`] / [`get_version`]).
//! Callers that prefer owned state over the process-wide handle can hold
//! a [`Recommendation`] directly and call the same formulas on it.
//!
//! Canonical units for bare-number inputs: metres for the receiver
//! aperture, kilometres for link/path lengths, milliradians for beam
//! divergence, mm/h for rain rate, dB/dBm for budget terms. Tagged
//! [`Quantity`] inputs in any compatible unit are converted; incompatible
//! units are rejected, never reinterpreted.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod model;
pub mod quantity;
pub mod tables;

pub use model::{P1814Version1, Recommendation};
pub use quantity::{Dimension, Quantity, QuantityInput, Unit};

#[derive(Error, Debug)]
pub enum AttenuationError {
    /// DSD shape parameter μ outside {-2, -1, 0, 1, 2}.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Out-of-domain numeric input or incompatible unit.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Unsupported recommendation version requested.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, AttenuationError>;

/// The process-wide active revision. Single writer ([`change_version`]),
/// many readers; a failed swap leaves the previous revision active.
static ACTIVE: RwLock<Recommendation> = RwLock::new(Recommendation::V1(P1814Version1));

fn active() -> RwLockReadGuard<'static, Recommendation> {
    ACTIVE.read().unwrap_or_else(PoisonError::into_inner)
}

/// Switch the active ITU-R P.1814 revision. The new revision is fully
/// constructed before the swap, so an unsupported version fails with
/// `InvalidConfiguration` and leaves the current revision in place.
pub fn change_version(version: u8) -> Result<()> {
    let next = Recommendation::new(version)?;
    let mut guard = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
    *guard = next;
    debug!(version, "active ITU-R P.1814 revision changed");
    Ok(())
}

/// Version number of the active revision.
pub fn get_version() -> u8 {
    active().version()
}

/// Geometrical (beam-spreading) attenuation in dB.
///
/// Canonical units: `capture_diameter` in m, `distance` in km,
/// `divergence` in mrad. Fails with `InvalidInput` for a non-positive
/// aperture diameter.
pub fn calculate_geometrical_attenuation(
    capture_diameter: impl Into<QuantityInput>,
    distance: impl Into<QuantityInput>,
    divergence: impl Into<QuantityInput>,
) -> Result<Quantity> {
    let diameter_m = quantity::prepare(capture_diameter.into(), Unit::Meter, "capture_diameter")?;
    let distance_km = quantity::prepare(distance.into(), Unit::Kilometer, "distance")?;
    let divergence_mrad = quantity::prepare(divergence.into(), Unit::Milliradian, "divergence")?;

    let db = active().geometrical_attenuation(diameter_m, distance_km, divergence_mrad)?;
    Ok(Quantity::new(db, Unit::Decibel))
}

/// Specific attenuation due to rain (dB/km) for a rain rate (mm/h) and
/// DSD shape parameter μ ∈ {-2..2}.
pub fn specific_attenuation_due_to_rain(
    rain_rate: impl Into<QuantityInput>,
    mu: i32,
) -> Result<Quantity> {
    let rate = quantity::prepare(rain_rate.into(), Unit::MillimeterPerHour, "rain_rate")?;
    let db_km = active().specific_attenuation_due_to_rain(rate, mu)?;
    Ok(Quantity::new(db_km, Unit::DecibelPerKilometer))
}

/// Path attenuation due to rain (dB) over a link of `path_length`
/// (canonical unit km, must be positive by caller contract).
pub fn path_attenuation_due_to_rain(
    rain_rate: impl Into<QuantityInput>,
    mu: i32,
    path_length: impl Into<QuantityInput>,
) -> Result<Quantity> {
    let rate = quantity::prepare(rain_rate.into(), Unit::MillimeterPerHour, "rain_rate")?;
    let length_km = quantity::prepare(path_length.into(), Unit::Kilometer, "path_length")?;
    let db = active().path_attenuation_due_to_rain(rate, mu, length_km)?;
    Ok(Quantity::new(db, Unit::Decibel))
}

/// Specific atmospheric attenuation (extinction coefficient, dB/km):
/// clear-air term plus excess term.
pub fn specific_atmospheric_attenuation(
    gamma_clear_air: impl Into<QuantityInput>,
    gamma_excess: impl Into<QuantityInput>,
) -> Result<Quantity> {
    let clear =
        quantity::prepare(gamma_clear_air.into(), Unit::DecibelPerKilometer, "gamma_clear_air")?;
    let excess =
        quantity::prepare(gamma_excess.into(), Unit::DecibelPerKilometer, "gamma_excess")?;
    let db_km = active().specific_atmospheric_attenuation(clear, excess);
    Ok(Quantity::new(db_km, Unit::DecibelPerKilometer))
}

/// Specific attenuation due to suspended particles (dB/km) from
/// visibility (canonical unit km) and wavelength (canonical unit μm,
/// valid 0.4–1.55).
pub fn specific_attenuation_due_to_suspended_particles(
    visibility: impl Into<QuantityInput>,
    wavelength: impl Into<QuantityInput>,
) -> Result<Quantity> {
    let visibility_km = quantity::prepare(visibility.into(), Unit::Kilometer, "visibility")?;
    let wavelength_um = quantity::prepare(wavelength.into(), Unit::Micrometer, "wavelength")?;
    let db_km =
        active().specific_attenuation_due_to_suspended_particles(visibility_km, wavelength_um)?;
    Ok(Quantity::new(db_km, Unit::DecibelPerKilometer))
}

/// Link margin (dB): emitter power minus receiver sensitivity minus all
/// attenuation terms. A budget summation, no physical validation.
pub fn calculate_link_margin(
    emitter_power: impl Into<QuantityInput>,
    receiver_sensitivity: impl Into<QuantityInput>,
    geometrical: impl Into<QuantityInput>,
    atmospheric: impl Into<QuantityInput>,
    scintillation: impl Into<QuantityInput>,
    system: impl Into<QuantityInput>,
) -> Result<Quantity> {
    let p_e = quantity::prepare(emitter_power.into(), Unit::DecibelMilliwatt, "emitter_power")?;
    let s_r = quantity::prepare(
        receiver_sensitivity.into(),
        Unit::DecibelMilliwatt,
        "receiver_sensitivity",
    )?;
    let a_geo = quantity::prepare(geometrical.into(), Unit::Decibel, "geometrical")?;
    let a_atmo = quantity::prepare(atmospheric.into(), Unit::Decibel, "atmospheric")?;
    let a_scint = quantity::prepare(scintillation.into(), Unit::Decibel, "scintillation")?;
    let a_system = quantity::prepare(system.into(), Unit::Decibel, "system")?;

    let db = active().link_margin(p_e, s_r, a_geo, a_atmo, a_scint, a_system);
    Ok(Quantity::new(db, Unit::Decibel))
}

/// Specific rain attenuation (dB/km) for a grid of rain rates (mm/h).
///
/// Element-wise with the same semantics as the scalar call. Fail-fast:
/// the first invalid element aborts the whole call and the error names
/// its index.
pub fn specific_attenuation_due_to_rain_for_rates(
    rain_rates: &[f64],
    mu: i32,
) -> Result<Vec<f64>> {
    let rec = active();
    rain_rates
        .iter()
        .enumerate()
        .map(|(index, &rate)| {
            rec.specific_attenuation_due_to_rain(rate, mu)
                .map_err(|e| tag_element(e, index))
        })
        .collect()
}

/// Path rain attenuation (dB) for a grid of rain rates over one link
/// length (km). Fail-fast, like
/// [`specific_attenuation_due_to_rain_for_rates`].
pub fn path_attenuation_due_to_rain_for_rates(
    rain_rates: &[f64],
    mu: i32,
    path_length_km: f64,
) -> Result<Vec<f64>> {
    let rec = active();
    rain_rates
        .iter()
        .enumerate()
        .map(|(index, &rate)| {
            rec.path_attenuation_due_to_rain(rate, mu, path_length_km)
                .map_err(|e| tag_element(e, index))
        })
        .collect()
}

fn tag_element(error: AttenuationError, index: usize) -> AttenuationError {
    match error {
        AttenuationError::InvalidInput(msg) => {
            AttenuationError::InvalidInput(format!("element {index}: {msg}"))
        }
        other => other,
    }
}

/// Full budget breakdown for one link, every term in dB/dBm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkBudgetBreakdown {
    pub emitter_power_dbm: f64,
    pub receiver_sensitivity_dbm: f64,
    pub geometrical_attenuation_db: f64,
    pub atmospheric_attenuation_db: f64,
    pub scintillation_attenuation_db: f64,
    pub system_loss_db: f64,
    pub link_margin_db: f64,
    pub link_viable: bool,
}

impl LinkBudgetBreakdown {
    /// Assemble a breakdown from already-computed budget terms using the
    /// active revision's margin formula.
    pub fn from_terms(
        emitter_power_dbm: f64,
        receiver_sensitivity_dbm: f64,
        geometrical_attenuation_db: f64,
        atmospheric_attenuation_db: f64,
        scintillation_attenuation_db: f64,
        system_loss_db: f64,
    ) -> Self {
        let link_margin_db = active().link_margin(
            emitter_power_dbm,
            receiver_sensitivity_dbm,
            geometrical_attenuation_db,
            atmospheric_attenuation_db,
            scintillation_attenuation_db,
            system_loss_db,
        );
        Self {
            emitter_power_dbm,
            receiver_sensitivity_dbm,
            geometrical_attenuation_db,
            atmospheric_attenuation_db,
            scintillation_attenuation_db,
            system_loss_db,
            link_margin_db,
            link_viable: link_margin_db > 0.0,
        }
    }
}
