//! FSO Link Margin CLI
//!
//! Evaluates an ITU-R P.1814 link budget for one terrestrial FSO link:
//! geometrical attenuation from the link geometry, rain attenuation from
//! a rain-rate exceedance statistic, optional fog term from visibility,
//! and the resulting link margin.
//!
//! Usage:
//!   link-margin --distance-km 15 --divergence-mrad 0.02479 \
//!               --capture-diameter-m 0.065 --rain-rate 25 --dsd-shape 0

use anyhow::Result;
use clap::Parser;
use fso_attenuation::{self as p1814, LinkBudgetBreakdown};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "link-margin",
    about = "Compute FSO link attenuation and margin per ITU-R P.1814"
)]
struct Args {
    /// Emitter total power (dBm)
    #[arg(long, default_value_t = 10.0)]
    emitter_power_dbm: f64,

    /// Receiver sensitivity (dBm)
    #[arg(long, default_value_t = -30.0)]
    receiver_sensitivity_dbm: f64,

    /// Receiver capture surface diameter (m)
    #[arg(long, default_value_t = 0.065)]
    capture_diameter_m: f64,

    /// Emitter-receiver distance (km)
    #[arg(long, default_value_t = 15.0)]
    distance_km: f64,

    /// Beam full divergence (mrad)
    #[arg(long, default_value_t = 0.02479)]
    divergence_mrad: f64,

    /// Rain rate exceeded for the chosen time percentage (mm/h)
    #[arg(long, default_value_t = 25.0)]
    rain_rate: f64,

    /// Drop size distribution shape parameter, -2..=2
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    dsd_shape: i32,

    /// Clear-air specific attenuation (dB/km)
    #[arg(long, default_value_t = 0.1)]
    gamma_clear_air: f64,

    /// Visibility (km); adds a suspended-particle term when set
    #[arg(long)]
    visibility_km: Option<f64>,

    /// Operating wavelength (um), valid 0.4-1.55
    #[arg(long, default_value_t = 1.55)]
    wavelength_um: f64,

    /// Scintillation attenuation (dB)
    #[arg(long, default_value_t = 2.0)]
    scintillation_db: f64,

    /// System losses: misalignment, receiver optics, beam wander (dB)
    #[arg(long, default_value_t = 3.0)]
    system_loss_db: f64,

    /// Recommendation version to use
    #[arg(long, default_value_t = 1)]
    version: u8,

    /// Print the breakdown as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    p1814::change_version(args.version)?;
    debug!("using ITU-R P.1814 version {}", p1814::get_version());

    // Geometrical attenuation from the link geometry.
    let a_geo = p1814::calculate_geometrical_attenuation(
        args.capture_diameter_m,
        args.distance_km,
        args.divergence_mrad,
    )?;

    // Rain terms from the exceedance rain rate.
    let gamma_rain = p1814::specific_attenuation_due_to_rain(args.rain_rate, args.dsd_shape)?;
    let a_rain =
        p1814::path_attenuation_due_to_rain(args.rain_rate, args.dsd_shape, args.distance_km)?;

    // Fog/haze term from visibility, when provided.
    let gamma_fog = match args.visibility_km {
        Some(visibility) => Some(p1814::specific_attenuation_due_to_suspended_particles(
            visibility,
            args.wavelength_um,
        )?),
        None => None,
    };

    let gamma_excess = gamma_fog.map(|g| g.value).unwrap_or(0.0);
    let gamma_atmo = p1814::specific_atmospheric_attenuation(args.gamma_clear_air, gamma_excess)?;

    // Total atmospheric attenuation over the path: extinction applied to
    // the full length, plus the path-averaged rain attenuation.
    let a_atmo = gamma_atmo.value * args.distance_km + a_rain.value;

    let breakdown = LinkBudgetBreakdown::from_terms(
        args.emitter_power_dbm,
        args.receiver_sensitivity_dbm,
        a_geo.value,
        a_atmo,
        args.scintillation_db,
        args.system_loss_db,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    info!("{}", "=".repeat(60));
    info!("ITU-R P.1814 link budget ({} km path)", args.distance_km);
    info!("{}", "=".repeat(60));
    info!("  Geometrical attenuation        {:8.2} dB", a_geo.value);
    info!("  Specific rain attenuation      {:8.2} dB/km", gamma_rain.value);
    info!("  Path rain attenuation          {:8.2} dB", a_rain.value);
    if let Some(fog) = gamma_fog {
        info!("  Suspended-particle term        {:8.2} dB/km", fog.value);
    }
    info!("  Extinction coefficient         {:8.2} dB/km", gamma_atmo.value);
    info!("  Total atmospheric attenuation  {:8.2} dB", a_atmo);
    info!("  Scintillation                  {:8.2} dB", args.scintillation_db);
    info!("  System losses                  {:8.2} dB", args.system_loss_db);
    info!("{}", "-".repeat(60));
    info!(
        "  Link margin                    {:8.2} dB ({})",
        breakdown.link_margin_db,
        if breakdown.link_viable { "viable" } else { "not viable" }
    );

    Ok(())
}
