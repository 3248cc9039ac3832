//! Weight and price estimation.
//!
//! The printed part is modelled as a wall shell plus partially filled
//! interior:
//!
//! ```text
//! wall_volume   = wall_count * nozzle_diameter * surface_area
//! infill_volume = (volume - wall_volume) * infill_percent / 100
//! weight        = amount * density * (wall_volume + infill_volume) / 1000
//! price         = price_per_kg / 1000 * weight
//! ```
//!
//! When the shell alone is at least as large as the part, the part prints
//! solid and infill is ignored: `weight = amount * density * volume / 1000`.
//!
//! Volumes are in mm³ and density in g/cm³, so `/ 1000` converts to grams;
//! the price is per kilogram, so `/ 1000` converts it to per gram.

use mesh_measure::{format_fixed, MeshMetrics};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PrintParams;

/// mm³ per cm³, and grams per kilogram.
const PER_THOUSAND: f64 = 1000.0;

/// Result of an estimate. All values keep full precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Estimate {
    /// Volume of the wall shell in mm³, per copy.
    pub wall_volume: f64,
    /// Volume of infill in mm³, per copy. Zero when printed solid.
    pub infill_volume: f64,
    /// Material volume actually printed in mm³, per copy.
    pub printed_volume: f64,
    /// Total weight of all copies in grams.
    pub weight: f64,
    /// Total price of all copies.
    pub price: f64,
    /// Whether the walls filled the whole part, so it prints solid.
    pub solid_fallback: bool,
}

impl Estimate {
    /// Two-decimal display strings for weight and price.
    #[must_use]
    pub fn formatted(&self) -> FormattedEstimate {
        FormattedEstimate {
            weight: format_fixed(self.weight),
            price: format_fixed(self.price),
        }
    }
}

/// Display strings for an estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormattedEstimate {
    /// Weight in grams, two decimals.
    pub weight: String,
    /// Price, two decimals.
    pub price: String,
}

/// Estimate printed weight and price of a part.
///
/// Pure: the same inputs always give the same result.
///
/// # Example
///
/// ```
/// use print_estimate::{estimate, PrintParams};
///
/// // 10 mm cube with the defaults: 2 walls of 0.4 mm, 15 % PLA infill
/// let est = estimate(1000.0, 600.0, &PrintParams::default());
///
/// assert!((est.wall_volume - 480.0).abs() < 1e-9);
/// assert!((est.infill_volume - 78.0).abs() < 1e-9);
/// assert_eq!(est.formatted().weight, "0.69");
/// assert_eq!(est.formatted().price, "0.01");
/// ```
#[must_use]
pub fn estimate(volume: f64, surface_area: f64, params: &PrintParams) -> Estimate {
    let wall_volume = params.shell_thickness() * surface_area;
    let copies = f64::from(params.amount);

    let (infill_volume, printed_volume, solid_fallback) = if wall_volume >= volume {
        (0.0, volume, true)
    } else {
        let infill = (volume - wall_volume) * params.infill_percent / 100.0;
        (infill, wall_volume + infill, false)
    };

    let weight = copies * params.density * printed_volume / PER_THOUSAND;
    let price = params.price_per_kg / PER_THOUSAND * weight;

    if solid_fallback {
        debug!(
            wall_volume,
            volume, "Wall shell fills the part; estimating as solid"
        );
    }

    Estimate {
        wall_volume,
        infill_volume,
        printed_volume,
        weight,
        price,
        solid_fallback,
    }
}

/// Estimate from measured metrics.
#[must_use]
pub fn estimate_for(metrics: &MeshMetrics, params: &PrintParams) -> Estimate {
    estimate(metrics.volume, metrics.surface_area, params)
}
