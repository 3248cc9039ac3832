//! Filament material presets.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Common FDM filament materials.
///
/// Each preset carries a typical density in g/cm³. [`Material::Custom`] is
/// a placeholder for user-supplied densities and defaults to 1.00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Material {
    /// Polylactic acid.
    #[default]
    Pla,
    /// Polyethylene terephthalate glycol.
    Petg,
    /// Acrylonitrile butadiene styrene.
    Abs,
    /// Acrylonitrile styrene acrylate.
    Asa,
    /// Thermoplastic polyurethane.
    Tpu,
    /// Polyamide.
    Nylon,
    /// Polycarbonate.
    Polycarbonate,
    /// User-defined density.
    Custom,
}

impl Material {
    /// All materials, presets first.
    pub const ALL: [Self; 8] = [
        Self::Pla,
        Self::Petg,
        Self::Abs,
        Self::Asa,
        Self::Tpu,
        Self::Nylon,
        Self::Polycarbonate,
        Self::Custom,
    ];

    /// Typical density in g/cm³.
    #[must_use]
    pub const fn density(&self) -> f64 {
        match self {
            Self::Pla => 1.24,
            Self::Petg => 1.27,
            Self::Abs => 1.04,
            Self::Asa => 1.05,
            Self::Tpu => 1.21,
            Self::Nylon => 1.52,
            Self::Polycarbonate => 1.30,
            Self::Custom => 1.00,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pla => "PLA",
            Self::Petg => "PETG",
            Self::Abs => "ABS",
            Self::Asa => "ASA",
            Self::Tpu => "TPU",
            Self::Nylon => "Nylon",
            Self::Polycarbonate => "Polycarbonate",
            Self::Custom => "Custom",
        }
    }

    /// The preset whose density equals `density`, or `Custom`.
    #[must_use]
    pub fn from_density(density: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| *m != Self::Custom && (m.density() - density).abs() < 1e-9)
            .unwrap_or(Self::Custom)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A material name that matches no preset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material '{0}' (expected one of PLA, PETG, ABS, ASA, TPU, Nylon, Polycarbonate, Custom)")]
pub struct UnknownMaterial(pub String);

impl FromStr for Material {
    type Err = UnknownMaterial;

    /// Parse a material name, case-insensitively. `pc` is accepted for
    /// polycarbonate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pla" => Ok(Self::Pla),
            "petg" => Ok(Self::Petg),
            "abs" => Ok(Self::Abs),
            "asa" => Ok(Self::Asa),
            "tpu" => Ok(Self::Tpu),
            "nylon" | "pa" => Ok(Self::Nylon),
            "polycarbonate" | "pc" => Ok(Self::Polycarbonate),
            "custom" => Ok(Self::Custom),
            _ => Err(UnknownMaterial(s.to_string())),
        }
    }
}
