//! Parameter edits and the pure entry reducer.

use print_estimate::{Material, PrintParams};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entry::{recompute, JobEntry};
use crate::error::{JobError, JobResult};

/// A change to one print parameter of an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "field", content = "value", rename_all = "camelCase"))]
pub enum FieldChange {
    /// Number of copies.
    Amount(u32),
    /// Infill in percent.
    Infill(f64),
    /// Wall count.
    Walls(u32),
    /// Nozzle diameter in mm.
    NozzleDiameter(f64),
    /// Density in g/cm³.
    Density(f64),
    /// Material preset; sets the density.
    Material(Material),
    /// Price per kilogram.
    PricePerKg(f64),
}

impl FieldChange {
    /// Field names accepted by [`FieldChange::parse`].
    pub const FIELDS: [&'static str; 7] = [
        "amount",
        "infill",
        "walls",
        "nozzleDiameter",
        "density",
        "material",
        "pricePerKg",
    ];

    /// Parse a `(field, value)` pair as sent by a form or command line.
    ///
    /// Numeric values must parse and be finite. Ranges are not checked.
    ///
    /// # Errors
    ///
    /// [`JobError::UnknownField`] for a name not in [`FieldChange::FIELDS`],
    /// [`JobError::InvalidValue`] when the value does not parse.
    ///
    /// # Example
    ///
    /// ```
    /// use print_job::FieldChange;
    ///
    /// assert_eq!(FieldChange::parse("walls", "3").unwrap(), FieldChange::Walls(3));
    /// assert!(FieldChange::parse("walls", "three").is_err());
    /// assert!(FieldChange::parse("colour", "red").is_err());
    /// ```
    pub fn parse(field: &str, value: &str) -> JobResult<Self> {
        let value = value.trim();
        match field {
            "amount" => parse_count("amount", value).map(Self::Amount),
            "infill" => parse_number("infill", value).map(Self::Infill),
            "walls" => parse_count("walls", value).map(Self::Walls),
            "nozzleDiameter" => parse_number("nozzleDiameter", value).map(Self::NozzleDiameter),
            "density" => parse_number("density", value).map(Self::Density),
            "pricePerKg" => parse_number("pricePerKg", value).map(Self::PricePerKg),
            "material" => value
                .parse::<Material>()
                .map(Self::Material)
                .map_err(|e| JobError::invalid_value("material", value, e.to_string())),
            _ => Err(JobError::UnknownField {
                field: field.to_string(),
            }),
        }
    }

    /// Write the change into `params`.
    pub fn apply_to(self, params: &mut PrintParams) {
        match self {
            Self::Amount(n) => params.amount = n,
            Self::Infill(p) => params.infill_percent = p,
            Self::Walls(n) => params.wall_count = n,
            Self::NozzleDiameter(d) => params.nozzle_diameter = d,
            Self::Density(d) => params.density = d,
            Self::Material(m) => params.density = m.density(),
            Self::PricePerKg(p) => params.price_per_kg = p,
        }
    }
}

fn parse_count(field: &'static str, value: &str) -> JobResult<u32> {
    value
        .parse::<u32>()
        .map_err(|_| JobError::invalid_value(field, value, "not a whole number"))
}

fn parse_number(field: &'static str, value: &str) -> JobResult<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(JobError::invalid_value(field, value, "not a finite number")),
        Err(_) => Err(JobError::invalid_value(field, value, "not a number")),
    }
}

/// Apply a parameter change to an entry and recompute its estimate.
///
/// Only the estimate is re-run; the stored metrics are kept.
#[must_use]
pub fn apply(mut entry: JobEntry, change: FieldChange) -> JobEntry {
    change.apply_to(&mut entry.params);
    recompute(entry)
}
