//! User-editable print parameters.

use crate::Material;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters that turn a part's geometry into printed weight and price.
///
/// Values are not validated; out-of-range inputs produce out-of-range
/// estimates rather than errors.
///
/// With the `serde` feature the JSON field names are `amount`, `infill`,
/// `walls`, `nozzleDiameter`, `density` and `pricePerKg`; missing fields
/// take their default.
///
/// # Example
///
/// ```
/// use print_estimate::{Material, PrintParams};
///
/// let params = PrintParams::default()
///     .with_material(Material::Petg)
///     .with_infill_percent(20.0)
///     .with_amount(4);
///
/// assert_eq!(params.amount, 4);
/// assert!((params.density - 1.27).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintParams {
    /// Number of copies to print.
    pub amount: u32,

    /// Infill density in percent (0-100).
    #[cfg_attr(feature = "serde", serde(rename = "infill"))]
    pub infill_percent: f64,

    /// Number of perimeter walls.
    #[cfg_attr(feature = "serde", serde(rename = "walls"))]
    pub wall_count: u32,

    /// Nozzle diameter in mm. Only matters when `wall_count > 0`.
    #[cfg_attr(feature = "serde", serde(rename = "nozzleDiameter"))]
    pub nozzle_diameter: f64,

    /// Material density in g/cm³.
    pub density: f64,

    /// Filament price per kilogram.
    #[cfg_attr(feature = "serde", serde(rename = "pricePerKg"))]
    pub price_per_kg: f64,
}

impl Default for PrintParams {
    fn default() -> Self {
        Self {
            amount: 1,
            infill_percent: 15.0,
            wall_count: 2,
            nozzle_diameter: 0.4,
            density: Material::Pla.density(),
            price_per_kg: 20.0,
        }
    }
}

impl PrintParams {
    /// Default parameters with the density of `material`.
    #[must_use]
    pub fn for_material(material: Material) -> Self {
        Self::default().with_material(material)
    }

    /// Fully solid part: 100 % infill.
    #[must_use]
    pub fn solid() -> Self {
        Self {
            infill_percent: 100.0,
            ..Default::default()
        }
    }

    /// Set the number of copies.
    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Set the infill percentage.
    #[must_use]
    pub fn with_infill_percent(mut self, percent: f64) -> Self {
        self.infill_percent = percent;
        self
    }

    /// Set the number of perimeter walls.
    #[must_use]
    pub fn with_wall_count(mut self, walls: u32) -> Self {
        self.wall_count = walls;
        self
    }

    /// Set the nozzle diameter in mm.
    #[must_use]
    pub fn with_nozzle_diameter(mut self, diameter: f64) -> Self {
        self.nozzle_diameter = diameter;
        self
    }

    /// Set the density in g/cm³.
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Set the density from a material preset.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.density = material.density();
        self
    }

    /// Set the price per kilogram.
    #[must_use]
    pub fn with_price_per_kg(mut self, price: f64) -> Self {
        self.price_per_kg = price;
        self
    }

    /// The preset matching the current density, or `Custom`.
    #[must_use]
    pub fn material(&self) -> Material {
        Material::from_density(self.density)
    }

    /// Thickness of the wall shell in mm, `wall_count * nozzle_diameter`.
    #[must_use]
    pub fn shell_thickness(&self) -> f64 {
        f64::from(self.wall_count) * self.nozzle_diameter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = PrintParams::default();
        assert_eq!(p.amount, 1);
        assert!((p.infill_percent - 15.0).abs() < f64::EPSILON);
        assert_eq!(p.wall_count, 2);
        assert!((p.nozzle_diameter - 0.4).abs() < f64::EPSILON);
        assert!((p.density - 1.24).abs() < f64::EPSILON);
        assert!((p.price_per_kg - 20.0).abs() < f64::EPSILON);
        assert_eq!(p.material(), Material::Pla);
        assert!((p.shell_thickness() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn builders() {
        let p = PrintParams::for_material(Material::Abs)
            .with_wall_count(0)
            .with_nozzle_diameter(0.6)
            .with_price_per_kg(35.5);
        assert_eq!(p.material(), Material::Abs);
        assert_eq!(p.wall_count, 0);
        assert!((p.shell_thickness()).abs() < f64::EPSILON);
        assert!((p.price_per_kg - 35.5).abs() < f64::EPSILON);

        let p = p.with_density(0.95);
        assert_eq!(p.material(), Material::Custom);
    }

    #[test]
    fn solid_preset() {
        assert!((PrintParams::solid().infill_percent - 100.0).abs() < f64::EPSILON);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_uses_collaborator_names() {
        let p: PrintParams =
            serde_json::from_str(r#"{"infill": 40, "walls": 3, "pricePerKg": 25.5}"#).unwrap();
        assert!((p.infill_percent - 40.0).abs() < f64::EPSILON);
        assert_eq!(p.wall_count, 3);
        assert!((p.price_per_kg - 25.5).abs() < f64::EPSILON);
        assert_eq!(p.amount, 1);

        let json = serde_json::to_value(PrintParams::default()).unwrap();
        assert_eq!(json["nozzleDiameter"], 0.4);
    }
}
