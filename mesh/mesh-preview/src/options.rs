//! Preview render options.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a preview is lit and sized.
///
/// # Example
///
/// ```
/// use mesh_preview::PreviewOptions;
///
/// let opts = PreviewOptions::default().with_size(128, 96);
/// assert_eq!((opts.width, opts.height), (128, 96));
/// assert_eq!(opts.color, [0x3b, 0x82, 0xf6]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PreviewOptions {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Model color as RGB.
    pub color: [u8; 3],
    /// Ambient light intensity.
    pub ambient: f64,
    /// Directional light intensity.
    pub light_intensity: f64,
    /// Direction the directional light comes from (need not be normalized).
    pub light_direction: Vector3<f64>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            color: [0x3b, 0x82, 0xf6],
            ambient: 0.3,
            light_intensity: 1.5,
            light_direction: Vector3::new(2.0, 5.0, 3.0),
        }
    }
}

impl PreviewOptions {
    /// Small square thumbnail.
    #[must_use]
    pub fn thumbnail() -> Self {
        Self::default().with_size(128, 128)
    }

    /// Set the image size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the model color.
    #[must_use]
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Set ambient and directional intensities.
    #[must_use]
    pub fn with_lighting(mut self, ambient: f64, light_intensity: f64) -> Self {
        self.ambient = ambient;
        self.light_intensity = light_intensity;
        self
    }

    /// Set where the directional light comes from.
    #[must_use]
    pub fn with_light_direction(mut self, direction: Vector3<f64>) -> Self {
        self.light_direction = direction;
        self
    }
}
