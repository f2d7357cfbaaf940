//! # Unit Conversion
//!
//! Converts physical lengths from a label configuration into device pixels.
//!
//! ## Calculations
//!
//! ```text
//! millimeters = value * unit_scale        (mm → 1, cm → 10)
//! dots_per_mm = dpi / 25.4
//! pixels      = round(millimeters * dots_per_mm)
//!
//! At 300 DPI:
//!   dots_per_mm = 300 / 25.4 ≈ 11.81
//!   50mm        = 590.55 → 591 px
//! ```
//!
//! Every conversion in the crate goes through [`PixelScale::px`] so that a
//! single rounding rule (half away from zero) applies everywhere. Composite
//! offsets such as `bleed + padding` are summed in physical units first and
//! converted once, which keeps edges of nested boxes aligned.

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Points per inch (font sizes are given in points).
pub const POINTS_PER_INCH: f64 = 72.0;

/// Length unit a configuration is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Cm,
}

impl Unit {
    /// Multiplier that turns a value in this unit into millimeters.
    #[inline]
    pub fn scale(self) -> f64 {
        match self {
            Unit::Mm => 1.0,
            Unit::Cm => 10.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
        }
    }
}

/// Physical-to-pixel converter for one DPI and unit.
///
/// ## Example
///
/// ```
/// use labelkit::units::{PixelScale, Unit};
///
/// let scale = PixelScale::new(300.0, Unit::Mm).unwrap();
/// assert_eq!(scale.px(25.4), 300);
///
/// let cm = PixelScale::new(300.0, Unit::Cm).unwrap();
/// assert_eq!(cm.px(2.54), 300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelScale {
    dpi: f64,
    unit: Unit,
}

impl PixelScale {
    /// Create a converter. Fails when the DPI is not a positive finite number.
    pub fn new(dpi: f64, unit: Unit) -> Result<Self, LabelError> {
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(LabelError::Config(format!(
                "dpi must be a positive number, got {}",
                dpi
            )));
        }
        Ok(Self { dpi, unit })
    }

    /// Create a converter from an already validated DPI.
    pub(crate) fn new_unchecked(dpi: f64, unit: Unit) -> Self {
        Self { dpi, unit }
    }

    #[inline]
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    #[inline]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Convert a length in the configured unit to pixels.
    ///
    /// Negative and non-finite inputs clamp to zero.
    #[inline]
    pub fn px(&self, value: f64) -> u32 {
        let dots = (value * self.unit.scale() * self.dpi / MM_PER_INCH).round();
        if dots.is_finite() && dots > 0.0 {
            dots.min(u32::MAX as f64) as u32
        } else {
            0
        }
    }

    /// Convert a font size in points to a pixel height.
    #[inline]
    pub fn pt_to_px(&self, points: f64) -> u32 {
        let dots = (points * self.dpi / POINTS_PER_INCH).round();
        if dots.is_finite() && dots > 0.0 {
            dots as u32
        } else {
            0
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
