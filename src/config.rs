//! # Label Configuration
//!
//! Typed configuration for one generation run: paper, label, text, QR and
//! tracking-number settings. All lengths are written in the configured
//! [`Unit`] and converted to pixels through [`PixelScale`].
//!
//! ## Document Format
//!
//! ```json
//! {
//!   "dpi": 300,
//!   "unit": "mm",
//!   "paper": { "width": 210, "height": 297, "margin": 5, "gap": 2 },
//!   "label": { "width": 50, "height": 30, "bleed": 1, "padding": 2, "corner_radius": 3 },
//!   "text":  { "font_path": "fonts/NotoSansCJK-Regular.ttc", "font_size": 12 },
//!   "qr":    { "size": 20, "padding": 1 }
//! }
//! ```
//!
//! Unknown keys are ignored. Missing required keys and out-of-range values
//! fail with [`LabelError::Config`] when the configuration is loaded, never
//! later during rendering.
//!
//! ## Usage
//!
//! ```
//! use labelkit::config::LabelConfig;
//!
//! let config = LabelConfig::preset("a4").unwrap();
//! assert_eq!(config.paper.width, 210.0);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::LabelError;
use crate::units::{PixelScale, Unit};

/// Paper sheet dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperConfig {
    pub width: f64,
    pub height: f64,
    /// Blank border on every side of the sheet.
    pub margin: f64,
    /// Spacing between adjacent label footprints.
    pub gap: f64,
}

/// Single label dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub width: f64,
    pub height: f64,
    /// Extra area around the nominal label for imprecise cutting.
    pub bleed: f64,
    /// Inset between the border and the content.
    pub padding: f64,
    pub corner_radius: f64,
    /// Stroke width of the rounded border.
    #[serde(default = "default_border_width")]
    pub border_width: f64,
    /// Draw a vertical rule between the text column and the QR column.
    #[serde(default = "default_true")]
    pub separator: bool,
}

/// Text settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Preferred font file. When absent the system font list is tried first.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    /// Title font size in points.
    pub font_size: f64,
    /// Tracking number font size in points (defaults to 60% of `font_size`).
    #[serde(default)]
    pub tracking_font_size: Option<f64>,
}

impl TextConfig {
    pub fn tracking_size(&self) -> f64 {
        self.tracking_font_size.unwrap_or(self.font_size * 0.6)
    }
}

/// QR code block settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrConfig {
    /// Upper bound of the QR block side length.
    pub size: f64,
    /// Quiet zone inside the QR block.
    pub padding: f64,
}

/// Generated tracking number format: `prefix` followed by `digits` random digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_digits")]
    pub digits: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            digits: default_digits(),
        }
    }
}

fn default_border_width() -> f64 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_prefix() -> String {
    "TRK".to_string()
}

fn default_digits() -> usize {
    10
}

/// # Label Configuration
///
/// Immutable record for one generation run. Construct it with
/// [`from_json_str`](Self::from_json_str), [`load`](Self::load) or
/// [`preset`](Self::preset); each of them validates before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Output resolution in dots per inch.
    pub dpi: f64,
    /// Unit every length below is written in.
    pub unit: Unit,
    pub paper: PaperConfig,
    pub label: LabelSpec,
    pub text: TextConfig,
    pub qr: QrConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

impl LabelConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
        let config: LabelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LabelError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&json).map_err(|e| match e {
            LabelError::Config(msg) => LabelError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded label config");
        Ok(config)
    }

    /// Resolve a CLI argument: a built-in preset name or a path to a JSON file.
    pub fn resolve(s: &str) -> Result<Self, LabelError> {
        if let Some(config) = Self::preset(s) {
            return Ok(config);
        }
        let path = Path::new(s);
        if path.exists() {
            return Self::load(path);
        }
        Err(LabelError::Config(format!(
            "Unknown preset or config file '{}'. Presets: {}",
            s,
            Self::preset_names().join(", ")
        )))
    }

    /// Check every value once so rendering never meets a bad field.
    pub fn validate(&self) -> Result<(), LabelError> {
        PixelScale::new(self.dpi, self.unit)?;

        let positive = [
            ("paper.width", self.paper.width),
            ("paper.height", self.paper.height),
            ("label.width", self.label.width),
            ("label.height", self.label.height),
            ("label.border_width", self.label.border_width),
            ("text.font_size", self.text.font_size),
            ("text.tracking_font_size", self.text.tracking_size()),
            ("qr.size", self.qr.size),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LabelError::Config(format!(
                    "{} must be greater than 0, got {}",
                    key, value
                )));
            }
        }

        let non_negative = [
            ("paper.margin", self.paper.margin),
            ("paper.gap", self.paper.gap),
            ("label.bleed", self.label.bleed),
            ("label.padding", self.label.padding),
            ("label.corner_radius", self.label.corner_radius),
            ("qr.padding", self.qr.padding),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LabelError::Config(format!(
                    "{} must not be negative, got {}",
                    key, value
                )));
            }
        }

        if self.tracking.digits == 0 {
            return Err(LabelError::Config(
                "tracking.digits must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Pixel converter for this configuration.
    ///
    /// Assumes the configuration passed [`validate`](Self::validate).
    pub fn scale(&self) -> PixelScale {
        PixelScale::new_unchecked(self.dpi, self.unit)
    }

    /// Label width including bleed on both sides.
    #[inline]
    pub fn footprint_width(&self) -> f64 {
        self.label.width + 2.0 * self.label.bleed
    }

    /// Label height including bleed on both sides.
    #[inline]
    pub fn footprint_height(&self) -> f64 {
        self.label.height + 2.0 * self.label.bleed
    }

    // ========================================================================
    // PRESETS
    // ========================================================================

    /// A4 paper (210×297mm) with 50×30mm labels.
    pub fn a4() -> Self {
        Self {
            dpi: 300.0,
            unit: Unit::Mm,
            paper: PaperConfig {
                width: 210.0,
                height: 297.0,
                margin: 5.0,
                gap: 2.0,
            },
            label: LabelSpec {
                width: 50.0,
                height: 30.0,
                bleed: 1.0,
                padding: 2.0,
                corner_radius: 3.0,
                border_width: default_border_width(),
                separator: true,
            },
            text: TextConfig {
                font_path: None,
                font_size: 12.0,
                tracking_font_size: None,
            },
            qr: QrConfig {
                size: 20.0,
                padding: 1.0,
            },
            tracking: TrackingConfig::default(),
        }
    }

    /// B5 paper (176×250mm) with 60×35mm labels.
    pub fn b5() -> Self {
        let mut config = Self::a4();
        config.paper.width = 176.0;
        config.paper.height = 250.0;
        config.label.width = 60.0;
        config.label.height = 35.0;
        config.qr.size = 22.0;
        config
    }

    /// Small 100×150mm sheet with 42×25mm labels.
    pub fn small() -> Self {
        let mut config = Self::a4();
        config.paper = PaperConfig {
            width: 100.0,
            height: 150.0,
            margin: 3.0,
            gap: 2.0,
        };
        config.label.width = 42.0;
        config.label.height = 25.0;
        config.label.corner_radius = 2.0;
        config.text.font_size = 10.0;
        config.qr.size = 16.0;
        config
    }

    /// Look up a built-in preset by name (case-insensitive).
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "a4" => Some(Self::a4()),
            "b5" => Some(Self::b5()),
            "small" => Some(Self::small()),
            _ => None,
        }
    }

    /// Names accepted by [`preset`](Self::preset).
    pub fn preset_names() -> &'static [&'static str] {
        &["a4", "b5", "small"]
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self::a4()
    }
}

// ============================================================================
// TESTS
// ============================================================================
