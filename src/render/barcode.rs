//! # Barcode Rendering
//!
//! Code 128 barcodes built with the `barcoders` crate. Labels carry the
//! digits of their tracking number; [`barcode_digits`] derives them.

use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};

use super::draw::{INK, PAPER};
use crate::error::LabelError;

/// Minimum number of digits encoded in a label barcode.
pub const MIN_BARCODE_DIGITS: usize = 8;

/// Renders 1D barcodes for the label composer.
pub trait BarcodeRenderer: Send + Sync {
    /// Render `digits` as bars `height` pixels tall. Width is chosen by the renderer.
    fn render(&self, digits: &str, height: u32) -> Result<GrayImage, LabelError>;
}

/// Keep only the ASCII digits of an identifier, left-padding with zeros to
/// [`MIN_BARCODE_DIGITS`].
///
/// ```
/// use labelkit::render::barcode::barcode_digits;
///
/// assert_eq!(barcode_digits("TRK-4821"), "00004821");
/// assert_eq!(barcode_digits("PC0123456789"), "0123456789");
/// ```
pub fn barcode_digits(identifier: &str) -> String {
    let digits: String = identifier.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{:0>width$}", digits, width = MIN_BARCODE_DIGITS)
}

/// Code 128 (character set B) renderer.
#[derive(Debug, Clone, Copy)]
pub struct Code128Renderer {
    /// Bar module width in pixels.
    pub module_width: u32,
}

impl Default for Code128Renderer {
    fn default() -> Self {
        Self { module_width: 2 }
    }
}

impl Code128Renderer {
    /// Encode `data` into module flags, true = bar.
    pub fn encode(&self, data: &str) -> Result<Vec<bool>, LabelError> {
        // Character set B (Ɓ) covers digits and printable ASCII
        let prefixed = format!("\u{0181}{}", data);
        let barcode = Code128::new(&prefixed)
            .map_err(|e| LabelError::Render(format!("barcode encoding failed: {}", e)))?;
        Ok(barcode.encode().into_iter().map(|m| m == 1).collect())
    }
}

impl BarcodeRenderer for Code128Renderer {
    fn render(&self, digits: &str, height: u32) -> Result<GrayImage, LabelError> {
        if height == 0 {
            return Err(LabelError::Render("barcode height is zero".to_string()));
        }
        let modules = self.encode(digits)?;
        let scale = self.module_width.max(1);
        let width = modules.len() as u32 * scale;

        let mut img = GrayImage::from_pixel(width, height, Luma([PAPER]));
        for (i, &bar) in modules.iter().enumerate() {
            if !bar {
                continue;
            }
            for dx in 0..scale {
                let x = i as u32 * scale + dx;
                for y in 0..height {
                    img.put_pixel(x, y, Luma([INK]));
                }
            }
        }
        Ok(img)
    }
}
