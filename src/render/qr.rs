//! # QR Code Rendering
//!
//! Turns a payload into a square raster of exactly the requested size.
//! Modules are scaled nearest-neighbour, so a side that is not a multiple of
//! the module count gives modules that differ by at most one pixel.

use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};

use super::draw::{INK, PAPER};
use crate::error::LabelError;

/// Renders QR codes for the label composer.
pub trait QrRenderer: Send + Sync {
    /// Render `payload` as a `size × size` image.
    fn render(&self, payload: &str, size: u32) -> Result<GrayImage, LabelError>;
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrErrorLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl From<QrErrorLevel> for EcLevel {
    fn from(level: QrErrorLevel) -> Self {
        match level {
            QrErrorLevel::L => EcLevel::L,
            QrErrorLevel::M => EcLevel::M,
            QrErrorLevel::Q => EcLevel::Q,
            QrErrorLevel::H => EcLevel::H,
        }
    }
}

/// QR renderer backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeRenderer {
    pub error_level: QrErrorLevel,
}

impl QrCodeRenderer {
    pub fn new(error_level: QrErrorLevel) -> Self {
        Self { error_level }
    }

    /// Module grid for `payload`: `(width, dark flags row-major)`.
    pub fn modules(&self, payload: &str) -> Result<(usize, Vec<bool>), LabelError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.error_level.into())
            .map_err(|e| LabelError::Render(format!("QR code generation failed: {}", e)))?;
        let dark = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        Ok((code.width(), dark))
    }
}

impl QrRenderer for QrCodeRenderer {
    fn render(&self, payload: &str, size: u32) -> Result<GrayImage, LabelError> {
        let (width, dark) = self.modules(payload)?;
        if size < width as u32 {
            return Err(LabelError::Render(format!(
                "QR code needs at least {} px, only {} available",
                width, size
            )));
        }

        let mut img = GrayImage::from_pixel(size, size, Luma([PAPER]));
        for y in 0..size {
            let qy = y as usize * width / size as usize;
            for x in 0..size {
                let qx = x as usize * width / size as usize;
                if dark[qy * width + qx] {
                    img.put_pixel(x, y, Luma([INK]));
                }
            }
        }
        Ok(img)
    }
}

/// Sample a rendered QR image back into its module grid.
///
/// Reads the centre pixel of each module cell. Used to check that a rendered
/// block still carries the payload after scaling.
pub fn sample_modules(img: &GrayImage, width: usize) -> Vec<bool> {
    let side = img.width().min(img.height()) as usize;
    let mut modules = Vec::with_capacity(width * width);
    for qy in 0..width {
        for qx in 0..width {
            let x = (2 * qx + 1) * side / (2 * width);
            let y = (2 * qy + 1) * side / (2 * width);
            modules.push(img.get_pixel(x as u32, y as u32).0[0] < 128);
        }
    }
    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_exact_size() {
        let renderer = QrCodeRenderer::default();
        for size in [21, 64, 100, 147, 236] {
            let img = renderer.render("TRK0123456789", size).unwrap();
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn test_render_round_trips_payload() {
        let renderer = QrCodeRenderer::default();
        for payload in ["PC-1", "TRACK-A4-17", "https://example.com/parcel/42"] {
            let (width, expected) = renderer.modules(payload).unwrap();
            for size in [width as u32 * 4, width as u32 * 7 + 3, 211] {
                let img = renderer.render(payload, size).unwrap();
                assert_eq!(sample_modules(&img, width), expected, "payload={} size={}", payload, size);
            }
        }
    }

    #[test]
    fn test_modules_match_independent_encoder() {
        let (width, modules) = QrCodeRenderer::new(QrErrorLevel::H).modules("明信片").unwrap();
        let code = QrCode::with_error_correction_level("明信片".as_bytes(), EcLevel::H).unwrap();
        assert_eq!(width, code.width());
        let expected: Vec<bool> = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        assert_eq!(modules, expected);
    }

    #[test]
    fn test_too_small_fails() {
        let err = QrCodeRenderer::default().render("hello", 10).unwrap_err();
        assert!(matches!(err, LabelError::Render(_)));
    }

    #[test]
    fn test_oversized_payload_fails() {
        let payload = "X".repeat(8000);
        assert!(QrCodeRenderer::default().render(&payload, 500).is_err());
    }

    #[test]
    fn test_finder_pattern_corner_dark() {
        let img = QrCodeRenderer::default().render("corner", 210).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[0], INK);
        assert_eq!(img.get_pixel(209, 0).0[0], INK);
        assert_eq!(img.get_pixel(0, 209).0[0], INK);
    }
}
