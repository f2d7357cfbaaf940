//! # Font Resolution and Text Drawing
//!
//! Fonts are resolved through a fixed priority chain: the configured font
//! file, then a list of well-known system font locations, then the built-in
//! Spleen bitmap font. The first source that loads wins; failures along the
//! way are logged and skipped.
//!
//! ```text
//! text.font_path ─▶ SYSTEM_FONT_PATHS[0] ─▶ ... ─▶ Spleen 12×24 (always loads)
//! ```
//!
//! Outline fonts (TTF/OTF/TTC) are rasterized with `ab_glyph` and drawn with
//! anti-aliased coverage. The bitmap fallback is scaled nearest-neighbour to
//! the requested pixel height; characters it does not cover (CJK, emoji)
//! are drawn as boxes.

use ab_glyph::{Font as _, FontArc, FontVec, ScaleFont};
use image::{GrayImage, Luma};
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::LabelError;
use crate::layout::Rect;

/// System font locations tried after the configured font, in order.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Where a font comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// An outline font file on disk.
    File(PathBuf),
    /// The embedded Spleen bitmap font.
    Builtin,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => write!(f, "{}", path.display()),
            FontSource::Builtin => write!(f, "built-in bitmap font"),
        }
    }
}

/// Build the ordered fallback chain for an optional configured font.
pub fn fallback_chain(configured: Option<&Path>) -> Vec<FontSource> {
    let mut chain = Vec::with_capacity(SYSTEM_FONT_PATHS.len() + 2);
    if let Some(path) = configured {
        chain.push(FontSource::File(path.to_path_buf()));
    }
    chain.extend(
        SYSTEM_FONT_PATHS
            .iter()
            .map(|p| FontSource::File(PathBuf::from(p))),
    );
    chain.push(FontSource::Builtin);
    chain
}

/// Return the first font in `chain` that loads.
///
/// Never fails: when every source is unusable (or the chain is empty) the
/// built-in bitmap font is returned.
pub fn resolve_font(chain: &[FontSource]) -> Font {
    for source in chain {
        match Font::load(source) {
            Ok(font) => {
                tracing::debug!(source = %source, "resolved font");
                return font;
            }
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "font unavailable, trying next");
            }
        }
    }
    tracing::warn!("no font in chain loaded, using built-in bitmap font");
    Font::builtin()
}

#[derive(Clone)]
enum Face {
    Outline(FontArc),
    Bitmap,
}

/// A loaded font handle.
#[derive(Clone)]
pub struct Font {
    face: Face,
    source: FontSource,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font").field("source", &self.source).finish()
    }
}

impl Font {
    /// The embedded Spleen bitmap font.
    pub fn builtin() -> Self {
        Self {
            face: Face::Bitmap,
            source: FontSource::Builtin,
        }
    }

    /// Load a single source without falling back.
    pub fn load(source: &FontSource) -> Result<Self, LabelError> {
        match source {
            FontSource::Builtin => Ok(Self::builtin()),
            FontSource::File(path) => {
                let data = std::fs::read(path)?;
                Self::from_bytes(data, source.clone())
            }
        }
    }

    /// Parse an outline font from memory. Collections (`.ttc`) use their first face.
    pub fn from_bytes(data: Vec<u8>, source: FontSource) -> Result<Self, LabelError> {
        let font = FontVec::try_from_vec_and_index(data, 0)
            .map_err(|e| LabelError::Render(format!("invalid font {}: {}", source, e)))?;
        Ok(Self {
            face: Face::Outline(FontArc::new(font)),
            source,
        })
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.face, Face::Bitmap)
    }

    /// Size of `text` drawn at `px_height`, as `(width, height)`.
    pub fn measure(&self, text: &str, px_height: u32) -> (u32, u32) {
        if px_height == 0 {
            return (0, 0);
        }
        match &self.face {
            Face::Outline(font) => {
                let scaled = font.as_scaled(px_height as f32);
                let width: f32 = text
                    .chars()
                    .map(|ch| scaled.h_advance(font.glyph_id(ch)))
                    .sum();
                let height = (scaled.ascent() - scaled.descent()).ceil();
                (width.ceil() as u32, (height as u32).max(px_height))
            }
            Face::Bitmap => {
                let cell = BitmapCell::for_height(px_height);
                (cell.width * text.chars().count() as u32, px_height)
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    ///
    /// Pixels outside `img` are clipped; no wrapping is done. Returns the
    /// rectangle the text occupies (before clipping).
    pub fn draw(
        &self,
        img: &mut GrayImage,
        x: u32,
        y: u32,
        text: &str,
        px_height: u32,
        fill: u8,
    ) -> Rect {
        let (width, height) = self.measure(text, px_height);
        if width == 0 || height == 0 {
            return Rect::new(x, y, width, height);
        }
        match &self.face {
            Face::Outline(font) => draw_outline(font, img, x, y, text, px_height, fill),
            Face::Bitmap => draw_bitmap(img, x, y, text, px_height, fill),
        }
        Rect::new(x, y, width, height)
    }
}

// ============================================================================
// OUTLINE FONTS
// ============================================================================

fn draw_outline(
    font: &FontArc,
    img: &mut GrayImage,
    x: u32,
    y: u32,
    text: &str,
    px_height: u32,
    fill: u8,
) {
    let pixel_height = px_height as f32;
    let scaled = font.as_scaled(pixel_height);
    let baseline_y = y as f32 + scaled.ascent();

    let mut caret_x = x as f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph =
            glyph_id.with_scale_and_position(pixel_height, ab_glyph::point(caret_x, baseline_y));
        caret_x += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = gx as i64 + bounds.min.x as i64;
                let py = gy as i64 + bounds.min.y as i64;
                blend_pixel(img, px, py, fill, coverage);
            });
        }
    }
}

/// Mix `fill` into the pixel at `(x, y)` by `coverage` (0.0..=1.0).
fn blend_pixel(img: &mut GrayImage, x: i64, y: i64, fill: u8, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    let current = pixel.0[0] as f32;
    let mixed = current + (fill as f32 - current) * coverage;
    *pixel = Luma([mixed.round() as u8]);
}

// ============================================================================
// BITMAP FALLBACK
// ============================================================================

/// Source glyph grid and the scaled character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BitmapCell {
    src_width: u32,
    src_height: u32,
    width: u32,
    height: u32,
}

impl BitmapCell {
    /// Spleen 6×12 for small text, 12×24 for everything else.
    fn for_height(px_height: u32) -> Self {
        let (src_width, src_height) = if px_height < 18 { (6, 12) } else { (12, 24) };
        let width = ((src_width * px_height + src_height / 2) / src_height).max(1);
        Self {
            src_width,
            src_height,
            width,
            height: px_height,
        }
    }
}

/// Rasterize one character from Spleen into a `src_width × src_height` grid.
/// Returns `None` when the font has no glyph for it.
fn spleen_glyph(cell: &BitmapCell, ch: char) -> Option<Vec<bool>> {
    let data = if cell.src_height == 12 { FONT_6X12 } else { FONT_12X24 };
    let mut spleen = PSF2Font::new(data).ok()?;
    let utf8 = ch.to_string();
    let glyph = spleen.glyph_for_utf8(utf8.as_bytes())?;

    let (w, h) = (cell.src_width as usize, cell.src_height as usize);
    let mut bits = vec![false; w * h];
    for (row_y, row) in glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < h && col_x < w {
                bits[row_y * w + col_x] = on;
            }
        }
    }
    Some(bits)
}

fn draw_bitmap(img: &mut GrayImage, x: u32, y: u32, text: &str, px_height: u32, fill: u8) {
    let cell = BitmapCell::for_height(px_height);

    for (i, ch) in text.chars().enumerate() {
        let origin_x = x as u64 + i as u64 * cell.width as u64;
        if origin_x >= img.width() as u64 {
            break;
        }
        if ch.is_whitespace() {
            continue;
        }

        match spleen_glyph(&cell, ch) {
            Some(bits) => {
                for dy in 0..cell.height {
                    for dx in 0..cell.width {
                        let sx = dx * cell.src_width / cell.width;
                        let sy = dy * cell.src_height / cell.height;
                        if bits[(sy * cell.src_width + sx) as usize] {
                            put(img, origin_x + dx as u64, y as u64 + dy as u64, fill);
                        }
                    }
                }
            }
            // Unknown character: draw a box
            None => draw_box(img, origin_x, y as u64, cell.width as u64, cell.height as u64, fill),
        }
    }
}

/// Draw a one-pixel box outline.
fn draw_box(img: &mut GrayImage, x: u64, y: u64, width: u64, height: u64, fill: u8) {
    if width == 0 || height == 0 {
        return;
    }
    let right = x + width - 1;
    let bottom = y + height - 1;
    for dx in 0..width {
        put(img, x + dx, y, fill);
        put(img, x + dx, bottom, fill);
    }
    for dy in 0..height {
        put(img, x, y + dy, fill);
        put(img, right, y + dy, fill);
    }
}

#[inline]
fn put(img: &mut GrayImage, x: u64, y: u64, value: u8) {
    if x < img.width() as u64 && y < img.height() as u64 {
        img.put_pixel(x as u32, y as u32, Luma([value]));
    }
}
