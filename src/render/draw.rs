//! # Raster Primitives
//!
//! Drawing helpers on 8-bit grayscale images: filled rectangles, straight
//! rules, quarter arcs, the rounded label border, and opaque pasting.
//!
//! ## Rounded Border
//!
//! Angles follow image coordinates: 0° points right, 90° points down.
//!
//! ```text
//!        top edge
//!    ╭──────────────╮      corner arcs, drawn in this order:
//!    │              │        top-left      180°–270°
//!    │              │        top-right     270°–360°
//!    │              │        bottom-right    0°–90°
//!    ╰──────────────╯        bottom-left    90°–180°
//! ```
//!
//! Each straight edge runs from one arc's tangent point to the next, so the
//! outline is closed with no gap at the corners.

use image::{GrayImage, Luma};

use crate::layout::Rect;

/// Black ink.
pub const INK: u8 = 0;

/// White paper.
pub const PAPER: u8 = 255;

/// A 90° arc sweep, named by its start angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// 0°–90°
    BottomRight,
    /// 90°–180°
    BottomLeft,
    /// 180°–270°
    TopLeft,
    /// 270°–360°
    TopRight,
}

impl Quadrant {
    /// Border corners in drawing order.
    pub const BORDER_ORDER: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomRight,
        Quadrant::BottomLeft,
    ];

    /// Start and end angle in degrees.
    pub fn sweep(self) -> (u32, u32) {
        match self {
            Quadrant::BottomRight => (0, 90),
            Quadrant::BottomLeft => (90, 180),
            Quadrant::TopLeft => (180, 270),
            Quadrant::TopRight => (270, 360),
        }
    }

    /// Direction of x and y away from the arc centre.
    fn signs(self) -> (i64, i64) {
        match self {
            Quadrant::BottomRight => (1, 1),
            Quadrant::BottomLeft => (-1, 1),
            Quadrant::TopLeft => (-1, -1),
            Quadrant::TopRight => (1, -1),
        }
    }
}

#[inline]
fn put(img: &mut GrayImage, x: i64, y: i64, value: u8) {
    if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, Luma([value]));
    }
}

/// Fill a rectangle, clipped to the image.
pub fn fill_rect(img: &mut GrayImage, rect: Rect, value: u8) {
    let right = rect.right().min(img.width());
    let bottom = rect.bottom().min(img.height());
    for y in rect.y..bottom {
        for x in rect.x..right {
            img.put_pixel(x, y, Luma([value]));
        }
    }
}

/// Horizontal rule from `x0` to `x1` inclusive, `thickness` rows starting at `y` going down.
pub fn hline(img: &mut GrayImage, x0: i64, x1: i64, y: i64, thickness: u32, value: u8) {
    let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    for t in 0..thickness as i64 {
        for x in x0..=x1 {
            put(img, x, y + t, value);
        }
    }
}

/// Vertical rule from `y0` to `y1` inclusive, `thickness` columns starting at `x` going right.
pub fn vline(img: &mut GrayImage, x: i64, y0: i64, y1: i64, thickness: u32, value: u8) {
    let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    for t in 0..thickness as i64 {
        for y in y0..=y1 {
            put(img, x + t, y, value);
        }
    }
}

/// Draw a quarter-circle stroke around `(cx, cy)`.
///
/// The stroke covers pixels whose distance from the centre lies in
/// `(radius - thickness, radius]`, measured from pixel centres; the outer
/// edge touches `cx ± radius` / `cy ± radius` exactly.
pub fn quarter_arc(
    img: &mut GrayImage,
    cx: i64,
    cy: i64,
    radius: u32,
    thickness: u32,
    quadrant: Quadrant,
    value: u8,
) {
    if radius == 0 || thickness == 0 {
        return;
    }
    let (sx, sy) = quadrant.signs();
    let outer = radius as f64 + 0.5;
    let inner = radius as f64 - thickness as f64 + 0.5;

    for dy in 0..=radius as i64 {
        for dx in 0..=radius as i64 {
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            if d < outer && d >= inner {
                put(img, cx + sx * dx, cy + sy * dy, value);
            }
        }
    }
}

/// Draw a rounded-rectangle outline along the inside of `rect`.
///
/// `radius` is clamped to half the shorter side. A zero radius gives square
/// corners.
pub fn rounded_rect(img: &mut GrayImage, rect: Rect, radius: u32, thickness: u32, value: u8) {
    if rect.is_empty() || thickness == 0 {
        return;
    }
    let radius = radius.min(rect.width / 2).min(rect.height / 2);
    let r = radius as i64;
    let t = thickness as i64;

    let x0 = rect.x as i64;
    let y0 = rect.y as i64;
    let x1 = rect.right() as i64 - 1;
    let y1 = rect.bottom() as i64 - 1;

    for quadrant in Quadrant::BORDER_ORDER {
        let (cx, cy) = match quadrant {
            Quadrant::TopLeft => (x0 + r, y0 + r),
            Quadrant::TopRight => (x1 - r, y0 + r),
            Quadrant::BottomRight => (x1 - r, y1 - r),
            Quadrant::BottomLeft => (x0 + r, y1 - r),
        };
        quarter_arc(img, cx, cy, radius, thickness, quadrant, value);
    }

    // Edges between tangent points: top, right, bottom, left
    hline(img, x0 + r, x1 - r, y0, thickness, value);
    vline(img, x1 - t + 1, y0 + r, y1 - r, thickness, value);
    hline(img, x1 - r, x0 + r, y1 - t + 1, thickness, value);
    vline(img, x0, y1 - r, y0 + r, thickness, value);
}

/// Copy `src` onto `dst` at `(x, y)`, overwriting (no blending).
///
/// Only pixels inside `clip` (and inside `dst`) are written.
pub fn paste(dst: &mut GrayImage, src: &GrayImage, x: u32, y: u32, clip: Rect) {
    let right = clip.right().min(dst.width());
    let bottom = clip.bottom().min(dst.height());
    let start_x = x.max(clip.x);
    let start_y = y.max(clip.y);

    for dy in start_y..bottom {
        let sy = dy - y;
        if sy >= src.height() {
            break;
        }
        for dx in start_x..right {
            let sx = dx - x;
            if sx >= src.width() {
                break;
            }
            dst.put_pixel(dx, dy, *src.get_pixel(sx, sy));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([PAPER]))
    }

    fn inked(img: &GrayImage, x: u32, y: u32) -> bool {
        img.get_pixel(x, y).0[0] == INK
    }

    #[test]
    fn test_border_order_and_sweeps() {
        let sweeps: Vec<_> = Quadrant::BORDER_ORDER.iter().map(|q| q.sweep()).collect();
        assert_eq!(sweeps, vec![(180, 270), (270, 360), (0, 90), (90, 180)]);
    }

    #[test]
    fn test_quarter_arc_endpoints() {
        let mut img = blank(30, 30);
        quarter_arc(&mut img, 15, 15, 10, 1, Quadrant::TopLeft, INK);
        // Endpoints of the 180°–270° sweep
        assert!(inked(&img, 5, 15));
        assert!(inked(&img, 15, 5));
        // Nothing in the other quadrants
        assert!(!inked(&img, 25, 15));
        assert!(!inked(&img, 15, 25));
        // Centre untouched
        assert!(!inked(&img, 15, 15));
    }

    #[test]
    fn test_rounded_rect_closed_outline() {
        let mut img = blank(100, 60);
        let rect = Rect::new(10, 10, 80, 40);
        rounded_rect(&mut img, rect, 8, 2, INK);

        // Tangent points on every edge
        assert!(inked(&img, 18, 10)); // top, after top-left arc
        assert!(inked(&img, 81, 10)); // top, before top-right arc
        assert!(inked(&img, 89, 18)); // right
        assert!(inked(&img, 89, 41));
        assert!(inked(&img, 18, 49)); // bottom
        assert!(inked(&img, 10, 18)); // left
        assert!(inked(&img, 10, 41));

        // Corners are rounded off
        assert!(!inked(&img, 10, 10));
        assert!(!inked(&img, 89, 10));
        assert!(!inked(&img, 89, 49));
        assert!(!inked(&img, 10, 49));

        // Interior and exterior untouched
        assert!(!inked(&img, 50, 30));
        assert!(!inked(&img, 5, 5));
        assert!(!inked(&img, 95, 55));
    }

    #[test]
    fn test_rounded_rect_no_gaps() {
        // Walking the outline ring, every row and column crossing the border
        // must hit ink on both sides.
        let mut img = blank(120, 80);
        let rect = Rect::new(4, 4, 112, 72);
        rounded_rect(&mut img, rect, 12, 1, INK);

        for y in 4..76 {
            let row: Vec<u32> = (0..120).filter(|&x| inked(&img, x, y)).collect();
            assert!(row.len() >= 2, "row {} has a gap", y);
        }
        for x in 4..116 {
            let col: Vec<u32> = (0..80).filter(|&y| inked(&img, x, y)).collect();
            assert!(col.len() >= 2, "column {} has a gap", x);
        }
    }

    #[test]
    fn test_rounded_rect_zero_radius_is_square() {
        let mut img = blank(20, 20);
        rounded_rect(&mut img, Rect::new(2, 2, 16, 16), 0, 1, INK);
        assert!(inked(&img, 2, 2));
        assert!(inked(&img, 17, 17));
        assert!(!inked(&img, 10, 10));
    }

    #[test]
    fn test_radius_clamped() {
        let mut img = blank(20, 20);
        rounded_rect(&mut img, Rect::new(0, 0, 20, 10), 50, 1, INK);
        assert!(inked(&img, 10, 0));
        assert!(inked(&img, 10, 9));
    }

    #[test]
    fn test_lines() {
        let mut img = blank(10, 10);
        hline(&mut img, 8, 2, 1, 2, INK);
        assert!(inked(&img, 2, 1) && inked(&img, 8, 2));
        assert!(!inked(&img, 9, 1));

        vline(&mut img, 5, 4, 9, 1, INK);
        assert!(inked(&img, 5, 4) && inked(&img, 5, 9));
        assert!(!inked(&img, 6, 5));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut img = blank(10, 10);
        fill_rect(&mut img, Rect::new(8, 8, 5, 5), INK);
        assert!(inked(&img, 9, 9));
        assert!(!inked(&img, 7, 7));
    }

    #[test]
    fn test_paste_overwrites_and_clips() {
        let mut dst = blank(10, 10);
        let src = GrayImage::from_pixel(6, 6, Luma([100]));
        paste(&mut dst, &src, 2, 2, Rect::new(2, 2, 4, 4));
        assert_eq!(dst.get_pixel(2, 2).0[0], 100);
        assert_eq!(dst.get_pixel(5, 5).0[0], 100);
        // Outside clip
        assert_eq!(dst.get_pixel(6, 6).0[0], PAPER);

        // Opaque: white source pixels replace existing ink
        let mut dst = GrayImage::from_pixel(4, 4, Luma([INK]));
        paste(&mut dst, &blank(2, 2), 1, 1, Rect::new(0, 0, 4, 4));
        assert_eq!(dst.get_pixel(1, 1).0[0], PAPER);
        assert_eq!(dst.get_pixel(0, 0).0[0], INK);
    }
}
