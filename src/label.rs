//! # Single-Label Composer
//!
//! Lays out one label on a canvas the size of the label plus bleed.
//!
//! ## Label Anatomy
//!
//! ```text
//! ┌──────────────────────────────────────────┐ ← canvas (label + 2·bleed)
//! │  ╭────────────────────────────────────╮  │ ← border, inset by bleed
//! │  │ ┌────────────────────────────────┐ │  │ ← content, inset by bleed + padding
//! │  │ │ TITLE TEXT          │ ┌──────┐ │ │  │
//! │  │ │                     │ │  QR  │ │ │  │
//! │  │ │                     │ └──────┘ │ │  │
//! │  │ │ TRK0123456789       │          │ │  │ ← tracking line
//! │  │ │ ║│║║│║│║║│║║│║│║║│║│║║│║║│║   │ │  │ ← barcode reservation
//! │  │ └────────────────────────────────┘ │  │
//! │  ╰────────────────────────────────────╯  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The QR block takes `min(qr.size, content_height / 2)` pixels square at
//! the top-right of the content area. The bottom quarter of the content area
//! is reserved for the barcode.
//!
//! ## Degradation
//!
//! A barcode or QR code that cannot be rendered does not fail the label.
//! The composer records a [`RenderDegradation`] on the returned
//! [`ComposedLabel`] and carries on: a failed barcode is replaced by the raw
//! identifier printed as text in the reserved area, a failed QR block is left
//! blank.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use std::fmt;
use std::sync::Arc;

use crate::config::LabelConfig;
use crate::error::LabelError;
use crate::layout::Rect;
use crate::render::barcode::{BarcodeRenderer, Code128Renderer, barcode_digits};
use crate::render::draw::{self, INK, PAPER};
use crate::render::font::{Font, fallback_chain, resolve_font};
use crate::render::qr::{QrCodeRenderer, QrRenderer};
use crate::units::PixelScale;

/// A rendered label raster.
pub type LabelImage = GrayImage;

/// A rendering step that failed and was replaced by a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDegradation {
    /// The barcode could not be rendered; the identifier was printed as text.
    BarcodeFallback { identifier: String, reason: String },
    /// The QR code could not be rendered; its block was left blank.
    QrOmitted { payload: String, reason: String },
}

impl fmt::Display for RenderDegradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderDegradation::BarcodeFallback { identifier, reason } => {
                write!(f, "barcode for '{}' replaced by text: {}", identifier, reason)
            }
            RenderDegradation::QrOmitted { payload, reason } => {
                write!(f, "QR code for '{}' omitted: {}", payload, reason)
            }
        }
    }
}

/// Pixel regions of one composed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRegions {
    pub canvas: Rect,
    pub border: Rect,
    pub content: Rect,
    pub title: Rect,
    /// Tracking number line, directly above the barcode reservation.
    pub tracking: Option<Rect>,
    /// Whole QR block including its quiet zone.
    pub qr_block: Option<Rect>,
    /// The QR code itself.
    pub qr_code: Option<Rect>,
    pub separator: Option<Rect>,
    /// Area reserved for the barcode (or its text fallback).
    pub barcode: Rect,
}

/// Output of [`LabelComposer::compose_label`].
#[derive(Debug, Clone)]
pub struct ComposedLabel {
    pub image: LabelImage,
    pub regions: LabelRegions,
    pub degradations: Vec<RenderDegradation>,
}

impl ComposedLabel {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }

    pub fn into_image(self) -> LabelImage {
        self.image
    }
}

/// Composes single labels for one configuration.
///
/// The composer holds no mutable state: `compose_label` takes `&self` and can
/// be called from several threads at once.
///
/// ## Example
///
/// ```
/// use labelkit::config::LabelConfig;
/// use labelkit::label::LabelComposer;
/// use labelkit::render::Font;
///
/// let composer = LabelComposer::new(LabelConfig::a4())
///     .unwrap()
///     .with_font(Font::builtin());
/// let label = composer.compose_label("POSTCARD", Some("TRACK-1"), Some("TRK0000000001"));
/// assert_eq!(label.image.dimensions(), composer.canvas_size());
/// ```
#[derive(Clone)]
pub struct LabelComposer {
    config: LabelConfig,
    scale: PixelScale,
    font: Font,
    qr: Arc<dyn QrRenderer>,
    barcode: Arc<dyn BarcodeRenderer>,
}

impl fmt::Debug for LabelComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelComposer")
            .field("config", &self.config)
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

impl LabelComposer {
    /// Validate `config` and resolve its font through the fallback chain.
    pub fn new(config: LabelConfig) -> Result<Self, LabelError> {
        config.validate()?;
        let font = resolve_font(&fallback_chain(config.text.font_path.as_deref()));
        Ok(Self {
            scale: config.scale(),
            config,
            font,
            qr: Arc::new(QrCodeRenderer::default()),
            barcode: Arc::new(Code128Renderer::default()),
        })
    }

    /// Use `font` instead of the resolved one.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_qr_renderer(mut self, renderer: impl QrRenderer + 'static) -> Self {
        self.qr = Arc::new(renderer);
        self
    }

    pub fn with_barcode_renderer(mut self, renderer: impl BarcodeRenderer + 'static) -> Self {
        self.barcode = Arc::new(renderer);
        self
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Canvas size in pixels: label plus bleed on each side.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.scale.px(self.config.footprint_width()),
            self.scale.px(self.config.footprint_height()),
        )
    }

    fn title_px(&self) -> u32 {
        self.scale.pt_to_px(self.config.text.font_size)
    }

    fn tracking_px(&self) -> u32 {
        self.scale.pt_to_px(self.config.text.tracking_size())
    }

    fn stroke_px(&self) -> u32 {
        self.scale.px(self.config.label.border_width).max(1)
    }

    /// Compute where every element of a label goes, without drawing.
    pub fn regions(&self, text: &str, has_qr: bool, tracking_id: Option<&str>) -> LabelRegions {
        let spec = &self.config.label;
        let (width, height) = self.canvas_size();
        let canvas = Rect::new(0, 0, width, height);

        let border = inset(canvas, self.scale.px(spec.bleed));
        let content = inset(canvas, self.scale.px(spec.bleed + spec.padding));

        let title_px = self.title_px().min(content.height);
        let (title_width, _) = self.font.measure(text, title_px);
        let title = Rect::new(content.x, content.y, title_width, title_px);

        let reserved = content.height / 4;
        let barcode = Rect::new(
            content.x,
            content.bottom() - reserved,
            content.width,
            reserved,
        );

        let tracking = tracking_id.map(|id| {
            let line_px = self.tracking_px().min(barcode.y - content.y);
            let (line_width, _) = self.font.measure(id, line_px);
            Rect::new(content.x, barcode.y - line_px, line_width, line_px)
        });

        let (qr_block, qr_code) = if has_qr {
            let side = self
                .scale
                .px(self.config.qr.size)
                .min(content.height / 2)
                .min(content.width);
            let block = Rect::new(content.right() - side, content.y, side, side);
            let code = inset(block, self.scale.px(self.config.qr.padding));
            (Some(block), (!code.is_empty()).then_some(code))
        } else {
            (None, None)
        };

        let separator = match qr_block {
            Some(block) if spec.separator => {
                let spacing = self.scale.px(spec.padding).max(1);
                let stroke = self.stroke_px();
                let top = title.bottom() + spacing;
                let bottom = barcode.y.saturating_sub(spacing);
                match block.x.checked_sub(spacing + stroke) {
                    Some(x) if x >= content.x && bottom > top => {
                        Some(Rect::new(x, top, stroke, bottom - top))
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        LabelRegions {
            canvas,
            border,
            content,
            title,
            tracking,
            qr_block,
            qr_code,
            separator,
            barcode,
        }
    }

    /// Compose one label.
    ///
    /// `text` is drawn as-is at the top-left of the content area; long text
    /// is clipped, never wrapped. The QR block appears only when
    /// `qr_payload` is given. The tracking line and barcode appear only when
    /// `tracking_id` is given. Rendering never fails: see [`RenderDegradation`].
    pub fn compose_label(
        &self,
        text: &str,
        qr_payload: Option<&str>,
        tracking_id: Option<&str>,
    ) -> ComposedLabel {
        let regions = self.regions(text, qr_payload.is_some(), tracking_id);
        let canvas = regions.canvas;
        let mut image = GrayImage::from_pixel(canvas.width, canvas.height, Luma([PAPER]));
        let mut degradations = Vec::new();

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            text,
            tracking_id,
            "composing label"
        );

        let radius = self.scale.px(self.config.label.corner_radius);
        draw::rounded_rect(&mut image, regions.border, radius, self.stroke_px(), INK);

        let title = regions.title;
        self.font
            .draw(&mut image, title.x, title.y, text, title.height, INK);

        if let (Some(id), Some(line)) = (tracking_id, regions.tracking) {
            self.font.draw(&mut image, line.x, line.y, id, line.height, INK);
        }

        if let Some(rule) = regions.separator {
            draw::fill_rect(&mut image, rule, INK);
        }

        if let Some(payload) = qr_payload {
            if let Err(reason) = self.draw_qr(&mut image, &regions, payload) {
                let degradation = RenderDegradation::QrOmitted {
                    payload: payload.to_string(),
                    reason: reason.to_string(),
                };
                tracing::warn!("{}", degradation);
                degradations.push(degradation);
            }
        }

        if let Some(id) = tracking_id {
            if let Err(reason) = self.draw_barcode(&mut image, regions.barcode, id) {
                let degradation = RenderDegradation::BarcodeFallback {
                    identifier: id.to_string(),
                    reason: reason.to_string(),
                };
                tracing::warn!("{}", degradation);
                degradations.push(degradation);

                let area = regions.barcode;
                let line_px = self.tracking_px().min(area.height);
                self.font.draw(&mut image, area.x, area.y, id, line_px, INK);
            }
        }

        ComposedLabel {
            image,
            regions,
            degradations,
        }
    }

    fn draw_qr(
        &self,
        image: &mut GrayImage,
        regions: &LabelRegions,
        payload: &str,
    ) -> Result<(), LabelError> {
        let code = regions
            .qr_code
            .ok_or_else(|| LabelError::Render("no room for QR code".to_string()))?;
        let rendered = self.qr.render(payload, code.width)?;
        draw::paste(image, &rendered, code.x, code.y, code);
        Ok(())
    }

    /// Render the barcode, shrink it to the reserved width if needed, and
    /// anchor it bottom-centre.
    fn draw_barcode(&self, image: &mut GrayImage, area: Rect, id: &str) -> Result<(), LabelError> {
        if area.is_empty() {
            return Err(LabelError::Render("no room for barcode".to_string()));
        }
        let mut bars = self.barcode.render(&barcode_digits(id), area.height)?;
        if bars.width() == 0 || bars.height() == 0 {
            return Err(LabelError::Render(
                "barcode renderer returned an empty image".to_string(),
            ));
        }

        if bars.width() > area.width || bars.height() > area.height {
            let ratio = f64::min(
                area.width as f64 / bars.width() as f64,
                area.height as f64 / bars.height() as f64,
            );
            let width = ((bars.width() as f64 * ratio).floor() as u32).clamp(1, area.width);
            let height = ((bars.height() as f64 * ratio).floor() as u32).clamp(1, area.height);
            bars = imageops::resize(&bars, width, height, FilterType::Nearest);
        }

        let x = area.x + (area.width - bars.width()) / 2;
        let y = area.bottom() - bars.height();
        draw::paste(image, &bars, x, y, area);
        Ok(())
    }
}

/// Shrink a rectangle by `amount` on every side.
fn inset(rect: Rect, amount: u32) -> Rect {
    Rect::new(
        rect.x + amount,
        rect.y + amount,
        rect.width.saturating_sub(2 * amount),
        rect.height.saturating_sub(2 * amount),
    )
}

// ============================================================================
// TESTS
// ============================================================================
