//! # Sheet Compositor
//!
//! Tiles labels onto a paper-sized canvas.
//!
//! ## Pipeline
//!
//! ```text
//! SheetLayout::calculate ─▶ (cols, rows)
//!        │
//!        ▼
//! labels supplied? ── no ──▶ for i in 0..cols·rows:
//!        │                     tracking id  ← IdSource
//!        │                     QR payload   ← qr_prefix-(i+1) | qr_payload | tracking id
//!        │                     compose_label (in parallel)
//!        ▼
//! paste label i at cell (i mod cols, i div cols), opaque, clipped to the sheet
//! ```
//!
//! Capacity is a hard cap: supplied labels beyond `cols·rows` are dropped
//! and counted in [`Sheet::dropped`]. A zero-capacity layout produces a
//! blank sheet.

use image::{GrayImage, Luma};
use rayon::prelude::*;

use crate::config::LabelConfig;
use crate::error::LabelError;
use crate::label::{ComposedLabel, LabelComposer, LabelImage, RenderDegradation};
use crate::layout::{Rect, SheetLayout};
use crate::render::draw::{self, PAPER};
use crate::tracking::{IdSource, RandomIds};

/// Identifiers generated for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLabel {
    pub tracking_id: String,
    pub qr_payload: String,
}

/// A label placed on a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLabel {
    pub index: usize,
    /// Grid cell as `(col, row)`.
    pub cell: (u32, u32),
    /// Pixel rectangle the label covers on the sheet.
    pub rect: Rect,
    /// Present when the compositor generated the label itself.
    pub generated: Option<GeneratedLabel>,
}

/// A composed sheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub image: GrayImage,
    pub layout: SheetLayout,
    pub placed: Vec<PlacedLabel>,
    /// Supplied labels that did not fit.
    pub dropped: usize,
    /// Fallbacks taken while composing generated labels.
    pub degradations: Vec<RenderDegradation>,
}

impl Sheet {
    pub fn label_count(&self) -> usize {
        self.placed.len()
    }
}

/// QR payload for generated label `index`.
///
/// Precedence: `"{qr_prefix}-{index + 1}"`, then the shared `qr_payload`,
/// then the label's own tracking id.
pub fn qr_payload_for(
    index: usize,
    qr_prefix: Option<&str>,
    qr_payload: Option<&str>,
    tracking_id: &str,
) -> String {
    match (qr_prefix, qr_payload) {
        (Some(prefix), _) => format!("{}-{}", prefix, index + 1),
        (None, Some(payload)) => payload.to_string(),
        (None, None) => tracking_id.to_string(),
    }
}

/// Lays out and fills sheets of labels.
pub struct SheetCompositor {
    composer: LabelComposer,
    ids: Box<dyn IdSource + Send>,
}

impl SheetCompositor {
    /// Compositor with a validated config, a resolved font and random tracking ids.
    pub fn new(config: LabelConfig) -> Result<Self, LabelError> {
        let ids = RandomIds::from_config(&config.tracking);
        let composer = LabelComposer::new(config)?;
        Ok(Self::with_composer(composer, ids))
    }

    pub fn with_composer(composer: LabelComposer, ids: impl IdSource + Send + 'static) -> Self {
        Self {
            composer,
            ids: Box::new(ids),
        }
    }

    /// Replace the tracking id source.
    pub fn with_id_source(mut self, ids: impl IdSource + Send + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn composer(&self) -> &LabelComposer {
        &self.composer
    }

    pub fn config(&self) -> &LabelConfig {
        self.composer.config()
    }

    /// Grid for the current configuration.
    pub fn layout(&self) -> SheetLayout {
        SheetLayout::calculate(self.config())
    }

    /// Sheet canvas size in pixels.
    pub fn sheet_size(&self) -> (u32, u32) {
        let config = self.config();
        let scale = config.scale();
        (scale.px(config.paper.width), scale.px(config.paper.height))
    }

    /// Draw a fresh tracking id.
    pub fn next_tracking_id(&mut self) -> String {
        self.ids.next_id()
    }

    /// Compose a sheet.
    ///
    /// With `labels`, the given images are placed in order and any beyond the
    /// grid capacity are dropped. Without, `cols·rows` labels are generated
    /// from `text`, each with its own tracking id and a QR payload chosen by
    /// [`qr_payload_for`].
    pub fn generate_sheet(
        &mut self,
        labels: Option<Vec<LabelImage>>,
        text: &str,
        qr_payload: Option<&str>,
        qr_prefix: Option<&str>,
    ) -> Sheet {
        let layout = self.layout();
        let capacity = layout.capacity();
        let (width, height) = self.sheet_size();
        let mut image = GrayImage::from_pixel(width, height, Luma([PAPER]));

        let (images, generated, dropped, degradations) = match labels {
            Some(mut supplied) => {
                let dropped = supplied.len().saturating_sub(capacity);
                if dropped > 0 {
                    tracing::debug!(
                        supplied = supplied.len(),
                        capacity,
                        dropped,
                        "discarding labels beyond sheet capacity"
                    );
                }
                supplied.truncate(capacity);
                let generated = vec![None; supplied.len()];
                (supplied, generated, dropped, Vec::new())
            }
            None => {
                let plans: Vec<GeneratedLabel> = (0..capacity)
                    .map(|i| {
                        let tracking_id = self.ids.next_id();
                        let qr_payload = qr_payload_for(i, qr_prefix, qr_payload, &tracking_id);
                        GeneratedLabel {
                            tracking_id,
                            qr_payload,
                        }
                    })
                    .collect();

                let composer = &self.composer;
                let composed: Vec<ComposedLabel> = plans
                    .par_iter()
                    .map(|plan| {
                        composer.compose_label(
                            text,
                            Some(&plan.qr_payload),
                            Some(&plan.tracking_id),
                        )
                    })
                    .collect();

                let mut images = Vec::with_capacity(composed.len());
                let mut degradations = Vec::new();
                for label in composed {
                    degradations.extend(label.degradations);
                    images.push(label.image);
                }
                let generated = plans.into_iter().map(Some).collect();
                (images, generated, 0, degradations)
            }
        };

        let config = self.composer.config();
        let bounds = Rect::new(0, 0, width, height);
        let mut placed = Vec::with_capacity(images.len());
        for (index, (label, generated)) in images.iter().zip(generated).enumerate() {
            let (Some(cell), Some(origin)) = (layout.cell(index), layout.placement(config, index))
            else {
                break;
            };
            draw::paste(&mut image, label, origin.x, origin.y, bounds);
            let rect = Rect::new(
                origin.x,
                origin.y,
                label.width().min(width.saturating_sub(origin.x)),
                label.height().min(height.saturating_sub(origin.y)),
            );
            placed.push(PlacedLabel {
                index,
                cell,
                rect,
                generated,
            });
        }

        tracing::info!(
            cols = layout.cols,
            rows = layout.rows,
            placed = placed.len(),
            dropped,
            degraded = degradations.len(),
            "sheet composed"
        );

        Sheet {
            image,
            layout,
            placed,
            dropped,
            degradations,
        }
    }
}
