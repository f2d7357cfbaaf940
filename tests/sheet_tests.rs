//! # End-to-End Tests
//!
//! Drive the public API the way the CLI does: load a configuration, compute
//! the grid, compose labels and sheets, and save them.
//!
//! Tracking numbers come from injected sources so every run is reproducible.

use image::{GrayImage, Luma};
use labelkit::label::LabelImage;
use labelkit::layout::Rect;
use labelkit::render::barcode::BarcodeRenderer;
use labelkit::render::draw::PAPER;
use labelkit::render::qr::{QrCodeRenderer, sample_modules};
use labelkit::render::Font;
use labelkit::tracking::{FixedIds, SeededIds};
use labelkit::{
    LabelComposer, LabelConfig, LabelError, RenderDegradation, SheetCompositor, SheetLayout,
    output,
};
use pretty_assertions::assert_eq;

const SCENARIO_JSON: &str = r#"{
    "dpi": 300,
    "unit": "mm",
    "paper": {"width": 210, "height": 297, "margin": 5, "gap": 2},
    "label": {"width": 50, "height": 30, "bleed": 1, "padding": 2, "corner_radius": 3},
    "text": {"font_path": "/nonexistent/NotoSansCJK-Regular.ttc", "font_size": 12},
    "qr": {"size": 20, "padding": 1}
}"#;

/// Same layout at 100 DPI, for tests that render whole sheets.
fn fast_config() -> LabelConfig {
    let mut config = LabelConfig::from_json_str(SCENARIO_JSON).unwrap();
    config.dpi = 100.0;
    config
}

fn composer(config: LabelConfig) -> LabelComposer {
    LabelComposer::new(config).unwrap().with_font(Font::builtin())
}

struct BrokenBarcode;

impl BarcodeRenderer for BrokenBarcode {
    fn render(&self, _digits: &str, _height: u32) -> Result<GrayImage, LabelError> {
        Err(LabelError::Render("encoder unavailable".to_string()))
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

#[test]
fn scenario_a4_layout() {
    let config = LabelConfig::from_json_str(SCENARIO_JSON).unwrap();
    let layout = SheetLayout::calculate(&config);
    assert_eq!(layout, SheetLayout { cols: 3, rows: 8 });
}

#[test]
fn preset_capacities() {
    let capacities: Vec<(String, usize)> = LabelConfig::preset_names()
        .iter()
        .map(|name| {
            let config = LabelConfig::preset(name).unwrap();
            (name.to_string(), SheetLayout::calculate(&config).capacity())
        })
        .collect();
    assert_eq!(
        capacities,
        vec![
            ("a4".to_string(), 24),
            // (176-10+2)/(62+2) = 2.6, (250-10+2)/(37+2) = 6.2
            ("b5".to_string(), 12),
            // (100-6+2)/(44+2) = 2.08, (150-6+2)/(27+2) = 5.03
            ("small".to_string(), 10),
        ]
    );
}

#[test]
fn placements_do_not_overlap() {
    let config = LabelConfig::from_json_str(SCENARIO_JSON).unwrap();
    let layout = SheetLayout::calculate(&config);
    let rects: Vec<Rect> = layout.placements(&config);
    for i in 0..rects.len() {
        for j in 0..rects.len() {
            if i != j {
                assert!(!rects[i].intersects(&rects[j]));
            }
        }
    }
}

// ============================================================================
// LABELS
// ============================================================================

#[test]
fn missing_font_falls_back() {
    // The configured path does not exist; resolution continues down the chain
    let config = LabelConfig::from_json_str(SCENARIO_JSON).unwrap();
    let composer = LabelComposer::new(config).unwrap();
    let label = composer.compose_label("明信片", Some("TRACK-A4-001"), Some("TRACK-A4-001"));
    assert_eq!(label.image.dimensions(), composer.canvas_size());
}

#[test]
fn label_is_reproducible_with_fixed_id() {
    let composer = composer(LabelConfig::from_json_str(SCENARIO_JSON).unwrap());
    let a = composer.compose_label("POSTCARD", Some("PC-1"), Some("TRK0000000001"));
    let b = composer.compose_label("POSTCARD", Some("PC-1"), Some("TRK0000000001"));
    assert_eq!(a.regions, b.regions);
    assert!(a.image == b.image);
}

#[test]
fn label_qr_carries_payload() {
    let composer = composer(LabelConfig::from_json_str(SCENARIO_JSON).unwrap());
    let payload = "https://example.com/p/42";
    let label = composer.compose_label("POSTCARD", Some(payload), Some("TRK0000000042"));
    let code = label.regions.qr_code.unwrap();
    let block =
        image::imageops::crop_imm(&label.image, code.x, code.y, code.width, code.height).to_image();

    let (width, expected) = QrCodeRenderer::default().modules(payload).unwrap();
    assert_eq!(sample_modules(&block, width), expected);
}

/// Decode every QR code found in `img` with an independent reader.
fn read_qr(img: &GrayImage) -> Vec<String> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| img.get_pixel(x as u32, y as u32).0[0],
    );
    prepared
        .detect_grids()
        .into_iter()
        .filter_map(|grid| grid.decode().ok())
        .map(|(_, content)| content)
        .collect()
}

fn crop_qr_block(label: &GrayImage, block: Rect) -> GrayImage {
    image::imageops::crop_imm(label, block.x, block.y, block.width, block.height).to_image()
}

#[test]
fn qr_block_decodes_with_independent_reader() {
    for dpi in [100.0, 203.0, 300.0] {
        let mut config = LabelConfig::from_json_str(SCENARIO_JSON).unwrap();
        config.dpi = dpi;
        let label = composer(config).compose_label("POSTCARD", Some("TRACK-A4-7"), Some("TRK0000000007"));
        assert!(!label.is_degraded());

        // qr.padding is the only quiet zone the reader gets
        let block = crop_qr_block(&label.image, label.regions.qr_block.unwrap());
        assert_eq!(read_qr(&block), vec!["TRACK-A4-7".to_string()], "dpi={}", dpi);
    }
}

#[test]
fn qr_block_without_padding_decodes_on_paper() {
    for dpi in [100.0, 203.0, 300.0] {
        let mut config = LabelConfig::from_json_str(SCENARIO_JSON).unwrap();
        config.dpi = dpi;
        config.qr.padding = 0.0;
        let label = composer(config).compose_label("POSTCARD", Some("TRACK-A4-7"), None);
        let block_rect = label.regions.qr_block.unwrap();
        assert_eq!(Some(block_rect), label.regions.qr_code);

        // Surround the bare code with blank paper, as on a printed sheet
        let block = crop_qr_block(&label.image, block_rect);
        let margin = block.width() / 4;
        let mut paper = GrayImage::from_pixel(
            block.width() + 2 * margin,
            block.height() + 2 * margin,
            Luma([PAPER]),
        );
        image::imageops::replace(&mut paper, &block, margin as i64, margin as i64);
        assert_eq!(read_qr(&paper), vec!["TRACK-A4-7".to_string()], "dpi={}", dpi);
    }
}

#[test]
fn scenario_barcode_failure_degrades_to_text() {
    let composer = composer(LabelConfig::from_json_str(SCENARIO_JSON).unwrap())
        .with_barcode_renderer(BrokenBarcode);
    let label = composer.compose_label("POSTCARD", None, Some("AB12"));

    assert_eq!(
        label.degradations,
        vec![RenderDegradation::BarcodeFallback {
            identifier: "AB12".to_string(),
            reason: "Render error: encoder unavailable".to_string(),
        }]
    );

    let area = label.regions.barcode;
    let inked = (area.y..area.bottom())
        .flat_map(|y| (area.x..area.right()).map(move |x| (x, y)))
        .any(|(x, y)| label.image.get_pixel(x, y).0[0] < 128);
    assert!(inked, "fallback text should be printed in the barcode area");
}

// ============================================================================
// SHEETS
// ============================================================================

#[test]
fn scenario_excess_labels_dropped() {
    let composer = composer(fast_config());
    let (w, h) = composer.canvas_size();
    let mut sheets = SheetCompositor::with_composer(composer, FixedIds::new(["TRK1"]));

    let labels: Vec<LabelImage> = (0..25)
        .map(|_| GrayImage::from_pixel(w, h, Luma([0])))
        .collect();
    let sheet = sheets.generate_sheet(Some(labels), "", None, None);

    assert_eq!(sheet.label_count(), 24);
    assert_eq!(sheet.dropped, 1);
}

#[test]
fn zero_capacity_sheet_is_blank() {
    let mut config = fast_config();
    config.paper.width = 40.0;
    let mut sheets = SheetCompositor::with_composer(composer(config), FixedIds::new(["TRK1"]));

    let sheet = sheets.generate_sheet(None, "POSTCARD", None, Some("TRACK"));
    assert_eq!(sheet.layout, SheetLayout { cols: 0, rows: 0 });
    assert_eq!(sheet.label_count(), 0);
    assert!(sheet.image.pixels().all(|p| p.0[0] == PAPER));
}

#[test]
fn seeded_sheets_match() {
    let make = |seed| {
        SheetCompositor::with_composer(composer(fast_config()), SeededIds::new("TRK", 10, seed))
    };
    let a = make(7).generate_sheet(None, "POSTCARD", None, None);
    let b = make(7).generate_sheet(None, "POSTCARD", None, None);
    assert!(a.image == b.image);
    assert_eq!(a.placed, b.placed);

    let ids: Vec<&str> = a
        .placed
        .iter()
        .map(|p| p.generated.as_ref().unwrap().tracking_id.as_str())
        .collect();
    assert_eq!(ids.len(), 24);
    assert!(ids.iter().all(|id| id.len() == 13 && id.starts_with("TRK")));
}

#[test]
fn default_ids_follow_tracking_config() {
    let mut config = fast_config();
    config.tracking.prefix = "PC".to_string();
    config.tracking.digits = 6;
    let mut sheets = SheetCompositor::new(config).unwrap();
    let id = sheets.next_tracking_id();
    assert_eq!(id.len(), 8);
    assert!(id.starts_with("PC"));
    assert!(id[2..].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn generated_labels_match_standalone_composition() {
    let config = fast_config();
    let standalone = composer(config.clone());
    let mut sheets =
        SheetCompositor::with_composer(composer(config), FixedIds::new(["TRK0000000009"]));
    let sheet = sheets.generate_sheet(None, "POSTCARD", None, Some("S"));

    let third = &sheet.placed[2];
    let expected = standalone
        .compose_label("POSTCARD", Some("S-3"), Some("TRK0000000009"))
        .image;
    let rect = third.rect;
    assert_eq!((rect.width, rect.height), expected.dimensions());
    for y in 0..rect.height {
        for x in 0..rect.width {
            assert_eq!(
                sheet.image.get_pixel(rect.x + x, rect.y + y),
                expected.get_pixel(x, y)
            );
        }
    }
}

#[test]
fn sheet_saved_as_png() {
    let dir = tempfile::tempdir().unwrap();
    let mut sheets =
        SheetCompositor::with_composer(composer(fast_config()), FixedIds::new(["TRK1"]));
    let sheet = sheets.generate_sheet(None, "POSTCARD", Some("https://example.com"), None);

    let path = dir.path().join("dist/a4_sheet.png");
    output::save_png(&sheet.image, &path).unwrap();
    let loaded = image::open(&path).unwrap().to_luma8();
    assert_eq!(loaded.dimensions(), sheet.image.dimensions());

    assert_eq!(output::clean_dir(dir.path().join("dist")).unwrap(), 1);
}
