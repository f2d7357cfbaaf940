//! # Labelkit - Printable Label Sheets
//!
//! Labelkit renders postcard and parcel labels with text, QR codes, and
//! barcodes, then tiles them onto a paper sheet. It provides:
//!
//! - **Unit conversion**: millimeter/centimeter lengths to pixels at any DPI
//! - **Label composition**: rounded border, title, tracking number, QR block, barcode
//! - **Sheet layout**: how many labels fit on a page, and where each one goes
//! - **Sheet composition**: generating or placing labels on the grid
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelkit::{LabelConfig, SheetCompositor, output};
//!
//! let config = LabelConfig::preset("a4").unwrap();
//! let mut sheets = SheetCompositor::new(config)?;
//!
//! let layout = sheets.layout();
//! println!("{} x {} = {} labels", layout.cols, layout.rows, layout.capacity());
//!
//! let sheet = sheets.generate_sheet(None, "POSTCARD", None, Some("TRACK-A4"));
//! output::save_png(&sheet.image, "dist/a4_sheet.png")?;
//!
//! # Ok::<(), labelkit::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Typed configuration and presets |
//! | [`units`] | Length to pixel conversion |
//! | [`layout`] | Sheet grid calculation |
//! | [`label`] | Single-label composer |
//! | [`sheet`] | Sheet compositor |
//! | [`tracking`] | Tracking number sources |
//! | [`render`] | Fonts, drawing, QR and barcode rendering |
//! | [`output`] | PNG output and directory cleanup |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod label;
pub mod layout;
pub mod output;
pub mod render;
pub mod sheet;
pub mod tracking;
pub mod units;

// Re-exports for convenience
pub use config::LabelConfig;
pub use error::LabelError;
pub use label::{ComposedLabel, LabelComposer, RenderDegradation};
pub use layout::SheetLayout;
pub use sheet::{Sheet, SheetCompositor};
