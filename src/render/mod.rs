//! # Rendering Module
//!
//! Raster building blocks used by the label composer.
//!
//! ## Modules
//!
//! - [`draw`]: Rectangles, rules, quarter arcs, rounded borders, opaque paste
//! - [`font`]: Font fallback chain and text drawing
//! - [`qr`]: QR code rendering
//! - [`barcode`]: Code 128 barcode rendering
//!
//! QR and barcode rendering sit behind the [`QrRenderer`] and
//! [`BarcodeRenderer`] traits so callers can swap in their own encoders.

pub mod barcode;
pub mod draw;
pub mod font;
pub mod qr;

pub use barcode::{BarcodeRenderer, Code128Renderer};
pub use font::{Font, FontSource};
pub use qr::{QrCodeRenderer, QrRenderer};
