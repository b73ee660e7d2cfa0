//! Printable drill sheet export.
//!
//! Splits into three pieces:
//!
//! - [`backend`] — the [`SheetBackend`](backend::SheetBackend) drawing trait
//!   plus image loading for embeds
//! - [`layout`] — walks a [`DrillRecord`](crate::types::DrillRecord) and
//!   emits drawing calls; owns wrapping, page breaks, and the download file
//!   name rules
//! - [`pdf`] — the production `lopdf` backend
//!
//! The trait seam keeps layout logic testable without parsing PDF output.

pub mod backend;
pub mod layout;
pub mod pdf;

pub use backend::{AssetLoadError, ExportError, SheetBackend};
pub use layout::{export_file_name, render_sheet, sanitize_file_name};
pub use pdf::PdfBackend;
