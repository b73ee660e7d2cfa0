//! Sheet drawing backend trait and shared types.
//!
//! The [`SheetBackend`] trait is the opaque drawing API the layout engine
//! targets: styled text lines, placeholder boxes, raster images, and page
//! breaks. The production implementation is
//! [`PdfBackend`](super::pdf::PdfBackend); tests drive the layout against a
//! mock that records operations without producing a document.
//!
//! Coordinates are in points with the origin at the top-left of the page,
//! matching how the layout cursor moves. Backends translate to their native
//! coordinate system.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// An image referenced by a drill failed to load for embedding.
///
/// Always recovered locally: the layout substitutes a labeled placeholder
/// block and continues. A single bad diagram never aborts an export.
#[derive(Error, Debug)]
pub enum AssetLoadError {
    #[error("image file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// The document-generation step itself failed. Surfaced to the user as a
/// whole-export failure; no partial output is offered.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sheet rendering failed: {0}")]
    Backend(String),
}

/// Text styling for a drawn line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    pub bold: bool,
}

impl TextStyle {
    pub const fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }
}

/// A decoded raster image ready for placement: tightly packed RGB8.
#[derive(Clone)]
pub struct SheetImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for SheetImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Decode an image file into RGB8 pixels for embedding.
pub fn load_sheet_image(path: &Path) -> Result<SheetImage, AssetLoadError> {
    if !path.is_file() {
        return Err(AssetLoadError::Missing(path.to_path_buf()));
    }
    let data = std::fs::read(path).map_err(|source| AssetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&data).map_err(|e| AssetLoadError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgb = decoded.to_rgb8();
    Ok(SheetImage {
        width: rgb.width(),
        height: rgb.height(),
        pixels: rgb.into_raw(),
    })
}

/// Drawing surface for one exported drill sheet.
///
/// Backends start with a single blank page; [`add_page`](Self::add_page)
/// appends a fresh one and makes it current. All draw calls target the
/// current page.
pub trait SheetBackend {
    /// Page width in points.
    fn page_width(&self) -> f32;

    /// Page height in points.
    fn page_height(&self) -> f32;

    /// Append a blank page and make it the draw target.
    fn add_page(&mut self);

    /// Draw one line of text with its baseline `y` points from the page top.
    fn text(&mut self, line: &str, x: f32, y: f32, style: TextStyle);

    /// Draw a light filled/outlined box (image placeholder).
    fn placeholder_box(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Place a decoded image with its top-left corner at `(x, y)`.
    fn image(
        &mut self,
        image: &SheetImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), ExportError>;
}
