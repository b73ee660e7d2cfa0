//! PDF implementation of the sheet drawing backend, built on `lopdf`.
//!
//! One A4 page tree, Helvetica/Helvetica-Bold from the base-14 set (nothing
//! to embed), WinAnsi text encoding, and images as uncompressed RGB
//! XObjects. Draw calls accumulate per-page operation lists;
//! [`PdfBackend::finish`] assembles the document and returns the bytes.

use super::backend::{ExportError, SheetBackend, SheetImage, TextStyle};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

const A4_WIDTH: f32 = 595.28;
const A4_HEIGHT: f32 = 841.89;

/// Accumulated draw state for one page.
#[derive(Default)]
struct PageDraft {
    ops: Vec<Operation>,
    xobjects: Vec<(String, ObjectId)>,
}

pub struct PdfBackend {
    doc: Document,
    pages_id: ObjectId,
    font_regular: ObjectId,
    font_bold: ObjectId,
    pages: Vec<PageDraft>,
    image_count: usize,
}

impl PdfBackend {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        Self {
            doc,
            pages_id,
            font_regular,
            font_bold,
            pages: vec![PageDraft::default()],
            image_count: 0,
        }
    }

    fn current(&mut self) -> &mut PageDraft {
        self.pages.last_mut().expect("at least one page draft")
    }

    /// Assemble the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        let mut page_ids = Vec::with_capacity(self.pages.len());
        let drafts = std::mem::take(&mut self.pages);

        for draft in drafts {
            let content = Content {
                operations: draft.ops,
            };
            let encoded = content
                .encode()
                .map_err(|e| ExportError::Backend(e.to_string()))?;
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

            let mut fonts = Dictionary::new();
            fonts.set("F1", self.font_regular);
            fonts.set("F2", self.font_bold);
            let mut resources = Dictionary::new();
            resources.set("Font", fonts);
            if !draft.xobjects.is_empty() {
                let mut xobjects = Dictionary::new();
                for (name, id) in draft.xobjects {
                    xobjects.set(name, id);
                }
                resources.set("XObject", xobjects);
            }

            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "Contents" => content_id,
                "Resources" => resources,
                "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH.into(), A4_HEIGHT.into()],
            });
            page_ids.push(page_id);
        }

        let count = page_ids.len() as i64;
        let kids: Vec<Object> = page_ids.into_iter().map(Object::Reference).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| ExportError::Backend(e.to_string()))?;
        Ok(bytes)
    }
}

impl Default for PdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode text as WinAnsi (CP1252). ASCII passes through; the typographic
/// characters the layout emits get their CP1252 bytes; anything else
/// degrades to '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            c if (c as u32) < 0x80 => c as u8,
            c if (c as u32) >= 0xa0 && (c as u32) <= 0xff => c as u8,
            _ => b'?',
        })
        .collect()
}

impl SheetBackend for PdfBackend {
    fn page_width(&self) -> f32 {
        A4_WIDTH
    }

    fn page_height(&self) -> f32 {
        A4_HEIGHT
    }

    fn add_page(&mut self) {
        self.pages.push(PageDraft::default());
    }

    fn text(&mut self, line: &str, x: f32, y: f32, style: TextStyle) {
        let font: Object = if style.bold { "F2".into() } else { "F1".into() };
        let baseline = A4_HEIGHT - y;
        let encoded = encode_win_ansi(line);
        let ops = &mut self.current().ops;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font, style.size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, lopdf::StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn placeholder_box(&mut self, x: f32, y: f32, width: f32, height: f32) {
        // Top-left origin in, bottom-left origin out
        let bottom = A4_HEIGHT - y - height;
        let ops = &mut self.current().ops;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "RG",
            vec![0.78f32.into(), 0.78f32.into(), 0.78f32.into()],
        ));
        ops.push(Operation::new(
            "rg",
            vec![0.94f32.into(), 0.94f32.into(), 0.94f32.into()],
        ));
        ops.push(Operation::new(
            "re",
            vec![x.into(), bottom.into(), width.into(), height.into()],
        ));
        ops.push(Operation::new("B", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    fn image(
        &mut self,
        image: &SheetImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), ExportError> {
        let expected = image.width as usize * image.height as usize * 3;
        if image.pixels.len() != expected {
            return Err(ExportError::Backend(format!(
                "image buffer is {} bytes, expected {expected} for {}x{} RGB",
                image.pixels.len(),
                image.width,
                image.height
            )));
        }

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.pixels.clone(),
        );
        let xobject_id = self.doc.add_object(stream);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let bottom = A4_HEIGHT - y - height;

        let draft = self.current();
        draft.xobjects.push((name.clone(), xobject_id));
        draft.ops.push(Operation::new("q", vec![]));
        draft.ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                bottom.into(),
            ],
        ));
        draft
            .ops
            .push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        draft.ops.push(Operation::new("Q", vec![]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::layout::render_sheet;
    use crate::test_helpers::drill_with_tags;
    use crate::types::TagCategory;
    use tempfile::TempDir;

    #[test]
    fn produces_a_parsable_pdf() {
        let tmp = TempDir::new().unwrap();
        let drill = drill_with_tags("glove-saves", &[(TagCategory::AgeLevel, &["mite"])]);

        let mut backend = PdfBackend::new();
        render_sheet(&drill, tmp.path(), &mut backend).unwrap();
        let bytes = backend.finish().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn embedded_image_lands_in_page_resources() {
        let tmp = TempDir::new().unwrap();
        let png = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 60, 130]));
        png.save(tmp.path().join("diagram.png")).unwrap();

        let mut drill = drill_with_tags("with-image", &[]);
        drill.images = vec!["diagram.png".to_string()];

        let mut backend = PdfBackend::new();
        render_sheet(&drill, tmp.path(), &mut backend).unwrap();
        let bytes = backend.finish().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let found = doc.objects.values().any(|obj| {
            obj.as_stream()
                .ok()
                .and_then(|s| s.dict.get(b"Subtype").ok())
                .and_then(|o| o.as_name().ok())
                .is_some_and(|n| n == b"Image")
        });
        assert!(found, "no image XObject in document");
    }

    #[test]
    fn page_breaks_produce_multiple_pages() {
        let tmp = TempDir::new().unwrap();
        let mut drill = drill_with_tags("long", &[]);
        drill.coaching_points = (0..200).map(|i| format!("Point {i}")).collect();

        let mut backend = PdfBackend::new();
        render_sheet(&drill, tmp.path(), &mut backend).unwrap();
        let bytes = backend.finish().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn win_ansi_maps_bullet_and_falls_back() {
        assert_eq!(encode_win_ansi("\u{2022} ok"), vec![0x95, b' ', b'o', b'k']);
        assert_eq!(encode_win_ansi("\u{4e16}"), vec![b'?']);
    }

    #[test]
    fn mismatched_pixel_buffer_rejected() {
        let bad = SheetImage {
            width: 4,
            height: 4,
            pixels: vec![0; 7],
        };
        let mut backend = PdfBackend::new();
        assert!(backend.image(&bad, 0.0, 0.0, 10.0, 10.0).is_err());
    }
}
