//! Drill sheet layout: one drill record to a sequence of drawing calls.
//!
//! The layout walks the drill top to bottom — title banner, drill name, tag
//! summary, description, coaching points, diagrams, skills focus — moving a
//! cursor down the page and inserting page breaks when a block would not
//! fit. It only talks to the [`SheetBackend`] trait, so the same layout is
//! exercised by the mock in tests and by the PDF backend in production.
//!
//! Text wrapping uses an average-glyph-width estimate rather than real font
//! metrics. For a coaching handout that is plenty; lines land a little short
//! of the right margin rather than past it.

use super::backend::{load_sheet_image, ExportError, SheetBackend, TextStyle};
use crate::filter::format_tag_label;
use crate::types::{DrillRecord, TagCategory};
use std::path::Path;

const MARGIN: f32 = 56.0;
const IMAGE_HEIGHT: f32 = 170.0;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

const TITLE: TextStyle = TextStyle::bold(24.0);
const NAME: TextStyle = TextStyle::bold(16.0);
const HEADING: TextStyle = TextStyle::bold(14.0);
const BODY: TextStyle = TextStyle::regular(10.0);
const BODY_BOLD: TextStyle = TextStyle::bold(10.0);
const CAPTION: TextStyle = TextStyle::regular(9.0);

/// Estimated rendered width of a line, in points.
fn est_width(line: &str, style: TextStyle) -> f32 {
    line.chars().count() as f32 * style.size * GLYPH_WIDTH
}

/// Greedy word wrap against an estimated column budget. Words longer than
/// the budget are hard-split so the function is total.
fn wrap_text(text: &str, style: TextStyle, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / (style.size * GLYPH_WIDTH)) as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        // Hard-split oversized words
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cursor-driven writer over a [`SheetBackend`].
struct SheetWriter<'a, B: SheetBackend> {
    backend: &'a mut B,
    y: f32,
}

impl<'a, B: SheetBackend> SheetWriter<'a, B> {
    fn new(backend: &'a mut B) -> Self {
        Self { backend, y: MARGIN }
    }

    fn content_width(&self) -> f32 {
        self.backend.page_width() - 2.0 * MARGIN
    }

    /// Break the page unless `height` more points fit above the bottom margin.
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > self.backend.page_height() - MARGIN {
            self.backend.add_page();
            self.y = MARGIN;
        }
    }

    /// Draw one line at `x` and advance the cursor.
    fn line_at(&mut self, text: &str, x: f32, style: TextStyle) {
        let line_height = style.size * 1.3;
        self.ensure_room(line_height);
        self.y += style.size;
        self.backend.text(text, x, self.y, style);
        self.y += line_height - style.size;
    }

    fn line(&mut self, text: &str, style: TextStyle) {
        self.line_at(text, MARGIN, style);
    }

    fn centered_line(&mut self, text: &str, style: TextStyle) {
        let x = ((self.backend.page_width() - est_width(text, style)) / 2.0).max(MARGIN);
        self.line_at(text, x, style);
    }

    /// Wrap `text` into the column starting at `x` and draw every line.
    fn paragraph_at(&mut self, text: &str, x: f32, style: TextStyle) {
        let width = self.backend.page_width() - MARGIN - x;
        for line in wrap_text(text, style, width) {
            self.line_at(&line, x, style);
        }
    }

    fn paragraph(&mut self, text: &str, style: TextStyle) {
        self.paragraph_at(text, MARGIN, style);
    }

    fn gap(&mut self, points: f32) {
        self.y += points;
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(HEADING.size * 4.0); // keep headings with some body
        self.line(text, HEADING);
        self.gap(2.0);
    }
}

/// Display form of a tag value list: `["mite", "squirt"]` → "Mite, Squirt".
fn tag_list(drill: &DrillRecord, category: TagCategory) -> String {
    drill
        .tag_values(category)
        .iter()
        .map(|v| format_tag_label(v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one drill onto `backend`. `drill_assets_dir` is the staged folder
/// holding the drill's image files.
///
/// Per-image load failures degrade to a labeled placeholder box; only
/// backend failures abort the export.
pub fn render_sheet<B: SheetBackend>(
    drill: &DrillRecord,
    drill_assets_dir: &Path,
    backend: &mut B,
) -> Result<(), ExportError> {
    let mut sheet = SheetWriter::new(backend);

    sheet.centered_line("DRILLS", TITLE);
    sheet.gap(10.0);

    sheet.paragraph(&drill.name, NAME);
    sheet.gap(5.0);

    for (label, category) in [
        ("Age Group", TagCategory::AgeLevel),
        ("Skill Level", TagCategory::SkillLevel),
        ("Equipment Needed", TagCategory::Equipment),
    ] {
        if !drill.tag_values(category).is_empty() {
            sheet.line(&format!("{label}: {}", tag_list(drill, category)), BODY);
        }
    }
    sheet.gap(8.0);

    sheet.heading("Description");
    sheet.paragraph(&drill.description, BODY);
    sheet.gap(8.0);

    sheet.heading("Coaching Points");
    for point in &drill.coaching_points {
        sheet.paragraph_at(&format!("\u{2022} {point}"), MARGIN + 8.0, BODY);
        sheet.gap(2.0);
    }
    sheet.gap(5.0);

    for (index, image_name) in drill.images.iter().enumerate() {
        sheet.ensure_room(IMAGE_HEIGHT + 16.0);
        let width = sheet.content_width();
        match load_sheet_image(&drill_assets_dir.join(image_name)) {
            Ok(image) => {
                let y = sheet.y;
                sheet
                    .backend
                    .image(&image, MARGIN, y, width, IMAGE_HEIGHT)?;
                sheet.y += IMAGE_HEIGHT;
                sheet.gap(4.0);
                sheet.centered_line(&format!("Drill diagram {}", index + 1), CAPTION);
            }
            Err(_) => {
                let y = sheet.y;
                sheet.backend.placeholder_box(MARGIN, y, width, IMAGE_HEIGHT);
                let label = format!("Drill diagram {} (unavailable)", index + 1);
                let x = ((sheet.backend.page_width() - est_width(&label, CAPTION)) / 2.0)
                    .max(MARGIN);
                sheet.backend.text(&label, x, y + IMAGE_HEIGHT / 2.0, CAPTION);
                sheet.y += IMAGE_HEIGHT;
            }
        }
        sheet.gap(8.0);
    }

    let has_fundamental = !drill.tag_values(TagCategory::FundamentalSkill).is_empty();
    let has_skating = !drill.tag_values(TagCategory::SkatingSkill).is_empty();
    if has_fundamental || has_skating {
        sheet.gap(5.0);
        sheet.heading("Skills Focus");

        if has_fundamental {
            sheet.line("Fundamental Skills:", BODY_BOLD);
            for skill in drill.tag_values(TagCategory::FundamentalSkill) {
                sheet.line_at(
                    &format!("\u{2022} {}", format_tag_label(skill)),
                    MARGIN + 8.0,
                    BODY,
                );
            }
            sheet.gap(3.0);
        }
        if has_skating {
            sheet.line("Skating Skills:", BODY_BOLD);
            for skill in drill.tag_values(TagCategory::SkatingSkill) {
                sheet.line_at(
                    &format!("\u{2022} {}", format_tag_label(skill)),
                    MARGIN + 8.0,
                    BODY,
                );
            }
        }
    }

    Ok(())
}

/// Strip characters that are unsafe in download file names.
///
/// `< > : " / \ | ? *` become underscores, whitespace runs collapse to a
/// single space, the result is trimmed, and underscore runs collapse to one.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect();

    let spaced = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(spaced.len());
    let mut last_was_underscore = false;
    for c in spaced.chars() {
        if c == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        out.push(c);
    }
    out
}

/// Download file name for an exported drill sheet.
pub fn export_file_name(drill_name: &str) -> String {
    format!("{}.pdf", sanitize_file_name(drill_name))
}
