//! PDF rendering for plan documents, built on `printpdf`.
//!
//! A4 pages with the built-in Helvetica fonts, greedy word wrapping and
//! automatic page breaks. Positions are laid out top-down in millimetres and
//! flipped to PDF's bottom-left origin when drawn.

use chrono::{Local, NaiveDateTime};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use super::{DocumentRenderer, ExportError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
const TITLE_LINE: f32 = 10.0;
const STAMP_SIZE: f32 = 10.0;
const STAMP_LINE: f32 = 8.0;
const HEADER_GAP: f32 = 4.0;
const BODY_SIZE: f32 = 12.0;
const BODY_LINE: f32 = 8.0;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Average Helvetica glyph width as a fraction of the font size. Slightly
/// generous so wrapped lines stay inside the margin.
const AVG_GLYPH_WIDTH: f32 = 0.52;

const LAYER: &str = "Plan";

/// Renders plan text as a titled, timestamped PDF.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    title: String,
    exported_at: NaiveDateTime,
}

impl PdfRenderer {
    pub fn new(exported_at: NaiveDateTime) -> Self {
        Self {
            title: "SMART Habit Plan".to_string(),
            exported_at,
        }
    }

    /// A renderer stamped with the current local time.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn stamp(&self) -> String {
        format!("Exported {}", self.exported_at.format("%Y-%m-%d %H:%M"))
    }

    /// Split the document into pages of positioned lines.
    fn layout(&self, text: &str) -> Vec<Vec<TextLine>> {
        let mut pages: Vec<Vec<TextLine>> = vec![Vec::new()];
        let mut cursor = MARGIN;

        let mut place = |pages: &mut Vec<Vec<TextLine>>, font: Font, size: f32, height: f32, text: String| {
            if cursor + height > PAGE_HEIGHT - BOTTOM_MARGIN {
                pages.push(Vec::new());
                cursor = MARGIN;
            }
            let baseline = PAGE_HEIGHT - cursor - (height + size * MM_PER_PT * 0.7) / 2.0;
            if let Some(page) = pages.last_mut() {
                page.push(TextLine {
                    font,
                    size,
                    y: baseline,
                    text,
                });
            }
            cursor += height;
        };

        place(&mut pages, Font::Bold, TITLE_SIZE, TITLE_LINE, self.title.clone());
        place(&mut pages, Font::Regular, STAMP_SIZE, STAMP_LINE + HEADER_GAP, self.stamp());

        let glyph = BODY_SIZE * MM_PER_PT * AVG_GLYPH_WIDTH;
        let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / glyph) as usize;
        for line in text.lines() {
            for wrapped in wrap(line, max_chars) {
                place(&mut pages, Font::Regular, BODY_SIZE, BODY_LINE, wrapped);
            }
        }
        pages
    }
}

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &str {
        "pdf"
    }

    fn render(&self, text: &str) -> Result<Vec<u8>, ExportError> {
        let pages = self.layout(text);
        let (doc, first_page, first_layer) =
            PdfDocument::new(self.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);

        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_error)?;
        for (i, lines) in pages.iter().enumerate() {
            let (page, layer) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER)
            };
            let layer = doc.get_page(page).get_layer(layer);
            for line in lines {
                let font: &IndirectFontRef = match line.font {
                    Font::Regular => &regular,
                    Font::Bold => &bold,
                };
                layer.use_text(
                    line.text.as_str(),
                    line.size,
                    Mm(MARGIN),
                    Mm(line.y),
                    font,
                );
            }
        }

        tracing::debug!(pages = pages.len(), "rendered PDF");
        doc.save_to_bytes().map_err(render_error)
    }
}

fn render_error(e: printpdf::Error) -> ExportError {
    ExportError::Render(e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone)]
struct TextLine {
    font: Font,
    size: f32,
    /// Baseline height above the bottom edge, in millimetres.
    y: f32,
    text: String,
}

/// Greedy word wrap to `max_chars` per line. Words longer than a line are
/// split. A blank input line stays one blank line.
fn wrap(line: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
