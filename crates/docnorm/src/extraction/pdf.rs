//! PDF text extraction.
//!
//! Documents are parsed from memory with `lopdf`; nothing touches the filesystem.
//! Each page's content stream is interpreted just far enough to know where every
//! string is drawn: the graphics state matrix (`q`, `Q`, `cm`), the text matrices
//! (`BT`, `Td`, `TD`, `Tm`, `T*`) and the show operators (`Tj`, `TJ`, `'`, `"`).
//! The positioned spans then go through layout analysis, which rebuilds lines,
//! columns and tables.

use super::layout::{LayoutConfig, TextSpan, analyze_lines, group_lines};
use crate::types::DocumentElement;
use crate::{DocnormError, Result};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Glyph width, in thousandths of an em, when the font does not say.
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;
const MONOSPACE_GLYPH_WIDTH: f32 = 600.0;

/// Line spacing as a multiple of the font size for `T*` without a `TL`.
const DEFAULT_LEADING: f32 = 1.2;

/// Extract the elements of a PDF held in memory.
///
/// # Errors
///
/// `ExtractionFailed` when the bytes are not a readable PDF, the document is
/// encrypted, or a page's content stream cannot be decoded.
pub fn extract_pdf_elements(content: &[u8], config: &LayoutConfig) -> Result<Vec<DocumentElement>> {
    let document = Document::load_mem(content)?;

    if document.is_encrypted() {
        return Err(DocnormError::extraction_failed(
            "encrypted PDF documents are not supported",
        ));
    }

    let pages = document.get_pages();
    tracing::debug!(pages = pages.len(), "parsed PDF document");

    let mut elements = Vec::new();
    for (page_number, page_id) in &pages {
        let spans = page_spans(&document, *page_id).map_err(|e| {
            DocnormError::extraction_failed_with_source(format!("failed to read text on page {}", page_number), e)
        })?;
        elements.extend(analyze_lines(&group_lines(spans), config));
    }

    Ok(elements)
}

fn page_spans(document: &Document, page_id: ObjectId) -> lopdf::Result<Vec<TextSpan>> {
    let fonts: HashMap<Vec<u8>, PageFont> = document
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, dict)| (name, PageFont::new(document, dict)))
        .collect();

    let content = Content::decode(&page_content(document, page_id)?)?;

    let mut state = TextState::default();
    let mut spans = Vec::new();

    for op in &content.operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => state.saved.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.saved.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(matrix) = Matrix::from_operands(operands) {
                    state.ctm = matrix.concat(&state.ctm);
                }
            }
            "BT" => {
                state.line = Matrix::IDENTITY;
                state.text = Matrix::IDENTITY;
            }
            "Tf" => {
                if let [Object::Name(name), size, ..] = operands {
                    state.font = Some(name.clone());
                    state.font_size = number(size).map_or(state.font_size, f32::abs);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands
                    && let (Some(tx), Some(ty)) = (number(tx), number(ty))
                {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(matrix) = Matrix::from_operands(operands) {
                    state.line = matrix;
                    state.text = matrix;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    state.show(document, &fonts, bytes, &mut spans);
                }
            }
            "'" => {
                state.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    state.show(document, &fonts, bytes, &mut spans);
                }
            }
            "\"" => {
                state.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    state.show(document, &fonts, bytes, &mut spans);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => state.show(document, &fonts, bytes, &mut spans),
                            other => {
                                // Positive adjustments pull the next glyph left.
                                if let Some(adjustment) = number(other) {
                                    state.advance(-adjustment / 1000.0 * state.font_size);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Concatenated, decompressed content streams of a page.
fn page_content(document: &Document, page_id: ObjectId) -> lopdf::Result<Vec<u8>> {
    let page = document.get_dictionary(page_id)?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    let streams: Vec<&Object> = match resolve(document, contents) {
        Object::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    let mut content = Vec::new();
    for object in streams {
        if let Object::Stream(stream) = resolve(document, object) {
            content.extend_from_slice(&stream.decompressed_content()?);
            content.push(b'\n');
        }
    }
    Ok(content)
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// A font resource of the page with the metrics needed to advance the text matrix.
struct PageFont<'a> {
    dict: &'a Dictionary,
    first_char: i64,
    widths: Vec<f32>,
    missing_width: f32,
    /// Type0 fonts use multi-byte codes; widths are approximated per character.
    composite: bool,
}

impl<'a> PageFont<'a> {
    fn new(document: &'a Document, dict: &'a Dictionary) -> Self {
        let monospace = dict
            .get(b"BaseFont")
            .and_then(|o| o.as_name())
            .is_ok_and(|name| name.starts_with(b"Courier"));

        let composite = dict
            .get(b"Subtype")
            .and_then(|o| o.as_name())
            .is_ok_and(|name| name == b"Type0");

        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(document, o).as_array().ok())
            .map(|items| items.iter().map(|w| number(w).unwrap_or(0.0)).collect())
            .unwrap_or_default();

        Self {
            dict,
            first_char: dict.get(b"FirstChar").and_then(|o| o.as_i64()).unwrap_or(0),
            widths,
            missing_width: if monospace {
                MONOSPACE_GLYPH_WIDTH
            } else {
                DEFAULT_GLYPH_WIDTH
            },
            composite,
        }
    }

    /// Advance of a shown string, in thousandths of an em.
    fn advance(&self, bytes: &[u8], decoded: &str) -> f32 {
        if self.composite || self.widths.is_empty() {
            return decoded.chars().count() as f32 * self.missing_width;
        }

        bytes
            .iter()
            .map(|&code| {
                usize::try_from(i64::from(code) - self.first_char)
                    .ok()
                    .and_then(|index| self.widths.get(index))
                    .copied()
                    .filter(|width| *width > 0.0)
                    .unwrap_or(self.missing_width)
            })
            .sum()
    }

    fn decode(&self, document: &Document, bytes: &[u8]) -> Option<String> {
        let encoding = self.dict.get_font_encoding(document).ok()?;
        Document::decode_text(&encoding, bytes).ok()
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Affine transform `[a b c d e f]` as used throughout PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let [a, b, c, d, e, f, ..] = operands else {
            return None;
        };
        Some(Self {
            a: number(a)?,
            b: number(b)?,
            c: number(c)?,
            d: number(d)?,
            e: number(e)?,
            f: number(f)?,
        })
    }

    /// `self × other`: apply `self`, then `other`.
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn translate(&self, tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..*self
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    line: Matrix,
    text: Matrix,
    font: Option<Vec<u8>>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            line: Matrix::IDENTITY,
            text: Matrix::IDENTITY,
            font: None,
            font_size: 12.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line = self.line.translate(tx, ty);
        self.text = self.line;
    }

    fn next_line(&mut self) {
        let leading = if self.leading == 0.0 {
            self.font_size * DEFAULT_LEADING
        } else {
            self.leading
        };
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, tx: f32) {
        self.text = self.text.translate(tx, 0.0);
    }

    fn show(&mut self, document: &Document, fonts: &HashMap<Vec<u8>, PageFont>, bytes: &[u8], spans: &mut Vec<TextSpan>) {
        let font = self.font.as_deref().and_then(|name| fonts.get(name));

        let text = font
            .and_then(|f| f.decode(document, bytes))
            .unwrap_or_else(|| decode_latin1(bytes));
        let em_advance = match font {
            Some(font) => font.advance(bytes, &text),
            None => text.chars().count() as f32 * DEFAULT_GLYPH_WIDTH,
        };
        let advance = em_advance / 1000.0 * self.font_size;

        let rendering = self.text.concat(&self.ctm);
        spans.push(TextSpan::new(
            text,
            rendering.e,
            rendering.f,
            advance * rendering.horizontal_scale(),
            self.font_size * rendering.vertical_scale(),
        ));

        self.advance(advance);
    }
}
