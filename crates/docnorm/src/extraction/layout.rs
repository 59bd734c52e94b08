//! Position-based layout analysis for PDF page text.
//!
//! A page arrives as positioned text spans. Spans are grouped into lines by baseline,
//! lines are split into cells wherever the horizontal gap between spans is wide
//! enough to be a column gutter, and vertical gaps larger than normal line spacing
//! end a paragraph.
//!
//! Tables are then recovered from the lines:
//!
//! - A run of at least `min_table_rows` consecutive lines with the same cell count
//!   (two or more) becomes a table whose first line is the header.
//! - Everything else is grouped into paragraphs.

use crate::types::{DocumentElement, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// Tabs or runs of spaces inside one span still separate columns.
static CELL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t+| {2,}").expect("cell separator pattern is valid"));

const MIN_TABLE_COLUMNS: usize = 2;

/// Minimum horizontal gap between two spans, in points, for a column break.
pub const MIN_COLUMN_GAP: f32 = 15.0;

/// Baselines closer than this fraction of the font size share a line.
const LINE_TOLERANCE: f32 = 0.3;

/// Gap between spans, as a fraction of the font size, that reads as a word space.
const WORD_GAP: f32 = 0.15;

/// Baseline distance, as a multiple of the font size, that ends a paragraph.
const PARAGRAPH_GAP: f32 = 1.8;

/// Layout analysis configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Whether aligned runs of lines are turned into tables.
    pub detect_tables: bool,
    /// Minimum number of lines, header included, for a run to count as a table.
    pub min_table_rows: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            detect_tables: true,
            min_table_rows: 2,
        }
    }
}

/// A run of text at a known position in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Left edge.
    pub x: f32,
    /// Baseline; grows upwards.
    pub y: f32,
    /// Advance width of the whole run.
    pub width: f32,
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// One visual line split into cells. A line without cells is a paragraph break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLine {
    pub cells: Vec<String>,
}

impl PageLine {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }

    /// The line as running text.
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }
}

/// Group positioned spans into lines in reading order.
///
/// Lines run top to bottom and cells left to right. A blank [`PageLine`] is inserted
/// where the distance between baselines is larger than ordinary line spacing.
pub fn group_lines(mut spans: Vec<TextSpan>) -> Vec<PageLine> {
    spans.retain(|span| !span.text.trim().is_empty());
    spans.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal));

    let mut rows: Vec<Vec<TextSpan>> = Vec::new();
    for span in spans {
        match rows.last_mut() {
            Some(row) if (row[0].y - span.y).abs() <= row[0].font_size.max(span.font_size) * LINE_TOLERANCE => {
                row.push(span);
            }
            _ => rows.push(vec![span]),
        }
    }

    let mut lines = Vec::new();
    let mut previous: Option<(f32, f32)> = None;

    for mut row in rows {
        // Stable sort keeps content-stream order for spans that share an x position.
        row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        let y = row[0].y;
        let size = row.iter().map(|s| s.font_size).fold(0.0_f32, f32::max);
        if let Some((previous_y, previous_size)) = previous
            && previous_y - y > previous_size.max(size) * PARAGRAPH_GAP
        {
            lines.push(PageLine::default());
        }
        previous = Some((y, size));

        let line = split_row(&row);
        if !line.is_blank() {
            lines.push(line);
        }
    }

    lines
}

fn split_row(row: &[TextSpan]) -> PageLine {
    let mut cells: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous_right: Option<f32> = None;

    for span in row {
        if let Some(right) = previous_right {
            let gap = span.x - right;
            if gap >= MIN_COLUMN_GAP {
                push_cell(&mut cells, &mut current);
            } else if gap > span.font_size * WORD_GAP && !current.ends_with(' ') && !span.text.starts_with(' ') {
                current.push(' ');
            }
        }

        let mut pieces = CELL_SEPARATOR.split(&span.text);
        if let Some(first) = pieces.next() {
            current.push_str(first);
        }
        for piece in pieces {
            push_cell(&mut cells, &mut current);
            current.push_str(piece);
        }

        previous_right = Some(previous_right.map_or(span.right(), |right| right.max(span.right())));
    }
    push_cell(&mut cells, &mut current);

    PageLine::new(cells)
}

fn push_cell(cells: &mut Vec<String>, current: &mut String) {
    let cell = current.trim();
    if !cell.is_empty() {
        cells.push(cell.to_string());
    }
    current.clear();
}

/// Turn the lines of one page into paragraphs and tables, in reading order.
pub fn analyze_lines(lines: &[PageLine], config: &LayoutConfig) -> Vec<DocumentElement> {
    let min_rows = config.min_table_rows.max(1);

    let mut elements = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = &lines[index];

        if line.is_blank() {
            flush_paragraph(&mut paragraph, &mut elements);
            index += 1;
            continue;
        }

        if config.detect_tables {
            let rows = table_run(&lines[index..]);
            if rows.len() >= min_rows {
                flush_paragraph(&mut paragraph, &mut elements);
                index += rows.len();
                if let Some(table) = Table::from_ragged(rows) {
                    elements.push(DocumentElement::Table(table));
                }
                continue;
            }
        }

        paragraph.push(line.text());
        index += 1;
    }

    flush_paragraph(&mut paragraph, &mut elements);
    elements
}

/// Longest prefix of `lines` with the same number of cells.
fn table_run(lines: &[PageLine]) -> Vec<Vec<String>> {
    let Some(first) = lines.first() else {
        return Vec::new();
    };

    let width = first.cells.len();
    if width < MIN_TABLE_COLUMNS {
        return Vec::new();
    }

    lines
        .iter()
        .take_while(|line| line.cells.len() == width)
        .map(|line| line.cells.clone())
        .collect()
}

fn flush_paragraph(paragraph: &mut Vec<String>, elements: &mut Vec<DocumentElement>) {
    if paragraph.is_empty() {
        return;
    }
    elements.push(DocumentElement::text(paragraph.join("\n")));
    paragraph.clear();
}
