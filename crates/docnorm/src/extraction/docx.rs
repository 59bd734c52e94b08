//! DOCX body extraction.
//!
//! Reads `word/document.xml` straight out of the in-memory ZIP container and walks the
//! body in document order. Paragraphs become text runs and `w:tbl` elements become
//! tables, so a table keeps its position between the paragraphs around it.
//!
//! Element names are matched on their local part only; WordprocessingML producers
//! disagree on namespace prefixes but not on local names.

use crate::core::validation::MAX_PAYLOAD_BYTES;
use crate::types::{DocumentElement, Table};
use crate::{DocnormError, Result};
use roxmltree::{Document, Node};
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";

/// Largest `word/document.xml` accepted once inflated.
pub const MAX_DOCUMENT_XML_BYTES: u64 = MAX_PAYLOAD_BYTES as u64 * 4;

/// Word tables have at most 63 columns.
pub const MAX_TABLE_COLUMNS: usize = 63;

/// Extract the body elements of a DOCX package held in memory.
///
/// # Errors
///
/// `ExtractionFailed` when the container is not a ZIP archive, has no
/// `word/document.xml`, the part inflates beyond [`MAX_DOCUMENT_XML_BYTES`], or the
/// part is not well-formed XML.
pub fn extract_docx_elements(content: &[u8]) -> Result<Vec<DocumentElement>> {
    extract_with_limit(content, MAX_DOCUMENT_XML_BYTES)
}

fn extract_with_limit(content: &[u8], max_xml_bytes: u64) -> Result<Vec<DocumentElement>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(content))?;

    let mut xml_content = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut file) => {
            if file.size() > max_xml_bytes {
                return Err(document_part_too_large(max_xml_bytes));
            }
            // The declared size can lie; never inflate past the limit.
            file.by_ref()
                .take(max_xml_bytes + 1)
                .read_to_string(&mut xml_content)
                .map_err(|e| {
                    DocnormError::extraction_failed_with_source(format!("failed to read {}", DOCUMENT_PART), e)
                })?;
            if xml_content.len() as u64 > max_xml_bytes {
                return Err(document_part_too_large(max_xml_bytes));
            }
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocnormError::extraction_failed(format!(
                "not a DOCX document: missing {}",
                DOCUMENT_PART
            )));
        }
        Err(e) => return Err(e.into()),
    }

    let doc = Document::parse(&xml_content)?;

    let Some(body) = doc.root_element().children().find(|n| is(n, "body")) else {
        return Err(DocnormError::extraction_failed("DOCX document has no body"));
    };

    let mut elements = Vec::new();
    walk_block_container(body, &mut elements);
    Ok(elements)
}

fn document_part_too_large(limit: u64) -> DocnormError {
    DocnormError::extraction_failed(format!("{} inflates beyond {} bytes", DOCUMENT_PART, limit))
}

fn is(node: &Node, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}

fn attribute_local<'a>(node: &Node<'a, '_>, local_name: &str) -> Option<&'a str> {
    node.attributes().find(|a| a.name() == local_name).map(|a| a.value())
}

/// Walk block-level children (`w:body`, `w:sdtContent`) in order.
fn walk_block_container(container: Node, elements: &mut Vec<DocumentElement>) {
    for child in container.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "p" => elements.push(DocumentElement::text(paragraph_markdown(child))),
            "tbl" => {
                if let Some(table) = extract_table(child) {
                    elements.push(DocumentElement::Table(table));
                }
            }
            "sdt" => {
                if let Some(content) = child.children().find(|n| is(n, "sdtContent")) {
                    walk_block_container(content, elements);
                }
            }
            _ => {}
        }
    }
}

/// Paragraph text with a Markdown heading prefix for heading and title styles.
fn paragraph_markdown(paragraph: Node) -> String {
    let text = paragraph_text(paragraph);

    match heading_level(paragraph) {
        Some(level) if !text.trim().is_empty() => format!("{} {}", "#".repeat(level), text.trim()),
        _ => text,
    }
}

fn paragraph_text(paragraph: Node) -> String {
    let mut text = String::new();
    collect_text(paragraph, &mut text);
    text
}

fn collect_text(node: Node, text: &mut String) {
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "t" => {
                if let Some(value) = child.text() {
                    text.push_str(value);
                }
            }
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            "pPr" | "rPr" | "delText" | "instrText" => {}
            _ => collect_text(child, text),
        }
    }
}

fn heading_level(paragraph: Node) -> Option<usize> {
    let style = paragraph
        .children()
        .find(|n| is(n, "pPr"))?
        .children()
        .find(|n| is(n, "pStyle"))
        .and_then(|n| attribute_local(&n, "val"))?;

    if style.eq_ignore_ascii_case("title") {
        return Some(1);
    }

    let level = style
        .to_ascii_lowercase()
        .strip_prefix("heading")?
        .trim()
        .parse::<usize>()
        .ok()?;

    (1..=6).contains(&level).then_some(level)
}

fn extract_table(table: Node) -> Option<Table> {
    let mut rows = Vec::new();

    for row in table.children().filter(|n| is(n, "tr")) {
        let mut cells = Vec::new();

        for cell in row.children().filter(|n| is(n, "tc")) {
            cells.push(cell_text(cell));

            let padding = grid_span(cell) - 1;
            let room = MAX_TABLE_COLUMNS.saturating_sub(cells.len());
            cells.extend(std::iter::repeat_n(String::new(), padding.min(room)));
        }

        rows.push(fold_overflow(cells));
    }

    Table::from_ragged(rows)
}

/// All text of a cell, nested tables and content controls included, on one line.
fn cell_text(cell: Node) -> String {
    let mut pieces = Vec::new();
    collect_block_text(cell, &mut pieces);
    pieces.join(" ")
}

fn collect_block_text(container: Node, pieces: &mut Vec<String>) {
    for child in container.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "p" => {
                let text = paragraph_text(child);
                let text = text.trim();
                if !text.is_empty() {
                    pieces.push(text.to_string());
                }
            }
            "tbl" | "tr" | "tc" | "sdt" | "sdtContent" | "customXml" => collect_block_text(child, pieces),
            _ => {}
        }
    }
}

/// Cells past the last allowed column are merged into it.
fn fold_overflow(mut cells: Vec<String>) -> Vec<String> {
    if cells.len() <= MAX_TABLE_COLUMNS {
        return cells;
    }

    let overflow = cells.split_off(MAX_TABLE_COLUMNS - 1);
    let merged = overflow
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    cells.push(merged);
    cells
}

fn grid_span(cell: Node) -> usize {
    cell.children()
        .find(|n| is(n, "tcPr"))
        .and_then(|props| props.children().find(|n| is(n, "gridSpan")))
        .and_then(|span| attribute_local(&span, "val"))
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_TABLE_COLUMNS)
}
