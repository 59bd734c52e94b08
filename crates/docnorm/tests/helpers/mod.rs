//! Shared fixtures for integration tests.
//!
//! Documents are built in memory so the tests never depend on files on disk.

#![allow(dead_code)]

use docnorm::plugins::{FormatExtractor, Plugin};
use docnorm::types::{DocumentElement, NormalizedDocument};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use zip::write::SimpleFileOptions;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// A DOCX package whose body is `body_xml`.
pub fn build_docx(body_xml: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}"><w:body>{body_xml}<w:sectPr/></w:body></w:document>"#
    );

    let content_types = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(content_types.as_bytes()).unwrap();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buffer.into_inner()
}

pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

pub fn heading(level: usize, text: &str) -> String {
    format!(r#"<w:p><w:pPr><w:pStyle w:val="Heading{level}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

/// A `w:tbl` whose first row is the header.
pub fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in *row {
            xml.push_str("<w:tc>");
            xml.push_str(&paragraph(cell));
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// A PDF with one page per entry, each showing one line of Courier text.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let pages = pages
        .iter()
        .map(|text| {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        })
        .collect();
    build_pdf_from_operations(pages)
}

pub const TABLE_LEFT: i64 = 72;
pub const TABLE_COLUMN_WIDTH: i64 = 144;
pub const TABLE_TOP: i64 = 700;
pub const TABLE_ROW_HEIGHT: i64 = 18;

/// One text object that places a title and every table cell with `Tm`.
pub fn matrix_positioned_table(title: &str, rows: &[&[&str]]) -> Vec<Operation> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new(
            "Tm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), TABLE_LEFT.into(), (TABLE_TOP + 40).into()],
        ),
        Operation::new("Tj", vec![Object::string_literal(title)]),
    ];

    for (row_index, row) in rows.iter().enumerate() {
        let y = TABLE_TOP - row_index as i64 * TABLE_ROW_HEIGHT;
        for (column_index, cell) in row.iter().enumerate() {
            let x = TABLE_LEFT + column_index as i64 * TABLE_COLUMN_WIDTH;
            operations.push(Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), y.into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*cell)]));
        }
    }

    operations.push(Operation::new("ET", vec![]));
    operations
}

/// One text object that walks the table cells with relative `Td` moves.
pub fn offset_positioned_table(rows: &[&[&str]]) -> Vec<Operation> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![TABLE_LEFT.into(), TABLE_TOP.into()]),
    ];

    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            let back = -(rows[row_index - 1].len().saturating_sub(1) as i64) * TABLE_COLUMN_WIDTH;
            operations.push(Operation::new("Td", vec![back.into(), (-TABLE_ROW_HEIGHT).into()]));
        }
        for (column_index, cell) in row.iter().enumerate() {
            if column_index > 0 {
                operations.push(Operation::new("Td", vec![TABLE_COLUMN_WIDTH.into(), 0.into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*cell)]));
        }
    }

    operations.push(Operation::new("ET", vec![]));
    operations
}

/// A PDF with one page per operation list, all drawn with a Courier font named `F1`.
pub fn build_pdf_from_operations(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Extractor that counts how often it runs.
pub struct CountingExtractor {
    pub calls: AtomicUsize,
    content_types: &'static [&'static str],
}

impl CountingExtractor {
    pub fn new(content_types: &'static [&'static str]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            content_types,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Plugin for CountingExtractor {
    fn name(&self) -> &str {
        "counting-extractor"
    }

    fn version(&self) -> String {
        "1.0.0".to_string()
    }

    fn initialize(&self) -> docnorm::Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> docnorm::Result<()> {
        Ok(())
    }
}

impl FormatExtractor for CountingExtractor {
    fn extract(&self, content: &[u8]) -> docnorm::Result<NormalizedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(NormalizedDocument::Elements(vec![DocumentElement::text(
            String::from_utf8_lossy(content).into_owned(),
        )]))
    }

    fn supported_content_types(&self) -> &[&str] {
        self.content_types
    }
}
