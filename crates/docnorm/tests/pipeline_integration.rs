//! End-to-end tests for the normalization pipeline.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use docnorm::{
    DOCX_MIME_TYPE, DocnormConfig, DocnormError, DocumentRequest, FormatExtractorRegistry, MAX_PAYLOAD_BYTES,
    NormalizationPipeline, PDF_MIME_TYPE, PLAIN_TEXT_MIME_TYPE,
};
use lopdf::Object;
use lopdf::content::Operation;
use std::sync::Arc;

mod helpers;

use helpers::{
    CountingExtractor, build_docx, build_pdf, build_pdf_from_operations, heading, matrix_positioned_table,
    offset_positioned_table, paragraph, table,
};

fn default_pipeline() -> NormalizationPipeline {
    NormalizationPipeline::with_defaults(&DocnormConfig::default()).unwrap()
}

fn sanitize_raw(pipeline: &NormalizationPipeline, payload: &[u8], content_type: &str) -> docnorm::Result<String> {
    pipeline
        .sanitize(&DocumentRequest::new(payload.to_vec(), content_type))
        .map(|result| result.markdown)
}

#[test]
fn test_docx_table_renders_exactly() {
    let body = format!(
        "{}{}{}",
        paragraph("Inventory"),
        table(&[&["a", "b"], &["1", "2"], &["3", "4"]]),
        paragraph("End")
    );
    let docx = build_docx(&body);

    let markdown = sanitize_raw(&default_pipeline(), &docx, DOCX_MIME_TYPE).unwrap();

    assert_eq!(
        markdown,
        "Inventory\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n\n---\n\nEnd"
    );
}

#[test]
fn test_docx_headings_and_paragraphs() {
    let body = format!("{}{}", heading(1, "Summary"), paragraph("All systems nominal."));
    let markdown = sanitize_raw(&default_pipeline(), &build_docx(&body), DOCX_MIME_TYPE).unwrap();
    assert_eq!(markdown, "# Summary\n\nAll systems nominal.");
}

#[test]
fn test_docx_via_base64_envelope() {
    let docx = build_docx(&paragraph("encoded"));
    let request = DocumentRequest::base64(STANDARD.encode(&docx), DOCX_MIME_TYPE);
    let result = default_pipeline().sanitize(&request).unwrap();
    assert_eq!(result.markdown, "encoded");
}

#[test]
fn test_pdf_text_is_extracted() {
    let pdf = build_pdf(&["Quarterly revenue summary"]);
    let markdown = sanitize_raw(&default_pipeline(), &pdf, PDF_MIME_TYPE).unwrap();
    assert!(markdown.contains("Quarterly revenue summary"), "got: {markdown:?}");
}

#[test]
fn test_pdf_pages_in_order() {
    let pdf = build_pdf(&["Alpha page", "Beta page", "Gamma page"]);
    let markdown = sanitize_raw(&default_pipeline(), &pdf, PDF_MIME_TYPE).unwrap();

    let alpha = markdown.find("Alpha").unwrap();
    let beta = markdown.find("Beta").unwrap();
    let gamma = markdown.find("Gamma").unwrap();
    assert!(alpha < beta && beta < gamma, "got: {markdown:?}");
}

#[test]
fn test_corrupt_pdf_is_extraction_failed() {
    let err = sanitize_raw(&default_pipeline(), b"this is not a pdf body", PDF_MIME_TYPE).unwrap_err();
    assert!(matches!(err, DocnormError::ExtractionFailed { .. }));
}

#[test]
fn test_corrupt_docx_is_extraction_failed() {
    let err = sanitize_raw(&default_pipeline(), b"not a zip archive", DOCX_MIME_TYPE).unwrap_err();
    assert!(matches!(err, DocnormError::ExtractionFailed { .. }));
}

#[test]
fn test_unsupported_type_invokes_no_extractor() {
    let counting = Arc::new(CountingExtractor::new(&["text/plain"]));
    let mut registry = FormatExtractorRegistry::new();
    registry.register(counting.clone()).unwrap();
    let pipeline = NormalizationPipeline::new(registry);

    let err = sanitize_raw(&pipeline, b"PK\x03\x04", "application/zip").unwrap_err();

    match err {
        DocnormError::UnsupportedType(content_type) => assert_eq!(content_type, "application/zip"),
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
    assert_eq!(counting.calls(), 0);

    sanitize_raw(&pipeline, b"ok", "text/plain").unwrap();
    assert_eq!(counting.calls(), 1);
}

#[test]
fn test_declared_type_parameters_are_ignored() {
    let markdown = sanitize_raw(&default_pipeline(), b"hi", "Text/Plain; charset=utf-8").unwrap();
    assert_eq!(markdown, "```\nhi\n```");
}

#[test]
fn test_oversized_raw_payload() {
    let payload = vec![b'a'; MAX_PAYLOAD_BYTES + 1];
    let err = sanitize_raw(&default_pipeline(), &payload, PLAIN_TEXT_MIME_TYPE).unwrap_err();

    match err {
        DocnormError::TooLarge { limit, actual } => {
            assert_eq!(limit, MAX_PAYLOAD_BYTES);
            assert_eq!(actual, MAX_PAYLOAD_BYTES + 1);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[test]
fn test_oversized_base64_payload_reports_decoded_size() {
    let encoded = STANDARD.encode(vec![0u8; MAX_PAYLOAD_BYTES + 3]);
    let err = default_pipeline()
        .sanitize(&DocumentRequest::base64(encoded, PDF_MIME_TYPE))
        .unwrap_err();

    match err {
        DocnormError::TooLarge { actual, .. } => assert_eq!(actual, MAX_PAYLOAD_BYTES + 3),
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[test]
fn test_oversized_unsupported_type_is_too_large() {
    let payload = vec![0u8; MAX_PAYLOAD_BYTES + 1];
    let err = sanitize_raw(&default_pipeline(), &payload, "application/zip").unwrap_err();
    assert!(matches!(err, DocnormError::TooLarge { .. }));
}

#[test]
fn test_malformed_base64_is_invalid_input() {
    let err = default_pipeline()
        .sanitize(&DocumentRequest::base64("this is *not* base64", PLAIN_TEXT_MIME_TYPE))
        .unwrap_err();
    assert!(matches!(err, DocnormError::InvalidInput { .. }));
    assert!(err.is_client_error());
}

#[test]
fn test_invalid_utf8_plain_text() {
    let markdown = sanitize_raw(&default_pipeline(), b"caf\xe9 au lait", PLAIN_TEXT_MIME_TYPE).unwrap();
    assert!(markdown.starts_with("```\n"));
    assert!(markdown.ends_with("\n```"));
    assert!(markdown.contains('\u{FFFD}'));
}

#[test]
fn test_plain_text_cannot_escape_fence() {
    let markdown = sanitize_raw(&default_pipeline(), b"before\n```\ninjected\n```\nafter", PLAIN_TEXT_MIME_TYPE).unwrap();
    assert!(markdown.starts_with("````\n"));
    assert!(markdown.ends_with("\n````"));
}

#[test]
fn test_identical_requests_are_byte_identical() {
    let pipeline = default_pipeline();
    let docx = build_docx(&format!("{}{}", paragraph("x"), table(&[&["k", "v"], &["1", "2"]])));
    let pdf = build_pdf(&["Deterministic output"]);

    let cases: [(&[u8], &str); 3] = [
        (&docx, DOCX_MIME_TYPE),
        (&pdf, PDF_MIME_TYPE),
        (b"same text every time", PLAIN_TEXT_MIME_TYPE),
    ];

    for (payload, content_type) in cases {
        let first = sanitize_raw(&pipeline, payload, content_type).unwrap();
        let second = sanitize_raw(&pipeline, payload, content_type).unwrap();
        assert_eq!(first, second, "non-deterministic output for {content_type}");
    }
}

const REGIONS: &[&[&str]] = &[&["Region", "Sales"], &["North", "120"], &["South", "95"]];

const REGIONS_TABLE: &str = "---\n\n| Region | Sales |\n|---|---|\n| North | 120 |\n| South | 95 |\n\n---";

#[test]
fn test_pdf_table_in_one_text_object_with_text_matrices() {
    let pdf = build_pdf_from_operations(vec![matrix_positioned_table("Quarterly report", REGIONS)]);
    let markdown = sanitize_raw(&default_pipeline(), &pdf, PDF_MIME_TYPE).unwrap();
    assert_eq!(markdown, format!("Quarterly report\n\n{REGIONS_TABLE}"));
}

#[test]
fn test_pdf_table_in_one_text_object_with_line_offsets() {
    let pdf = build_pdf_from_operations(vec![offset_positioned_table(REGIONS)]);
    let markdown = sanitize_raw(&default_pipeline(), &pdf, PDF_MIME_TYPE).unwrap();
    assert_eq!(markdown, REGIONS_TABLE);
}

#[test]
fn test_pdf_table_detection_can_be_disabled() {
    let mut config = DocnormConfig::default();
    config.pdf.detect_tables = false;
    let pipeline = NormalizationPipeline::with_defaults(&config).unwrap();

    let pdf = build_pdf_from_operations(vec![matrix_positioned_table("Quarterly report", REGIONS)]);
    let markdown = sanitize_raw(&pipeline, &pdf, PDF_MIME_TYPE).unwrap();
    assert_eq!(markdown, "Quarterly report\n\nRegion Sales\nNorth 120\nSouth 95");
}

#[test]
fn test_pdf_space_aligned_rows_in_one_text_object() {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 700.into()]),
    ];
    for (index, row) in ["Region    Sales", "North     120", "South     95"].into_iter().enumerate() {
        if index > 0 {
            operations.push(Operation::new("Td", vec![0.into(), (-16).into()]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(row)]));
    }
    operations.push(Operation::new("ET", vec![]));

    let pdf = build_pdf_from_operations(vec![operations]);
    let markdown = sanitize_raw(&default_pipeline(), &pdf, PDF_MIME_TYPE).unwrap();
    assert_eq!(markdown, REGIONS_TABLE);
}
