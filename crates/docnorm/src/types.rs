use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DocnormError, Result};

/// How the payload bytes were wrapped for transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportEncoding {
    /// Raw document bytes.
    #[default]
    None,
    /// Standard-alphabet, padded base64 text.
    Base64,
}

/// A single normalization request.
///
/// Built per call and dropped once the call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub payload: Vec<u8>,
    pub content_type: String,
    pub transport_encoding: TransportEncoding,
}

impl DocumentRequest {
    /// Request carrying raw document bytes.
    pub fn new(payload: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            content_type: content_type.into(),
            transport_encoding: TransportEncoding::None,
        }
    }

    /// Request carrying base64 text that must be decoded before extraction.
    pub fn base64(payload: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            content_type: content_type.into(),
            transport_encoding: TransportEncoding::Base64,
        }
    }
}

/// Tabular element with a header row kept apart from the data rows.
///
/// Every row has exactly `header.len()` cells. The fields are private so the
/// invariant can only be established through [`Table::new`] or [`Table::from_ragged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the header.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != header.len()) {
            return Err(DocnormError::extraction_failed(format!(
                "table row {} has {} cells, header has {}",
                index,
                row.len(),
                header.len()
            )));
        }
        Ok(Self { header, rows })
    }

    /// Build a table from raw rows where the first row is the header.
    ///
    /// Short rows (header included) are padded with empty cells up to the widest row,
    /// so no cell is ever dropped. Returns `None` when there are no rows.
    pub fn from_ragged(mut rows: Vec<Vec<String>>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }

        let header = rows.remove(0);
        Some(Self { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// One structural element in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentElement {
    TextRun { text: String },
    Table(Table),
}

impl DocumentElement {
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextRun { text: text.into() }
    }
}

/// Output of a format extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum NormalizedDocument {
    /// Ordered structural elements (PDF, DOCX).
    Elements(Vec<DocumentElement>),
    /// Already-rendered Markdown for formats without structure (plain text).
    Text(String),
}

/// Terminal output of the normalization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedResult {
    pub markdown: String,
}

/// Lifecycle of a single request.
///
/// `Received → Validating → Extracting → Serializing → Completed`, with `Failed`
/// reachable from every stage after `Received`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStage {
    Received,
    Validating,
    Extracting,
    Serializing,
    Completed,
    Failed,
}

impl RequestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validating => "validating",
            Self::Extracting => "extracting",
            Self::Serializing => "serializing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
