//! Byte-level format handling used by the extractors.

pub mod layout;
pub mod table;
pub mod text;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "office")]
pub mod docx;

pub use layout::{LayoutConfig, PageLine, TextSpan, analyze_lines, group_lines};
pub use table::render_table;
pub use text::fence_plain_text;

#[cfg(feature = "pdf")]
pub use pdf::extract_pdf_elements;

#[cfg(feature = "office")]
pub use docx::extract_docx_elements;
