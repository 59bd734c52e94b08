//! Markdown table rendering.
//!
//! Produces GitHub Flavored Markdown pipe tables:
//!
//! ```markdown
//! | a | b |
//! |---|---|
//! | 1 | 2 |
//! ```
//!
//! Output depends only on the table contents, so identical tables always render to
//! identical bytes.

use crate::types::Table;

/// Render a table as a Markdown pipe table.
///
/// The header row comes first, then one `---` separator per column, then the data
/// rows in order. No trailing newline. A table without columns renders as the empty
/// string.
pub fn render_table(table: &Table) -> String {
    let columns = table.column_count();
    if columns == 0 {
        return String::new();
    }

    let mut markdown = String::with_capacity(64 * (table.rows().len() + 2));

    push_row(&mut markdown, table.header());
    markdown.push('\n');

    markdown.push('|');
    for _ in 0..columns {
        markdown.push_str("---|");
    }

    for row in table.rows() {
        markdown.push('\n');
        push_row(&mut markdown, row);
    }

    markdown
}

fn push_row(markdown: &mut String, cells: &[String]) {
    markdown.push_str("| ");
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            markdown.push_str(" | ");
        }
        markdown.push_str(&escape_cell(cell));
    }
    markdown.push_str(" |");
}

/// Escape cell text so it cannot break the grid.
fn escape_cell(cell: &str) -> String {
    let mut escaped = String::with_capacity(cell.len());
    let mut chars = cell.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '|' => escaped.push_str("\\|"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("<br>");
            }
            '\n' => escaped.push_str("<br>"),
            other => escaped.push(other),
        }
    }

    escaped
}
