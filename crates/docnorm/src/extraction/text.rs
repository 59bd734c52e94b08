//! Plain text decoding and fencing.

const BOM: char = '\u{feff}';

/// Decode plain text and wrap it in a fenced code block.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected. The fence is one
/// backtick longer than the longest backtick run in the text (minimum three), so the
/// text can never close the block early.
pub fn fence_plain_text(content: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(content);
    let text = decoded.strip_prefix(BOM).unwrap_or(decoded.as_ref());
    let text = text.trim_end_matches(['\n', '\r']);

    let fence = "`".repeat(longest_backtick_run(text).max(2) + 1);
    format!("{fence}\n{text}\n{fence}")
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;

    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_text_is_fenced() {
        assert_eq!(fence_plain_text(b"hello\nworld\n"), "```\nhello\nworld\n```");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let fenced = fence_plain_text(b"bad \xff byte");
        assert_eq!(fenced, "```\nbad \u{fffd} byte\n```");
    }

    #[test]
    fn test_fence_outgrows_embedded_fences() {
        let fenced = fence_plain_text(b"```rust\nfn main() {}\n```");
        assert!(fenced.starts_with("````\n"));
        assert!(fenced.ends_with("\n````"));
    }

    #[test]
    fn test_longest_run_wins() {
        assert_eq!(longest_backtick_run("a ` b ````` c ``"), 5);
        assert_eq!(longest_backtick_run("no ticks"), 0);
    }

    #[test]
    fn test_bom_is_dropped() {
        assert_eq!(fence_plain_text("\u{feff}text".as_bytes()), "```\ntext\n```");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(fence_plain_text(b""), "```\n\n```");
    }
}
