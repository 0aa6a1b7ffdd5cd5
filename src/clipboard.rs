use crate::codeblocks::extract_code_blocks;
use crate::logging::LogCategory;
use anyhow::{anyhow, Result};

/// Destination for staged clipboard content
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| anyhow!("clipboard unavailable: {}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| anyhow!("{}", e))
    }
}

/// Apply a line of copy directives (`cp`, `c-<n>`) to `text`.
///
/// Every directive produces one status line. Staged content is joined with a
/// blank line and written to `clipboard` in a single call, and only when at
/// least one directive staged something. A failed write is reported as the
/// final status line; the other lines are still returned.
pub fn copy_content(text: &str, directives: &str, clipboard: &mut dyn ClipboardWriter) -> String {
    let directives = directives.trim().to_lowercase();
    let mut status = Vec::new();
    let mut staged: Vec<String> = Vec::new();

    for directive in directives.split_whitespace() {
        if directive == "cp" {
            staged.push(text.to_string());
            status.push("✓ Full response copied".to_string());
            continue;
        }

        match directive.strip_prefix("c-").and_then(parse_block_index) {
            Some(index) => {
                let blocks = extract_code_blocks(text);
                let label = &directive["c-".len()..];
                let found = index.filter(|&i| i >= 1).and_then(|i| blocks.get(i - 1));

                match found {
                    Some(block) => {
                        staged.push(block.content.clone());
                        status.push(format!("✓ Code block #{} copied ({})", label, block.language));
                    }
                    None => status.push(format!(
                        "❌ Code block #{} not found (response has {} code block{})",
                        label,
                        blocks.len(),
                        if blocks.len() == 1 { "" } else { "s" }
                    )),
                }
            }
            None => status.push(format!("❌ Invalid command: {}", directive)),
        }
    }

    if !staged.is_empty() {
        let payload = staged.join("\n\n");
        match clipboard.write_text(&payload) {
            Ok(()) => {
                crate::log_info!(
                    LogCategory::Clipboard,
                    format!("Copied {} item(s), {} chars", staged.len(), payload.chars().count())
                );
            }
            Err(e) => {
                crate::log_warning!(LogCategory::Clipboard, format!("Clipboard write failed: {}", e));
                status.push(format!("❌ Failed to copy to clipboard: {}", e));
            }
        }
    }

    status.join("\n")
}

/// Parse the integer after `c-`.
///
/// `None` means the suffix is not an integer at all. `Some(None)` is an integer
/// that can never name a block: negative, or too large for `usize`.
fn parse_block_index(suffix: &str) -> Option<Option<usize>> {
    let (negative, digits) = match suffix.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, suffix.strip_prefix('+').unwrap_or(suffix)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if negative {
        Some(None)
    } else {
        Some(digits.parse::<usize>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every payload instead of touching the real clipboard
    #[derive(Default)]
    struct RecordingClipboard {
        writes: Vec<String>,
        fail: bool,
    }

    impl ClipboardWriter for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(anyhow!("no display"));
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    const RESPONSE: &str = "Try this:\n```python\nprint('hi')\n```\nor\n```\nls\n```";

    #[test]
    fn test_full_response_copy() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content(RESPONSE, "cp", &mut clipboard);

        assert_eq!(status, "✓ Full response copied");
        assert_eq!(clipboard.writes, vec![RESPONSE.to_string()]);
    }

    #[test]
    fn test_code_block_copy_reports_language() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content(RESPONSE, "c-1", &mut clipboard);

        assert_eq!(status, "✓ Code block #1 copied (python)");
        assert_eq!(clipboard.writes, vec!["print('hi')".to_string()]);

        let status = copy_content(RESPONSE, "c-2", &mut clipboard);
        assert_eq!(status, "✓ Code block #2 copied (text)");
    }

    #[test]
    fn test_combined_directives_single_write() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content(RESPONSE, "CP C-1", &mut clipboard);

        assert_eq!(status, "✓ Full response copied\n✓ Code block #1 copied (python)");
        assert_eq!(clipboard.writes.len(), 1);
        assert_eq!(clipboard.writes[0], format!("{}\n\nprint('hi')", RESPONSE));
    }

    #[test]
    fn test_same_block_twice() {
        let mut clipboard = RecordingClipboard::default();
        copy_content(RESPONSE, "c-2 c-2", &mut clipboard);
        assert_eq!(clipboard.writes, vec!["ls\n\nls".to_string()]);
    }

    #[test]
    fn test_out_of_range_never_writes() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content(RESPONSE, "c-3", &mut clipboard);

        assert!(status.contains("#3 not found"));
        assert!(status.contains("2 code blocks"));
        assert!(clipboard.writes.is_empty());

        let status = copy_content(RESPONSE, "c-0", &mut clipboard);
        assert!(status.contains("#0 not found"));
        assert!(clipboard.writes.is_empty());
    }

    #[test]
    fn test_huge_index_is_not_found() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content(RESPONSE, "c-99999999999999999999", &mut clipboard);

        assert_eq!(
            status,
            "❌ Code block #99999999999999999999 not found (response has 2 code blocks)"
        );
        assert!(clipboard.writes.is_empty());
    }

    #[test]
    fn test_negative_index_is_not_found() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content(RESPONSE, "c--1", &mut clipboard);
        assert!(status.starts_with("❌ Code block #-1 not found"));
    }

    #[test]
    fn test_not_found_without_blocks() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content("no code here", "c-1", &mut clipboard);
        assert_eq!(status, "❌ Code block #1 not found (response has 0 code blocks)");
    }

    #[test]
    fn test_invalid_tokens_do_not_abort() {
        let mut clipboard = RecordingClipboard::default();
        let status = copy_content(RESPONSE, "c-x paste c- c-1", &mut clipboard);
        let lines: Vec<&str> = status.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "❌ Invalid command: c-x");
        assert_eq!(lines[1], "❌ Invalid command: paste");
        assert_eq!(lines[2], "❌ Invalid command: c-");
        assert_eq!(lines[3], "✓ Code block #1 copied (python)");
        assert_eq!(clipboard.writes, vec!["print('hi')".to_string()]);
    }

    #[test]
    fn test_clipboard_failure_is_last_line() {
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let status = copy_content(RESPONSE, "cp c-9", &mut clipboard);
        let lines: Vec<&str> = status.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "✓ Full response copied");
        assert!(lines[1].contains("not found"));
        assert!(lines[2].starts_with("❌ Failed to copy to clipboard"));
        assert!(lines[2].contains("no display"));
    }

    #[test]
    fn test_empty_directive_line() {
        let mut clipboard = RecordingClipboard::default();
        assert_eq!(copy_content(RESPONSE, "   ", &mut clipboard), "");
        assert!(clipboard.writes.is_empty());
    }
}
