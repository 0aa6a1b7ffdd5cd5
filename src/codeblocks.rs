use regex::Regex;
use std::sync::OnceLock;

/// A fenced code block found in a model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub content: String,
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Opening fence: ``` directly followed by an optional tag, then end of line.
        // Closing fence: a line holding nothing but ```.
        Regex::new(r"(?ms)^[ \t]*```([^\s`]*)[ \t]*\r?\n(.*?)^[ \t]*```[ \t]*\r?$")
            .expect("fence pattern is valid")
    })
}

/// Extract every closed fenced code block from `text`, in source order.
///
/// Unterminated fences contribute nothing. Blocks without a language tag are
/// reported as `text`.
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    fence_pattern()
        .captures_iter(text)
        .map(|caps| {
            let language = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|tag| !tag.is_empty())
                .unwrap_or("text")
                .to_string();
            let content = caps
                .get(2)
                .map(|m| m.as_str().trim_end().to_string())
                .unwrap_or_default();
            CodeBlock { language, content }
        })
        .collect()
}
