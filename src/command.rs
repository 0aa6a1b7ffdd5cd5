/// Sentinel the CLI Assistant role uses to mark a suggested command
pub const COMMAND_SENTINEL: &str = "COMMAND:";

/// A command extracted from user input or model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    /// The reserved `help` pseudo-command; never reaches a shell
    Help,
    Shell(String),
}

impl CommandRequest {
    /// Build a request from already-normalized command text
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("help") {
            CommandRequest::Help
        } else {
            CommandRequest::Shell(text.to_string())
        }
    }
}

/// A model response, tagged by whether it carries a command suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Answer(String),
    SuggestedCommand { command: String, text: String },
}

impl ChatReply {
    /// Full response text, whichever variant this is
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Answer(text) => text,
            ChatReply::SuggestedCommand { text, .. } => text,
        }
    }
}

/// Parse a literal `!command` typed by the user.
///
/// Returns `None` when the input is not a literal command at all. A bare `!`
/// yields an empty shell request, which the executor rejects. Only the first
/// line is the command; anything typed after a line break is dropped.
pub fn parse_literal(input: &str) -> Option<CommandRequest> {
    input
        .trim_start()
        .strip_prefix('!')
        .map(|rest| CommandRequest::from_text(rest.lines().next().unwrap_or("")))
}

/// Pull the suggested command out of model output containing `COMMAND:`.
///
/// Takes the rest of the sentinel's line, drops surrounding backticks and any
/// trailing parenthesised annotation such as `(Windows)`. An empty result means
/// nothing was suggested.
pub fn extract_suggestion(text: &str) -> Option<String> {
    let start = text.find(COMMAND_SENTINEL)? + COMMAND_SENTINEL.len();
    let line = text[start..].lines().next().unwrap_or("");
    let line = line.trim().trim_matches('`').trim();

    let command = strip_annotation(line).trim();
    if command.is_empty() {
        None
    } else {
        Some(command.to_string())
    }
}

/// Keep only the text before the first `(` that is not escaped with a backslash
fn strip_annotation(line: &str) -> &str {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            '(' if !escaped => return &line[..idx],
            _ => escaped = false,
        }
    }
    line
}

/// Tag a model response as a plain answer or a command suggestion
pub fn classify_reply(text: &str) -> ChatReply {
    match extract_suggestion(text) {
        Some(command) => ChatReply::SuggestedCommand {
            command,
            text: text.to_string(),
        },
        None => ChatReply::Answer(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_help_any_case() {
        assert_eq!(parse_literal("!help"), Some(CommandRequest::Help));
        assert_eq!(parse_literal("!HELP"), Some(CommandRequest::Help));
        assert_eq!(parse_literal("  !  Help  "), Some(CommandRequest::Help));
    }

    #[test]
    fn test_literal_keeps_first_line_only() {
        assert_eq!(
            parse_literal("!echo first\nrm_me second"),
            Some(CommandRequest::Shell("echo first".to_string()))
        );
        assert_eq!(
            parse_literal("!\nls"),
            Some(CommandRequest::Shell(String::new()))
        );
    }

    #[test]
    fn test_literal_shell_command() {
        assert_eq!(
            parse_literal("!ls -la"),
            Some(CommandRequest::Shell("ls -la".to_string()))
        );
        assert_eq!(
            parse_literal("!   git status  "),
            Some(CommandRequest::Shell("git status".to_string()))
        );
    }

    #[test]
    fn test_literal_requires_bang() {
        assert_eq!(parse_literal("ls -la"), None);
        assert_eq!(parse_literal("say !hello"), None);
    }

    #[test]
    fn test_bare_bang_is_empty_command() {
        assert_eq!(parse_literal("!"), Some(CommandRequest::Shell(String::new())));
    }

    #[test]
    fn test_help_with_arguments_is_shell() {
        assert_eq!(
            parse_literal("!help me"),
            Some(CommandRequest::Shell("help me".to_string()))
        );
    }

    #[test]
    fn test_suggestion_strips_os_hint() {
        assert_eq!(extract_suggestion("COMMAND: dir (Windows)"), Some("dir".to_string()));
        assert_eq!(
            extract_suggestion("Sure.\nCOMMAND: ls -la (Linux/macOS)\nThis lists files."),
            Some("ls -la".to_string())
        );
    }

    #[test]
    fn test_suggestion_stops_at_line_break() {
        assert_eq!(
            extract_suggestion("COMMAND: pwd\n(prints the working directory)"),
            Some("pwd".to_string())
        );
    }

    #[test]
    fn test_suggestion_never_contains_sentinel() {
        let command = extract_suggestion("COMMAND: echo done").unwrap();
        assert!(!command.contains(COMMAND_SENTINEL));
    }

    #[test]
    fn test_suggestion_removes_backticks() {
        assert_eq!(extract_suggestion("COMMAND: `df -h`"), Some("df -h".to_string()));
    }

    #[test]
    fn test_escaped_paren_is_kept() {
        assert_eq!(
            extract_suggestion(r"COMMAND: find . -name \(a\) (Linux)"),
            Some(r"find . -name \(a\)".to_string())
        );
    }

    #[test]
    fn test_empty_suggestion_is_none() {
        assert_eq!(extract_suggestion("COMMAND:   "), None);
        assert_eq!(extract_suggestion("COMMAND: (none)"), None);
        assert_eq!(extract_suggestion("COMMAND:\nls"), None);
        assert_eq!(extract_suggestion("no sentinel here"), None);
    }

    #[test]
    fn test_classify_reply() {
        assert_eq!(
            classify_reply("Paris is the capital of France."),
            ChatReply::Answer("Paris is the capital of France.".to_string())
        );

        let reply = classify_reply("COMMAND: dir (Windows)");
        assert_eq!(
            reply,
            ChatReply::SuggestedCommand {
                command: "dir".to_string(),
                text: "COMMAND: dir (Windows)".to_string(),
            }
        );
        assert_eq!(reply.text(), "COMMAND: dir (Windows)");
    }
}
