use crate::execution::{CommandExecutor, ExecutionResult};
use std::io::{self, BufRead, Write};

/// Asks the user whether a command may run
pub trait Confirm {
    fn confirm(&mut self, command: &str) -> bool;
}

/// Confirmation over the process's own stdin/stdout
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, command: &str) -> bool {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        // An unreadable terminal counts as a refusal
        confirm_execution(command, &mut input, &mut output).unwrap_or(false)
    }
}

/// Prompt for `command` on `output` and read one answer line from `input`.
///
/// Only `Y` or `y` (surrounding whitespace ignored) approves. Anything else,
/// including an empty line or end of input, declines.
pub fn confirm_execution<R: BufRead, W: Write>(
    command: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(
        output,
        "Do you want to execute this command: '{}'? (Y/N): ",
        command
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Run `command` only after `confirm` approves it.
///
/// Returns `None` when the user declines; no process is started in that case.
pub async fn gated_execute(
    command: &str,
    confirm: &mut dyn Confirm,
    executor: &CommandExecutor,
) -> Option<ExecutionResult> {
    if !confirm.confirm(command) {
        return None;
    }
    Some(executor.execute(command).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::DEFAULT_EXEC_TIMEOUT;
    use std::io::Cursor;

    fn answer(command: &str, reply: &str) -> (bool, String) {
        let mut input = Cursor::new(reply.as_bytes().to_vec());
        let mut output = Vec::new();
        let approved = confirm_execution(command, &mut input, &mut output).unwrap();
        (approved, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_prompt_text() {
        let (_, prompt) = answer("ls -la", "n\n");
        assert_eq!(prompt, "Do you want to execute this command: 'ls -la'? (Y/N): ");
    }

    #[test]
    fn test_only_y_approves() {
        assert!(answer("ls", "Y\n").0);
        assert!(answer("ls", "y\n").0);
        assert!(answer("ls", "  y  \n").0);

        assert!(!answer("ls", "N\n").0);
        assert!(!answer("ls", "\n").0);
        assert!(!answer("ls", "").0);
        assert!(!answer("ls", "yes\n").0);
        assert!(!answer("ls", "YY\n").0);
    }

    struct Scripted {
        approve: bool,
        asked: Vec<String>,
    }

    impl Confirm for Scripted {
        fn confirm(&mut self, command: &str) -> bool {
            self.asked.push(command.to_string());
            self.approve
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_declined_command_never_spawns() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        let command = format!("touch {}", marker.display());

        let executor = CommandExecutor::new(DEFAULT_EXEC_TIMEOUT);
        let mut confirm = Scripted {
            approve: false,
            asked: Vec::new(),
        };

        let result = gated_execute(&command, &mut confirm, &executor).await;

        assert!(result.is_none());
        assert_eq!(confirm.asked, vec![command]);
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_approved_command_runs() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        let command = format!("touch {}", marker.display());

        let executor = CommandExecutor::new(DEFAULT_EXEC_TIMEOUT);
        let mut confirm = Scripted {
            approve: true,
            asked: Vec::new(),
        };

        let result = gated_execute(&command, &mut confirm, &executor).await.unwrap();

        assert!(result.success, "{}", result.message);
        assert!(marker.exists());
    }
}
