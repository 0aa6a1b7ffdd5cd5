use crate::clipboard::{copy_content, ClipboardWriter};
use crate::command::{classify_reply, parse_literal, ChatReply, CommandRequest};
use crate::execution::{CommandExecutor, ExecutionResult};
use crate::gate::{gated_execute, Confirm};
use crate::history::Transcript;
use crate::intent::wrap_for_cli;
use crate::os_context::Platform;
use crate::providers::ChatProvider;
use crate::roles::Role;

/// Appended to every failed execution report
pub const FAILURE_HINT: &str = "💡 Type !help to see available commands";

/// One line of interactive input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Exit,
    Empty,
    /// Copy directives to apply to the last response
    Copy(String),
    Command(CommandRequest),
    Chat(String),
}

/// Classify a line typed at the interactive prompt.
///
/// A line is a copy request when its first word is `cp` or starts with `c-`.
pub fn classify_input(raw: &str) -> UserInput {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UserInput::Empty;
    }

    let lowered = trimmed.to_lowercase();
    if lowered == "exit" {
        return UserInput::Exit;
    }

    if let Some(request) = parse_literal(trimmed) {
        return UserInput::Command(request);
    }

    let first_word = lowered.split_whitespace().next().unwrap_or("");
    if first_word == "cp" || first_word.starts_with("c-") {
        return UserInput::Copy(lowered);
    }

    UserInput::Chat(raw.to_string())
}

/// Per-run chat state, owned by the foreground loop
pub struct SessionContext {
    role: Role,
    platform: Platform,
    transcript: Transcript,
    last_response: Option<String>,
}

impl SessionContext {
    pub fn new(role: Role, platform: Platform) -> Self {
        Self {
            role,
            platform,
            transcript: Transcript::new(role.system_prompt),
            last_response: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Send `content` as the next user turn and return the reply text.
    ///
    /// A provider failure is returned as `Error: <reason>` and leaves the
    /// transcript as it was before the call.
    pub async fn ask(&mut self, provider: &dyn ChatProvider, content: &str) -> String {
        self.transcript.add_user(content);

        match provider.complete(self.transcript.turns()).await {
            Ok(reply) => {
                self.transcript.add_assistant(&reply);
                self.last_response = Some(reply.clone());
                reply
            }
            Err(e) => {
                self.transcript.discard_pending_user();
                crate::log_warning!(
                    crate::logging::LogCategory::Provider,
                    format!("{} request failed: {}", provider.get_name(), e)
                );
                format!("Error: {}", e)
            }
        }
    }

    /// Like [`ask`](Self::ask), but command-like requests first get the
    /// platform hint so the model answers with a runnable command.
    pub async fn ask_cli(&mut self, provider: &dyn ChatProvider, content: &str) -> String {
        let wrapped = wrap_for_cli(content, self.platform);
        self.ask(provider, &wrapped).await
    }

    /// Ask in the way the current role expects and tag the reply
    pub async fn respond(&mut self, provider: &dyn ChatProvider, content: &str) -> ChatReply {
        if self.role.suggests_commands() {
            let reply = self.ask_cli(provider, content).await;
            classify_reply(&reply)
        } else {
            ChatReply::Answer(self.ask(provider, content).await)
        }
    }

    /// Apply copy directives to the most recent reply
    pub fn copy_last(&self, directives: &str, clipboard: &mut dyn ClipboardWriter) -> String {
        match &self.last_response {
            Some(response) => copy_content(response, directives, clipboard),
            None => "❌ No previous response to copy".to_string(),
        }
    }
}

/// Carry out a command request.
///
/// `help` and empty commands go straight to the executor since neither can
/// start a process. Everything else must pass the confirmation gate; `None`
/// means the user declined.
pub async fn run_command(
    request: &CommandRequest,
    confirm: &mut dyn Confirm,
    executor: &CommandExecutor,
) -> Option<ExecutionResult> {
    match request {
        CommandRequest::Help => Some(executor.execute("help").await),
        CommandRequest::Shell(command) if command.trim().is_empty() => {
            Some(executor.execute(command).await)
        }
        CommandRequest::Shell(command) => gated_execute(command, confirm, executor).await,
    }
}

/// Act on a reply: a suggested command goes through [`run_command`], a plain
/// answer runs nothing.
pub async fn run_suggestion(
    reply: &ChatReply,
    confirm: &mut dyn Confirm,
    executor: &CommandExecutor,
) -> Option<ExecutionResult> {
    match reply {
        ChatReply::SuggestedCommand { command, .. } => {
            run_command(&CommandRequest::from_text(command), confirm, executor).await
        }
        ChatReply::Answer(_) => None,
    }
}

/// Text to show for an execution result
pub fn format_outcome(result: &ExecutionResult) -> String {
    if result.success {
        result.message.clone()
    } else {
        format!("{}\n{}", result.message, FAILURE_HINT)
    }
}
