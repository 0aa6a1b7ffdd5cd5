use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::{Cmd, DefaultEditor, KeyEvent};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clichat::clipboard::SystemClipboard;
use clichat::command::{parse_literal, ChatReply, CommandRequest};
use clichat::config::Config;
use clichat::display::{
    display_info, display_markdown, display_success, display_tip, display_warning, select_role,
    show_instructions,
};
use clichat::error_handling::enhance_error;
use clichat::execution::CommandExecutor;
use clichat::file_input::attach_file;
use clichat::gate::TerminalConfirm;
use clichat::logging::{get_logger, init_logger};
use clichat::providers::{ChatProvider, GroqProvider};
use clichat::roles::{find_role, Role, ROLES};
use clichat::session::{
    classify_input, format_outcome, run_command, run_suggestion, SessionContext, UserInput,
};

#[derive(Parser)]
#[command(name = "clichat")]
#[command(version)]
#[command(about = "💬 clichat: chat with an LLM from your terminal", long_about = "Chat with a hosted LLM, copy answers or code blocks to the clipboard, and run suggested commands after confirming them.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Message to send; add " | cp c-1" to copy from the reply
    content: Option<String>,

    /// Message to send (alternative to the positional argument)
    #[arg(long = "content", value_name = "CONTENT")]
    content_flag: Option<String>,

    /// Attach a file to the message
    #[arg(long)]
    file: Option<PathBuf>,

    /// Role key (1-5) to use without showing the menu
    #[arg(long)]
    role: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Config,
    /// Show logging status and log file location
    LogStatus,
    /// Clear all log files
    ClearLogs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logger() {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let app_config = Config::load();

    if let Ok(logger) = get_logger() {
        if let Ok(logger_guard) = logger.lock() {
            let os_info = format!("{} {}", std::env::consts::OS, std::env::consts::ARCH);
            let _ = logger_guard.log_startup(env!("CARGO_PKG_VERSION"), &os_info);
        }
    }

    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Commands::Config => app_config.display(),
            Commands::LogStatus => show_log_status(),
            Commands::ClearLogs => clear_logs()?,
        }
        return Ok(());
    }

    let provider = match GroqProvider::from_config(&app_config) {
        Ok(provider) => provider,
        Err(e) => {
            enhance_error(&e).display();
            std::process::exit(1);
        }
    };
    let executor = CommandExecutor::new(Duration::from_millis(app_config.exec_timeout));

    let role = match resolve_role(cli.role.as_deref(), &app_config)? {
        Some(role) => role,
        None => return Ok(()),
    };

    match cli.content.or(cli.content_flag) {
        Some(content) => run_inline(&content, cli.file, role, &provider, &executor).await,
        None => run_interactive(role, &provider, &executor).await,
    }
}

/// Role from `--role`, then the configured default, then the menu
fn resolve_role(requested: Option<&str>, config: &Config) -> anyhow::Result<Option<Role>> {
    if let Some(key) = requested {
        return match find_role(key) {
            Some(role) => Ok(Some(role)),
            None => {
                let keys: Vec<&str> = ROLES.iter().map(|role| role.key).collect();
                Err(anyhow::anyhow!(
                    "Unknown role '{}'. Available roles: {}",
                    key,
                    keys.join(", ")
                ))
            }
        };
    }

    if let Some(role) = config.default_role.as_deref().and_then(find_role) {
        return Ok(Some(role));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    Ok(select_role(&mut input, &mut output)?)
}

/// Split inline content into the message and optional copy directives
fn split_inline(content: &str) -> (&str, Option<&str>) {
    let content = content.trim();
    match content.split_once(" | ") {
        Some((message, directives)) => (message, Some(directives)),
        None => (content, None),
    }
}

async fn run_inline(
    content: &str,
    file: Option<PathBuf>,
    role: Role,
    provider: &dyn ChatProvider,
    executor: &CommandExecutor,
) -> anyhow::Result<()> {
    let (message, directives) = split_inline(content);

    if let Some(request) = parse_literal(message) {
        execute_request(&request, executor).await;
        return Ok(());
    }

    let message = match &file {
        Some(path) => attach_file(message, path),
        None => message.to_string(),
    };

    let mut session = SessionContext::new(role, executor.platform());
    let reply = with_spinner(session.respond(provider, &message)).await;
    present_reply(&reply, executor).await;

    if let Some(directives) = directives {
        println!("{}", session.copy_last(directives, &mut SystemClipboard));
    }

    Ok(())
}

async fn run_interactive(
    role: Role,
    provider: &dyn ChatProvider,
    executor: &CommandExecutor,
) -> anyhow::Result<()> {
    let mut session = SessionContext::new(role, executor.platform());

    display_success(&format!("Role: {}", session.role().name.bold()));
    show_instructions();

    let mut rl = DefaultEditor::new()?;
    rl.bind_sequence(KeyEvent::ctrl('L'), Cmd::Newline);

    loop {
        let line = match rl.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                display_warning(&format!("Input error: {}", e));
                break;
            }
        };

        match classify_input(&line) {
            UserInput::Exit => break,
            UserInput::Empty => continue,
            UserInput::Copy(directives) => {
                println!("{}", session.copy_last(&directives, &mut SystemClipboard));
            }
            UserInput::Command(request) => {
                let _ = rl.add_history_entry(line.as_str());
                execute_request(&request, executor).await;
            }
            UserInput::Chat(message) => {
                let _ = rl.add_history_entry(line.as_str());
                println!("\n{}", "Assistant:".bold().cyan());
                let reply = with_spinner(session.respond(provider, &message)).await;
                present_reply(&reply, executor).await;
                println!();
            }
        }
    }

    Ok(())
}

async fn present_reply(reply: &ChatReply, executor: &CommandExecutor) {
    display_markdown(reply.text());

    if let ChatReply::SuggestedCommand { .. } = reply {
        println!();
    }
    if let Some(result) = run_suggestion(reply, &mut TerminalConfirm, executor).await {
        println!("{}", format_outcome(&result));
    }
}

async fn execute_request(request: &CommandRequest, executor: &CommandExecutor) {
    if let Some(result) = run_command(request, &mut TerminalConfirm, executor).await {
        println!("{}", format_outcome(&result));
    }
}

async fn with_spinner<F: Future>(future: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Thinking...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    pb.finish_and_clear();
    output
}

fn show_log_status() {
    let logger = match get_logger() {
        Ok(logger) => logger,
        Err(_) => {
            eprintln!("{} Logger not initialized", "❌".red());
            return;
        }
    };

    let Ok(logger_guard) = logger.lock() else {
        return;
    };

    println!("{}", "📋 clichat Logging Status:".bold().cyan());
    let log_path = logger_guard.get_current_log_path();
    println!("Log file: {}", log_path.display().to_string().green());

    if log_path.exists() {
        if let Ok(metadata) = std::fs::metadata(log_path) {
            println!("Log file size: {} KB", metadata.len() / 1024);
        }
    } else {
        println!("Log file: not created yet");
    }

    println!();
    display_info("Executed commands and chat messages are never logged");
    display_info("Only outcomes, durations, and configuration changes are recorded");
    display_tip("Use 'clichat clear-logs' to remove the log file");
}

fn clear_logs() -> anyhow::Result<()> {
    let logger = match get_logger() {
        Ok(logger) => logger,
        Err(_) => {
            eprintln!("{} Logger not initialized", "❌".red());
            return Ok(());
        }
    };

    print!("{} ", "Are you sure you want to clear all logs? (y/n):".bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().eq_ignore_ascii_case("y") {
        if let Ok(logger_guard) = logger.lock() {
            match logger_guard.clear_logs() {
                Ok(_) => display_success("Log file cleared successfully"),
                Err(e) => enhance_error(&e).display(),
            }
        }
    } else {
        display_info("Log clearing cancelled");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_inline_with_directives() {
        assert_eq!(
            split_inline("write a python hello world | cp c-1"),
            ("write a python hello world", Some("cp c-1"))
        );
    }

    #[test]
    fn test_split_inline_without_directives() {
        assert_eq!(split_inline("  explain pipes  "), ("explain pipes", None));
        // A bare pipe inside the message is not a separator
        assert_eq!(split_inline("ls|wc -l"), ("ls|wc -l", None));
    }

    #[test]
    fn test_cli_parses_inline_flags() {
        let cli = Cli::parse_from(["clichat", "--role", "5", "--file", "main.rs", "review"]);
        assert_eq!(cli.role.as_deref(), Some("5"));
        assert_eq!(cli.file, Some(PathBuf::from("main.rs")));
        assert_eq!(cli.content.as_deref(), Some("review"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_content_flag() {
        let cli = Cli::parse_from(["clichat", "--content", "hello"]);
        assert_eq!(cli.content_flag.as_deref(), Some("hello"));
        assert!(cli.content.is_none());
    }

    #[test]
    fn test_resolve_role_rejects_unknown_key() {
        let err = resolve_role(Some("9"), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown role '9'"));
    }

    #[test]
    fn test_resolve_role_prefers_flag_then_config() {
        let mut config = Config::default();
        config.default_role = Some("2".to_string());

        let from_flag = resolve_role(Some("5"), &config).unwrap().unwrap();
        assert_eq!(from_flag.name, "CLI Assistant");

        let from_config = resolve_role(None, &config).unwrap().unwrap();
        assert_eq!(from_config.name, "Academic Professor");
    }
}
