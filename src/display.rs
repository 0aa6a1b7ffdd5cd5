use crate::roles::{find_role, Role, ROLES};
use colored::*;
use std::io::{self, BufRead, IsTerminal, Write};
use termimad::MadSkin;

/// Render markdown for the terminal.
///
/// Styled output is only produced when stdout is a terminal; otherwise the
/// layout is kept and styling dropped so redirected output stays readable.
pub fn render_markdown(text: &str) -> String {
    let skin = if io::stdout().is_terminal() {
        MadSkin::default()
    } else {
        MadSkin::no_style()
    };
    let rendered = skin.text(text, None).to_string();
    let rendered = rendered.trim_end_matches('\n');

    if rendered.trim().is_empty() && !text.trim().is_empty() {
        // Nothing survived rendering; show the raw response instead
        text.to_string()
    } else {
        rendered.to_string()
    }
}

pub fn display_markdown(text: &str) {
    println!("{}", render_markdown(text));
}

pub fn show_instructions() {
    let lines = [
        "Type 'exit' to quit the application",
        "Press Enter to send message",
        "Press Ctrl + L for new line",
        "Type 'cp' to copy full response",
        "Type 'c-1', 'c-2',... to copy specific code blocks",
        "Combine multiple copy commands: 'cp c-1 c-2'",
        "Type '!<command>' to run a command after confirmation",
        "Type '!help' to see available commands",
    ];
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;

    println!("{}", format!("╭─ How to use {}╮", "─".repeat(width.saturating_sub(12))).blue());
    for line in lines {
        let padding = width - line.chars().count() - 2;
        println!("{} - {}{}{}", "│".blue(), line, " ".repeat(padding), "│".blue());
    }
    println!("{}", format!("╰{}╯", "─".repeat(width + 1)).blue());
}

/// First line of a role prompt, cut to `limit` characters for the menu
fn prompt_preview(role: &Role, limit: usize) -> String {
    let first_line = role.system_prompt.lines().next().unwrap_or("");
    let preview: String = first_line.chars().take(limit).collect();
    format!("{}...", preview)
}

/// Show the role menu on `output` and keep asking until `input` names a role.
///
/// Returns `None` if input ends before a valid choice is made.
pub fn select_role<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<Role>> {
    writeln!(output, "{}", "Select a role:".bold().blue())?;
    for role in ROLES.iter() {
        writeln!(
            output,
            "{}: {} {}",
            role.key.yellow(),
            role.name.bold(),
            prompt_preview(role, 100).dimmed()
        )?;
    }

    let keys: Vec<&str> = ROLES.iter().map(|role| role.key).collect();
    loop {
        write!(output, "Enter role number [{}]: ", keys.join("/"))?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }

        match find_role(&answer) {
            Some(role) => return Ok(Some(role)),
            None => writeln!(output, "{}", "Please select one of the available choices".red())?,
        }
    }
}

/// Display success messages with consistent formatting
pub fn display_success(message: &str) {
    println!("{} {}", "✅".green(), message);
}

/// Display warning messages with consistent formatting
pub fn display_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}

/// Display info messages with consistent formatting
pub fn display_info(message: &str) {
    println!("{} {}", "💡".cyan(), message.dimmed());
}

pub fn display_tip(message: &str) {
    println!("{} {}: {}", "💡".cyan(), "Tip".bold().cyan(), message.dimmed());
}
