use crate::logging::get_logger;
use crate::os_context::{Platform, ProcessLauncher};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Default wall-clock bound for a single command
pub const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one execution attempt, ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub message: String,
    pub success: bool,
}

impl ExecutionResult {
    pub fn success(message: String) -> Self {
        Self {
            message: format!("✓ {}", message),
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message: format!("❌ {}", message),
            success: false,
        }
    }
}

/// Runs confirmed commands through the host platform's launcher
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    platform: Platform,
    launcher: ProcessLauncher,
    timeout: Duration,
}

impl CommandExecutor {
    /// Executor for the platform this binary runs on
    pub fn new(timeout: Duration) -> Self {
        Self::for_platform(Platform::detect(), timeout)
    }

    pub fn for_platform(platform: Platform, timeout: Duration) -> Self {
        Self {
            platform,
            launcher: platform.launcher(),
            timeout,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Execute `command` and describe what happened.
    ///
    /// `help` is answered from a static table. Empty input is refused. Every
    /// other failure (unparseable quoting, missing program, non-zero exit,
    /// timeout) comes back as an unsuccessful result rather than an error.
    pub async fn execute(&self, command: &str) -> ExecutionResult {
        let command = command.trim();

        if command.eq_ignore_ascii_case("help") {
            return ExecutionResult::success(help_text(self.platform).to_string());
        }

        if command.is_empty() {
            return ExecutionResult::failure("Error: empty command".to_string());
        }

        let (mut child_command, program) = match self.build_command(command) {
            Ok(built) => built,
            Err(result) => return result,
        };

        let start = Instant::now();
        let result = self.run(&mut child_command, &program).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        if let Ok(logger) = get_logger() {
            if let Ok(logger_guard) = logger.lock() {
                let _ = logger_guard.log_execution(self.launcher.name(), duration_ms, result.success);
            }
        }

        result
    }

    /// Build the child process and name the program for diagnostics
    fn build_command(&self, command: &str) -> Result<(Command, String), ExecutionResult> {
        let (mut cmd, program) = match &self.launcher {
            ProcessLauncher::Interpreter { program, flag } => {
                let mut cmd = Command::new(program);
                cmd.arg(flag);
                // cmd.exe parses its own command line; Rust's argv quoting would escape inner quotes
                #[cfg(windows)]
                cmd.raw_arg(command);
                #[cfg(not(windows))]
                cmd.arg(command);
                let shown = command.split_whitespace().next().unwrap_or(command);
                (cmd, shown.to_string())
            }
            ProcessLauncher::DirectArgv => {
                let argv = shell_words::split(command).map_err(|e| {
                    ExecutionResult::failure(format!("Could not parse command: {}", e))
                })?;
                let (program, args) = argv
                    .split_first()
                    .ok_or_else(|| ExecutionResult::failure("Error: empty command".to_string()))?;
                let mut cmd = Command::new(program);
                cmd.args(args);
                (cmd, program.clone())
            }
        };

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Ok((cmd, program))
    }

    async fn run(&self, cmd: &mut Command, program: &str) -> ExecutionResult {
        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return spawn_failure(&e, program),
        };

        // Dropping the wait future on timeout drops the child, and kill_on_drop reaps it.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let stdout = stdout.trim();
                    if stdout.is_empty() {
                        ExecutionResult::success(format!(
                            "Command executed successfully on {} (no output)",
                            self.platform
                        ))
                    } else {
                        ExecutionResult::success(format!(
                            "Command executed successfully on {}:\n{}",
                            self.platform, stdout
                        ))
                    }
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let stderr = stderr.trim();
                    if stderr.is_empty() {
                        let code = output
                            .status
                            .code()
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "unknown".to_string());
                        ExecutionResult::failure(format!("Command exited with status {}", code))
                    } else {
                        ExecutionResult::failure(stderr.to_string())
                    }
                }
            }
            Ok(Err(e)) => ExecutionResult::failure(format!("Failed to execute command: {}", e)),
            Err(_) => ExecutionResult::failure(format!(
                "Command timed out after {}",
                format_duration(self.timeout)
            )),
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_EXEC_TIMEOUT)
    }
}

fn spawn_failure(error: &std::io::Error, program: &str) -> ExecutionResult {
    match error.kind() {
        ErrorKind::NotFound => ExecutionResult::failure(format!("Command not found: {}", program)),
        ErrorKind::PermissionDenied => {
            ExecutionResult::failure(format!("Permission denied: {}", program))
        }
        _ => ExecutionResult::failure(format!("Failed to execute command: {}", error)),
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        let secs = duration.as_secs();
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Quick reference shown for `!help`, without running anything
pub fn help_text(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => WINDOWS_HELP,
        Platform::Darwin => DARWIN_HELP,
        Platform::Linux => LINUX_HELP,
    }
}

const WINDOWS_HELP: &str = "Available commands (Windows):
  Files:
    !dir                 List files in the current directory
    !type <file>         Show file contents
  Location:
    !cd                  Show the working directory
  System:
    !systeminfo          System information
    !wmic OS get FreePhysicalMemory
                         Free memory
    !wmic logicaldisk get size,freespace,caption
                         Disk usage
  Screen:
    !cls                 Clear the screen";

const LINUX_HELP: &str = "Available commands (Linux):
  Files:
    !ls -la              List files in the current directory
    !cat <file>          Show file contents
  Location:
    !pwd                 Show the working directory
  System:
    !uname -a            System information
    !free -h             Memory usage
    !df -h               Disk usage
  Screen:
    !clear               Clear the screen";

const DARWIN_HELP: &str = "Available commands (macOS):
  Files:
    !ls -la              List files in the current directory
    !cat <file>          Show file contents
  Location:
    !pwd                 Show the working directory
  System:
    !sw_vers             System information
    !vm_stat             Memory usage
    !df -h               Disk usage
  Screen:
    !clear               Clear the screen";
