use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

/// Privacy-preserving file logger for clichat
///
/// Chat content and executed command lines are never written. Entries record
/// what kind of operation happened, how long it took and whether it worked.
pub struct PrivacyLogger {
    log_file_path: PathBuf,
    writer: Arc<Mutex<Option<std::fs::File>>>,
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
    pub context: Option<LogContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
}

/// Categories for different types of log events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LogCategory {
    System,
    Configuration,
    Provider,
    Execution,
    Clipboard,
}

/// Context information for log entries (privacy-safe)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogContext {
    pub component: Option<String>,
    pub operation: Option<String>,
    pub duration_ms: Option<u64>,
    pub os_type: Option<String>,
    pub success: Option<bool>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_os_type(mut self, os_type: &str) -> Self {
        self.os_type = Some(os_type.to_string());
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }
}

impl PrivacyLogger {
    /// Create a logger writing to the default location under the config directory
    pub fn new() -> Result<Self> {
        Self::with_path(Self::get_log_file_path()?)
    }

    /// Create a logger writing to an explicit file
    pub fn with_path(log_file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            log_file_path,
            writer: Arc::new(Mutex::new(None)),
        })
    }

    pub fn log_error(&self, category: LogCategory, message: String, context: Option<LogContext>) -> Result<()> {
        self.log(LogLevel::Error, category, message, context)
    }

    pub fn log_warning(&self, category: LogCategory, message: String, context: Option<LogContext>) -> Result<()> {
        self.log(LogLevel::Warning, category, message, context)
    }

    pub fn log_info(&self, category: LogCategory, message: String, context: Option<LogContext>) -> Result<()> {
        self.log(LogLevel::Info, category, message, context)
    }

    fn log(
        &self,
        level: LogLevel,
        category: LogCategory,
        message: String,
        context: Option<LogContext>,
    ) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            category,
            message: redact_sensitive_info(&message),
            context,
        };

        self.write_log_entry(&entry)
    }

    /// Log application startup
    pub fn log_startup(&self, version: &str, os_info: &str) -> Result<()> {
        let context = LogContext::new()
            .with_component("system")
            .with_operation("startup")
            .with_os_type(os_info);

        self.log_info(
            LogCategory::System,
            format!("clichat {} started", version),
            Some(context),
        )
    }

    /// Log the outcome of a command execution. The command text itself is not recorded.
    pub fn log_execution(&self, launcher: &str, duration_ms: u64, success: bool) -> Result<()> {
        let context = LogContext::new()
            .with_component("executor")
            .with_operation(launcher)
            .with_duration_ms(duration_ms)
            .with_success(success);

        let level = if success { LogLevel::Info } else { LogLevel::Warning };
        self.log(
            level,
            LogCategory::Execution,
            format!(
                "Command execution {} ({}ms)",
                if success { "succeeded" } else { "failed" },
                duration_ms
            ),
            Some(context),
        )
    }

    /// Log a chat-completion round trip
    pub fn log_provider_operation(&self, provider: &str, duration_ms: u64, success: bool) -> Result<()> {
        let context = LogContext::new()
            .with_component("provider")
            .with_operation("complete")
            .with_duration_ms(duration_ms)
            .with_success(success);

        let level = if success { LogLevel::Info } else { LogLevel::Warning };
        self.log(
            level,
            LogCategory::Provider,
            format!(
                "Provider {} complete: {} ({}ms)",
                provider,
                if success { "success" } else { "failed" },
                duration_ms
            ),
            Some(context),
        )
    }

    fn get_log_file_path() -> Result<PathBuf> {
        let mut log_path =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
        log_path.push("clichat");
        log_path.push("clichat.log");
        Ok(log_path)
    }

    fn write_log_entry(&self, entry: &LogEntry) -> Result<()> {
        let mut writer_guard = self
            .writer
            .lock()
            .map_err(|_| anyhow!("Failed to acquire log writer lock"))?;

        if writer_guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file_path)?;
            *writer_guard = Some(file);
        }

        if let Some(ref mut file) = *writer_guard {
            writeln!(file, "{}", format_log_entry(entry))?;
            file.flush()?;
        }

        Ok(())
    }

    pub fn get_current_log_path(&self) -> &PathBuf {
        &self.log_file_path
    }

    /// Remove the log file; the next entry recreates it
    pub fn clear_logs(&self) -> Result<()> {
        {
            let mut writer_guard = self
                .writer
                .lock()
                .map_err(|_| anyhow!("Failed to acquire log writer lock"))?;
            *writer_guard = None;
        }

        if self.log_file_path.exists() {
            fs::remove_file(&self.log_file_path)?;
        }

        self.log_info(LogCategory::System, "Log file cleared".to_string(), None)
    }
}

fn format_log_entry(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
    let level = format!("{:?}", entry.level).to_uppercase();
    let category = format!("{:?}", entry.category).to_uppercase();

    let mut formatted = format!("[{}] {} {} {}", timestamp, level, category, entry.message);

    if let Some(ref context) = entry.context {
        let mut parts = Vec::new();
        if let Some(ref component) = context.component {
            parts.push(format!("component={}", component));
        }
        if let Some(ref operation) = context.operation {
            parts.push(format!("operation={}", operation));
        }
        if let Some(duration) = context.duration_ms {
            parts.push(format!("duration={}ms", duration));
        }
        if let Some(ref os_type) = context.os_type {
            parts.push(format!("os={}", os_type));
        }
        if let Some(success) = context.success {
            parts.push(format!("success={}", success));
        }
        if !parts.is_empty() {
            formatted.push_str(&format!(" [{}]", parts.join(", ")));
        }
    }

    formatted
}

fn redaction_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"/home/[^/\s]+", "/home/[USER]"),
            (r"/Users/[^/\s]+", "/Users/[USER]"),
            (r"api_key=\S+", "api_key=[REDACTED]"),
            (r"token=\S+", "token=[REDACTED]"),
            (r"Bearer\s+\S+", "Bearer [REDACTED]"),
            (r"gsk_[A-Za-z0-9]+", "gsk_[REDACTED]"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
        .collect()
    })
}

/// Strip user names and credentials out of a log message
pub fn redact_sensitive_info(message: &str) -> String {
    redaction_rules()
        .iter()
        .fold(message.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

static GLOBAL_LOGGER: OnceLock<Arc<Mutex<PrivacyLogger>>> = OnceLock::new();

/// Initialize the global logger
pub fn init_logger() -> Result<()> {
    let logger = PrivacyLogger::new()?;
    let _ = GLOBAL_LOGGER.set(Arc::new(Mutex::new(logger)));
    Ok(())
}

/// Get the global logger instance
pub fn get_logger() -> Result<Arc<Mutex<PrivacyLogger>>> {
    GLOBAL_LOGGER
        .get()
        .cloned()
        .ok_or_else(|| anyhow!("Logger not initialized. Call init_logger() first."))
}

#[macro_export]
macro_rules! log_warning {
    ($category:expr, $message:expr) => {
        if let Ok(logger) = $crate::logging::get_logger() {
            if let Ok(logger_guard) = logger.lock() {
                let _ = logger_guard.log_warning($category, $message.to_string(), None);
            }
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($category:expr, $message:expr) => {
        if let Ok(logger) = $crate::logging::get_logger() {
            if let Ok(logger_guard) = logger.lock() {
                let _ = logger_guard.log_info($category, $message.to_string(), None);
            }
        }
    };
}
