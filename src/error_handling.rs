use crate::logging::{get_logger, LogCategory, LogContext};
use colored::*;
use std::fmt;

/// Error with actionable suggestions, shown when setup or a request fails
#[derive(Debug, Clone)]
pub struct UserFriendlyError {
    pub error_type: ErrorType,
    pub message: String,
    pub suggestions: Vec<String>,
    pub technical_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorType {
    Connection,
    Configuration,
    Authentication,
    RateLimit,
    Timeout,
    General,
}

impl UserFriendlyError {
    pub fn new(error_type: ErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            suggestions: Vec::new(),
            technical_details: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions.extend(suggestions);
        self
    }

    pub fn with_technical_details(mut self, details: String) -> Self {
        self.technical_details = Some(details);
        self
    }

    pub fn display(&self) {
        if let Ok(logger) = get_logger() {
            if let Ok(logger_guard) = logger.lock() {
                let context = LogContext::new()
                    .with_component("error_handling")
                    .with_operation("display_error")
                    .with_success(false);
                let _ = logger_guard.log_error(
                    LogCategory::System,
                    format!("{:?}: {}", self.error_type, self.message),
                    Some(context),
                );
            }
        }

        let (icon, title) = match self.error_type {
            ErrorType::Connection => ("🔌", "Connection Error"),
            ErrorType::Configuration => ("⚙️", "Configuration Error"),
            ErrorType::Authentication => ("🔐", "Authentication Error"),
            ErrorType::RateLimit => ("🚦", "Rate Limit"),
            ErrorType::Timeout => ("⏱️", "Timeout Error"),
            ErrorType::General => ("❌", "Error"),
        };

        eprintln!("{} {}: {}", icon, title.bold().red(), self.message);

        if !self.suggestions.is_empty() {
            eprintln!();
            eprintln!("{} {}", "💡".cyan(), "Suggested solutions:".bold().yellow());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", (i + 1).to_string().green(), suggestion);
            }
        }

        if let Some(details) = &self.technical_details {
            eprintln!();
            eprintln!("{} {}", "🔧".dimmed(), "Technical details:".dimmed());
            eprintln!("   {}", details.dimmed());
        }
    }
}

impl fmt::Display for UserFriendlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UserFriendlyError {}

/// Convert an error into a user-facing explanation with next steps
pub fn enhance_error(error: &anyhow::Error) -> UserFriendlyError {
    let error_msg = error.to_string().to_lowercase();

    let (error_type, message, suggestions): (ErrorType, &str, &[&str]) =
        if error_msg.contains("no api key") {
            (
                ErrorType::Configuration,
                "No API key configured",
                &[
                    "Export your key: export GROQ_API_KEY=<your key>",
                    "Or add \"api_key\" to the config file shown by: clichat config",
                ],
            )
        } else if error_msg.contains("invalid api key") || error_msg.contains("unauthorized") {
            (
                ErrorType::Authentication,
                "The API rejected the configured key",
                &[
                    "Check that GROQ_API_KEY holds a current key",
                    "Create a new key in the provider console if it was revoked",
                ],
            )
        } else if error_msg.contains("rate limit") || error_msg.contains("too many requests") {
            (
                ErrorType::RateLimit,
                "Rate limit exceeded",
                &["Wait a moment and try again", "Switch to a smaller model in the config file"],
            )
        } else if error_msg.contains("timed out") || error_msg.contains("timeout") {
            (
                ErrorType::Timeout,
                "Request timed out",
                &[
                    "Try again - the service may be busy",
                    "Raise request_timeout in the config file",
                ],
            )
        } else if error_msg.contains("connection") || error_msg.contains("dns") {
            (
                ErrorType::Connection,
                "Unable to reach the chat API",
                &[
                    "Check your internet connection",
                    "Verify api_url in the config file",
                ],
            )
        } else if error_msg.contains("config") {
            (
                ErrorType::Configuration,
                "Configuration issue detected",
                &[
                    "Check your configuration: clichat config",
                    "Reset to defaults by deleting the config file",
                ],
            )
        } else {
            (
                ErrorType::General,
                "An unexpected error occurred",
                &["Try the request again", "Report this issue if it persists"],
            )
        };

    UserFriendlyError::new(error_type, message.to_string())
        .with_suggestions(suggestions.iter().map(|s| s.to_string()).collect())
        .with_technical_details(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_missing_key() {
        let enhanced = enhance_error(&anyhow!(
            "No API key configured. Set GROQ_API_KEY or add api_key to the config file"
        ));
        assert_eq!(enhanced.error_type, ErrorType::Configuration);
        assert!(enhanced.suggestions.iter().any(|s| s.contains("GROQ_API_KEY")));
    }

    #[test]
    fn test_invalid_key() {
        let enhanced = enhance_error(&anyhow!("Invalid API key"));
        assert_eq!(enhanced.error_type, ErrorType::Authentication);
    }

    #[test]
    fn test_rate_limit() {
        let enhanced = enhance_error(&anyhow!("Rate limit exceeded. Please try again later."));
        assert_eq!(enhanced.error_type, ErrorType::RateLimit);
    }

    #[test]
    fn test_timeout() {
        let enhanced = enhance_error(&anyhow!("Request timed out. Please try again."));
        assert_eq!(enhanced.error_type, ErrorType::Timeout);
        assert!(!enhanced.suggestions.is_empty());
    }

    #[test]
    fn test_connection() {
        let enhanced =
            enhance_error(&anyhow!("Connection failed. Please check your internet connection."));
        assert_eq!(enhanced.error_type, ErrorType::Connection);
    }

    #[test]
    fn test_generic_keeps_details() {
        let enhanced = enhance_error(&anyhow!("something odd"));
        assert_eq!(enhanced.error_type, ErrorType::General);
        assert_eq!(enhanced.technical_details.as_deref(), Some("something odd"));
        assert_eq!(enhanced.to_string(), "An unexpected error occurred");
    }
}
