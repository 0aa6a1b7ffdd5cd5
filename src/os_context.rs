use serde::{Deserialize, Serialize};
use std::fmt;

/// Host platform families that drive command dispatch and help text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Linux,
    Darwin,
}

/// How a confirmed command line becomes a child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessLauncher {
    /// Hand the whole line to a command interpreter so its built-ins resolve
    Interpreter {
        program: &'static str,
        flag: &'static str,
    },
    /// Split the line into words and exec argv[0] without an intermediate shell
    DirectArgv,
}

impl Platform {
    /// Detect the platform this binary is running on
    pub fn detect() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Map an OS identifier (`windows`, `linux`, `darwin`/`macos`) to a platform.
    /// Anything unrecognised is treated as Linux.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier.trim().to_lowercase().as_str() {
            "windows" | "win32" => Platform::Windows,
            "darwin" | "macos" => Platform::Darwin,
            _ => Platform::Linux,
        }
    }

    /// Name shown to users and sent to the model as an OS hint
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::Darwin => "macOS",
        }
    }

    pub fn launcher(&self) -> ProcessLauncher {
        match self {
            Platform::Windows => ProcessLauncher::Interpreter {
                program: "cmd",
                flag: "/C",
            },
            Platform::Linux | Platform::Darwin => ProcessLauncher::DirectArgv,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl ProcessLauncher {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessLauncher::Interpreter { .. } => "interpreter",
            ProcessLauncher::DirectArgv => "direct",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_identifier() {
        assert_eq!(Platform::from_identifier("windows"), Platform::Windows);
        assert_eq!(Platform::from_identifier("linux"), Platform::Linux);
        assert_eq!(Platform::from_identifier("darwin"), Platform::Darwin);
        assert_eq!(Platform::from_identifier("macos"), Platform::Darwin);
        assert_eq!(Platform::from_identifier("Windows"), Platform::Windows);
    }

    #[test]
    fn test_unknown_identifier_falls_back_to_linux() {
        assert_eq!(Platform::from_identifier("freebsd"), Platform::Linux);
        assert_eq!(Platform::from_identifier(""), Platform::Linux);
    }

    #[test]
    fn test_launcher_selection() {
        assert_eq!(
            Platform::Windows.launcher(),
            ProcessLauncher::Interpreter {
                program: "cmd",
                flag: "/C"
            }
        );
        assert_eq!(Platform::Linux.launcher(), ProcessLauncher::DirectArgv);
        assert_eq!(Platform::Darwin.launcher(), ProcessLauncher::DirectArgv);
    }

    #[test]
    fn test_detect_matches_build_target() {
        let platform = Platform::detect();
        if cfg!(target_os = "windows") {
            assert_eq!(platform, Platform::Windows);
        } else if cfg!(target_os = "macos") {
            assert_eq!(platform, Platform::Darwin);
        } else {
            assert_eq!(platform, Platform::Linux);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Platform::Darwin.to_string(), "macOS");
        assert_eq!(Platform::Windows.display_name(), "Windows");
    }
}
