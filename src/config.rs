use crate::roles::find_role;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Chat request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Command execution timeout in milliseconds
    #[serde(default = "default_exec_timeout")]
    pub exec_timeout: u64,

    /// Role key used without asking, e.g. "5" for the CLI Assistant
    #[serde(default)]
    pub default_role: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f32 {
    0.30
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_request_timeout() -> u64 {
    30000
}

fn default_exec_timeout() -> u64 {
    30000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout: default_request_timeout(),
            exec_timeout: default_exec_timeout(),
            default_role: None,
            api_key: None,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or invalid
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        if let Some(path) = &config_path {
            if path.exists() {
                return match Self::load_from(path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Warning: {}. Using safe defaults.", e);
                        Self::default()
                    }
                };
            }
        }

        Self::create_default_config(config_path)
    }

    /// Read and validate a config file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse configuration: {}", e))?;
        Self::validate_config(&config)
            .map_err(|e| anyhow!("Invalid configuration detected: {}", e))?;
        Ok(config)
    }

    fn create_default_config(config_path: Option<PathBuf>) -> Self {
        let default_config = Self::default();

        if let Some(path) = config_path {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                let _ = fs::write(
                    path,
                    serde_json::to_string_pretty(&default_config).unwrap_or_default(),
                );
            }
        }

        default_config
    }

    fn validate_config(config: &Config) -> Result<()> {
        if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
            return Err(anyhow!("api_url must be a valid HTTP/HTTPS URL"));
        }

        if config.model.trim().is_empty() {
            return Err(anyhow!("model name cannot be empty"));
        }

        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(anyhow!("temperature must be between 0.0 and 2.0"));
        }

        if config.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than 0"));
        }

        for (name, value) in [
            ("request_timeout", config.request_timeout),
            ("exec_timeout", config.exec_timeout),
        ] {
            if value == 0 {
                return Err(anyhow!("{} must be greater than 0", name));
            }
            if value > 600000 {
                return Err(anyhow!("{} cannot exceed 10 minutes (600000ms)", name));
            }
        }

        if let Some(role) = &config.default_role {
            if find_role(role).is_none() {
                return Err(anyhow!("default_role '{}' is not a known role key", role));
            }
        }

        Ok(())
    }

    /// API key from the environment, else from the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }

    pub fn display(&self) {
        println!("🤖 clichat configuration:");
        println!("API URL: {}", self.api_url);
        println!("Model: {}", self.model);
        println!("Temperature: {:.2}", self.temperature);
        println!("Max tokens: {}", self.max_tokens);
        println!("Request timeout: {}ms", self.request_timeout);
        println!("Command timeout: {}ms", self.exec_timeout);
        println!(
            "Default role: {}",
            self.default_role
                .as_deref()
                .and_then(find_role)
                .map(|role| role.name)
                .unwrap_or("ask on start")
        );
        println!(
            "API key: {}",
            if self.resolve_api_key().is_some() {
                "********"
            } else {
                "none (set GROQ_API_KEY)"
            }
        );
        if let Some(path) = Self::get_config_path() {
            println!("Config file: {}", path.display());
        }
    }

    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("clichat");
            path.push("config.json");
            path
        })
    }
}
