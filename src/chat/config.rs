//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, an optional YAML
//! configuration file, and the resolved [`ChatConfig`].  Command-line values
//! win over the file; the file wins over the environment; the environment
//! wins over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::HINT_DELAY;

/// Command-line arguments for the channelchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base address.
    #[arrrg(
        optional,
        "Backend base URL (default: $CHANNELCHAT_API_BASE_URL or http://localhost:8000)",
        "URL"
    )]
    pub base_url: Option<String>,

    /// YAML configuration file.
    #[arrrg(optional, "YAML configuration file", "FILE")]
    pub config: Option<String>,

    /// Per-request timeout.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Delay before the wake-up hint.
    #[arrrg(optional, "Wake-up hint delay in milliseconds (default: 2500)", "MILLIS")]
    pub hint_delay_ms: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// On-disk configuration, every key optional.
///
/// ```yaml
/// base_url: https://channelchat.example.com
/// timeout_secs: 120
/// hint_delay_ms: 2500
/// color: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfigFile {
    /// Backend base address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Wake-up hint delay in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_delay_ms: Option<u64>,
    /// Whether to use ANSI colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl ChatConfigFile {
    /// Parses a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::io(format!("failed to read config {}", path.display()), err)
        })?;
        Self::from_yaml(&content)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments and the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend base address.  `None` defers to the environment and then the default.
    pub base_url: Option<String>,

    /// Per-request timeout.  `None` waits as long as the backend needs.
    pub request_timeout: Option<Duration>,

    /// How long a channel lookup may be pending before the wake-up hint shows.
    pub hint_delay: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Configuration file the values were read from, if any.
    pub config_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from the environment, else `http://localhost:8000`
    /// - Request timeout: none
    /// - Hint delay: 2.5 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            request_timeout: None,
            hint_delay: HINT_DELAY,
            use_color: true,
            config_path: None,
        }
    }

    /// Resolves configuration from command-line arguments, reading the
    /// configuration file they name.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ChatConfigFile::from_file(path)?,
            None => ChatConfigFile::default(),
        };
        let mut config = Self::new().with_file(file);
        config.config_path = args.config.map(PathBuf::from);
        if let Some(base_url) = args.base_url {
            config.base_url = Some(base_url);
        }
        if let Some(secs) = args.timeout_secs {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(millis) = args.hint_delay_ms {
            config.hint_delay = Duration::from_millis(millis);
        }
        if args.no_color {
            config.use_color = false;
        }
        Ok(config)
    }

    /// Overlays the values present in a configuration file.
    pub fn with_file(mut self, file: ChatConfigFile) -> Self {
        if let Some(base_url) = file.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(millis) = file.hint_delay_ms {
            self.hint_delay = Duration::from_millis(millis);
        }
        if let Some(color) = file.color {
            self.use_color = color;
        }
        self
    }

    /// Sets the backend base address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the wake-up hint delay.
    pub fn with_hint_delay(mut self, delay: Duration) -> Self {
        self.hint_delay = delay;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.base_url.is_none());
        assert!(config.request_timeout.is_none());
        assert_eq!(config.hint_delay, Duration::from_millis(2500));
        assert!(config.use_color);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from_args(ChatArgs::default()).unwrap();
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            base_url: Some("https://backend.example".to_string()),
            config: None,
            timeout_secs: Some(90),
            hint_delay_ms: Some(1000),
            no_color: true,
        };
        let config = ChatConfig::from_args(args).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://backend.example"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(90)));
        assert_eq!(config.hint_delay, Duration::from_secs(1));
        assert!(!config.use_color);
    }

    #[test]
    fn file_values_overlay_defaults() {
        let file = ChatConfigFile::from_yaml(
            "base_url: http://10.0.0.2:8000\ntimeout_secs: 30\ncolor: false\n",
        )
        .unwrap();
        let config = ChatConfig::new().with_file(file);
        assert_eq!(config.base_url.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.hint_delay, HINT_DELAY);
        assert!(!config.use_color);
    }

    #[test]
    fn args_win_over_file() {
        let path = std::env::temp_dir().join(format!(
            "channelchat-config-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "base_url: http://from-file\nhint_delay_ms: 10\n").unwrap();
        let args = ChatArgs {
            base_url: Some("http://from-args".to_string()),
            config: Some(path.display().to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::from_args(args).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://from-args"));
        assert_eq!(config.hint_delay, Duration::from_millis(10));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = ChatConfigFile::from_yaml("base_uri: typo\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(
            ChatConfigFile::from_yaml("\n").unwrap(),
            ChatConfigFile::default()
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ChatConfigFile::from_file("/nonexistent/channelchat.yaml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("http://127.0.0.1:9")
            .with_request_timeout(Some(Duration::from_secs(5)))
            .with_hint_delay(Duration::from_millis(100))
            .without_color();
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:9"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.hint_delay, Duration::from_millis(100));
        assert!(!config.use_color);
    }
}
