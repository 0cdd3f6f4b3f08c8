//! Hub configuration.
//!
//! Configuration is plain TOML. Every key is optional; without
//! `max_members` the hub takes any number of members:
//!
//! ```toml
//! command_buffer = 100
//! event_buffer = 100
//! max_members = 500
//!
//! [[locales]]
//! name = "en-US"
//! joined_second = "joined the chat."
//! joined_third = "joined the chat."
//! left_second = "left the chat."
//! left_third = "left the chat."
//! say_second = "said"
//! say_third = "said"
//! pronoun = "You"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use polychat_core::Locale;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the path of a TOML configuration file.
pub const CONFIG_ENV_VAR: &str = "POLYCHAT_CONFIG";

// ============================================================================
// Config Errors
// ============================================================================

/// Errors raised while loading or querying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// No built-in or configured locale has this name.
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
}

// ============================================================================
// Hub Config
// ============================================================================

/// Broadcaster settings and extra locale tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HubConfig {
    /// Capacity of the actor's command channel.
    pub command_buffer: usize,

    /// Capacity of the hub event channel; slow observers lag beyond it.
    pub event_buffer: usize,

    /// Maximum number of simultaneous members, unbounded when unset.
    pub max_members: Option<usize>,

    /// Locales supplied as data, in addition to the built-in ones.
    pub locales: Vec<Locale>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            command_buffer: 100,
            event_buffer: 100,
            max_members: None,
            locales: Vec::new(),
        }
    }
}

impl HubConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the file named by `POLYCHAT_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    /// Checks value ranges and that locale names are unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_buffer == 0 {
            return Err(ConfigError::Invalid {
                field: "command_buffer",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid {
                field: "event_buffer",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_members == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_members",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(locale) = self.locales.iter().find(|l| l.name.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "locales",
                reason: format!("locale with empty name (pronoun {:?})", locale.pronoun),
            });
        }
        for (i, locale) in self.locales.iter().enumerate() {
            let duplicate = self.locales[..i]
                .iter()
                .any(|earlier| earlier.name.eq_ignore_ascii_case(&locale.name));
            if duplicate {
                return Err(ConfigError::Invalid {
                    field: "locales",
                    reason: format!("locale {} defined more than once", locale.name),
                });
            }
        }
        Ok(())
    }

    /// Resolves a locale by name.
    ///
    /// Configured tables take precedence (matched case-insensitively), so a
    /// configuration can override a built-in table.
    pub fn locale(&self, name: &str) -> Result<Locale, ConfigError> {
        self.locales
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .cloned()
            .or_else(|| Locale::builtin(name))
            .ok_or_else(|| ConfigError::UnknownLocale(name.to_string()))
    }
}
