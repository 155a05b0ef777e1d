use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONF_LANGS_PATH_KEY: &str = "messagefiles.path";
pub const CONF_DEFAULT_LOCALE_KEY: &str = "messagefiles.defaultLocale";
pub const CONF_ENABLE_DIAGNOSTICS_KEY: &str = "messagefiles.enableDiagnostics";

pub type Messages = std::collections::HashMap<String, String>;

/// How a locale's previous table is treated when its directory is loaded again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Discard the previous table before installing this pass's entries.
    Replace,
    /// Merge this pass's entries on top of the previous table.
    #[default]
    Accumulate,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergePolicy::Replace => write!(f, "replace"),
            MergePolicy::Accumulate => write!(f, "accumulate"),
        }
    }
}

// Plugin configuration, read from MESSAGEFILES_* variables
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageFilesConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub default_locale: Option<String>,
    #[serde(default = "default_false")]
    pub enable_diagnostics: bool,
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

impl MessageFilesConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("MESSAGEFILES_").from_env::<Self>()
    }
}

// Host application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub application_langs: String, // Raw string from env
    #[serde(skip)]
    pub langs: Vec<String>,
    #[serde(default = "default_app_root")]
    pub app_root: PathBuf,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        let mut config = envy::from_env::<Self>()?;
        config.parse_langs();
        Ok(config)
    }

    // Method to parse the known locales after deserialization
    pub fn parse_langs(&mut self) {
        let mut langs: Vec<String> = Vec::new();
        for lang in self.application_langs.split(',').map(str::trim) {
            if !lang.is_empty() && !langs.iter().any(|l| l == lang) {
                langs.push(lang.to_string());
            }
        }
        self.langs = langs;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("POLL_INTERVAL_SECS must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn default_false() -> bool { false }
fn default_app_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
fn default_poll_interval() -> u64 { 2 }
