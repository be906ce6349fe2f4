use crate::error::{AnalysisError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Where the model API key lives. The key is looked up every time it is
/// needed, never cached, so a key added mid-session is picked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretStore {
    /// Name of the key, both as environment variable and as entry in the
    /// secrets file.
    pub key_name: String,
    /// Optional TOML file of `NAME = "value"` pairs, consulted after the
    /// environment.
    pub secrets_file: Option<PathBuf>,
}

impl Default for SecretStore {
    fn default() -> Self {
        Self {
            key_name: DEFAULT_API_KEY_VAR.to_string(),
            secrets_file: None,
        }
    }
}

impl SecretStore {
    pub fn new(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            secrets_file: None,
        }
    }

    pub fn with_secrets_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.secrets_file = Some(path.into());
        self
    }

    /// Resolves the API key. Blank values count as absent.
    pub fn api_key(&self) -> Result<String> {
        if let Some(value) = non_blank(std::env::var(&self.key_name).ok()) {
            debug!("Using API key from environment variable {}", self.key_name);
            return Ok(value);
        }

        if let Some(path) = &self.secrets_file {
            if path.exists() {
                let secrets = read_secrets_file(path)?;
                if let Some(value) = non_blank(secrets.get(&self.key_name).cloned()) {
                    debug!("Using API key from {}", path.display());
                    return Ok(value);
                }
            }
        }

        Err(AnalysisError::Credential(format!(
            "API key not found. Set '{}' in the environment or in the secrets file.",
            self.key_name
        )))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_secrets_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&text)?;

    Ok(table
        .into_iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub base_url: String,
    pub secrets: SecretStore,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            secrets: SecretStore::default(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
