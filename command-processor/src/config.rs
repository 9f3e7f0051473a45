/// Assistant configuration
///
/// Caller-supplied settings passed through the pipeline: the selected
/// language tag, whether responses are spoken, and a free-text system prompt.
/// Loaded from YAML or JSON, then overridden from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Language tags a voice can be requested for
pub const SUPPORTED_LANGUAGES: [&str; 7] =
    ["en-US", "en-GB", "es-ES", "fr-FR", "de-DE", "hi-IN", "ja-JP"];

pub const ENV_LANGUAGE: &str = "JARVIS_LANGUAGE";
pub const ENV_VOICE_OUTPUT: &str = "JARVIS_VOICE_OUTPUT";
pub const ENV_SYSTEM_PROMPT: &str = "JARVIS_SYSTEM_PROMPT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported language tag: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Recognition locale and requested voice
    pub language: String,

    /// Speak responses through the playback collaborator
    pub voice_output: bool,

    /// Free-text prompt, passed through untouched
    pub system_prompt: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            voice_output: true,
            system_prompt: String::new(),
        }
    }
}

impl AssistantConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_supported_language(&self.language) {
            return Err(ConfigError::UnsupportedLanguage(self.language.clone()));
        }

        Ok(())
    }

    /// Load from a YAML or JSON file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loading config from {}", path.display());

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Parse YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Apply `JARVIS_*` environment overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(language) = std::env::var(ENV_LANGUAGE) {
            self.language = language;
        }

        if let Ok(value) = std::env::var(ENV_VOICE_OUTPUT) {
            self.voice_output = parse_flag(&value).ok_or(ConfigError::InvalidEnv {
                var: ENV_VOICE_OUTPUT,
                value,
            })?;
        }

        if let Ok(prompt) = std::env::var(ENV_SYSTEM_PROMPT) {
            self.system_prompt = prompt;
        }

        self.validate()?;
        info!(
            "Config: language={}, voice_output={}",
            self.language, self.voice_output
        );

        Ok(())
    }
}

pub fn is_supported_language(tag: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&tag)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(ENV_LANGUAGE);
        std::env::remove_var(ENV_VOICE_OUTPUT);
        std::env::remove_var(ENV_SYSTEM_PROMPT);
    }

    #[test]
    fn test_default_config() {
        let config = AssistantConfig::default();
        assert_eq!(config.language, "en-US");
        assert!(config.voice_output);
        assert!(config.system_prompt.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_language() {
        let config = AssistantConfig {
            language: "xx-XX".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedLanguage(tag)) if tag == "xx-XX"
        ));
    }

    #[test]
    fn test_yaml_partial_fields_use_defaults() {
        let config = AssistantConfig::from_yaml("language: fr-FR\n").unwrap();
        assert_eq!(config.language, "fr-FR");
        assert!(config.voice_output);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = AssistantConfig {
            language: "ja-JP".to_string(),
            voice_output: false,
            system_prompt: "Be brief.".to_string(),
        };

        let yaml = config.to_yaml().unwrap();
        assert_eq!(AssistantConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AssistantConfig::from_json("{ not json"),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"language": "de-DE", "voice_output": false}}"#).unwrap();

        let config = AssistantConfig::from_file(file.path()).unwrap();
        assert_eq!(config.language, "de-DE");
        assert!(!config.voice_output);
    }

    #[test]
    fn test_missing_file() {
        let result = AssistantConfig::from_file("/nonexistent/jarvis.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var(ENV_LANGUAGE, "es-ES");
        std::env::set_var(ENV_VOICE_OUTPUT, "off");
        std::env::set_var(ENV_SYSTEM_PROMPT, "Answer in Spanish.");

        let mut config = AssistantConfig::default();
        config.apply_env().unwrap();
        clear_env();

        assert_eq!(config.language, "es-ES");
        assert!(!config.voice_output);
        assert_eq!(config.system_prompt, "Answer in Spanish.");
    }

    #[test]
    #[serial]
    fn test_invalid_env_flag() {
        clear_env();
        std::env::set_var(ENV_VOICE_OUTPUT, "maybe");

        let mut config = AssistantConfig::default();
        let result = config.apply_env();
        clear_env();

        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }
}
