use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV_VAR: &str = "PARSEBENCH_CONFIG";

const MIN_DPI: u32 = 72;
const MAX_DPI: u32 = 1200;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Picks the config file to load: an explicit path wins, then
/// `PARSEBENCH_CONFIG`, then `<config dir>/parsebench/config.json` if it
/// exists. `None` means built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(value) = std::env::var(CONFIG_ENV_VAR) {
        if !value.trim().is_empty() {
            return Some(PathBuf::from(value));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("parsebench").join("config.json"))
        .filter(|path| path.is_file())
}

/// Loads the resolved config file, or defaults when there is none.
pub fn load_config_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match resolve_config_path(explicit) {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            load_config(path)
        }
        None => {
            log::debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if !(MIN_DPI..=MAX_DPI).contains(&config.ocr.dpi) {
        return Err(ConfigError::Validation {
            message: format!(
                "OCR dpi must be between {} and {}, got {}",
                MIN_DPI, MAX_DPI, config.ocr.dpi
            ),
        });
    }

    if config.ocr.enabled && config.ocr.languages.iter().any(|l| l.trim().is_empty()) {
        return Err(ConfigError::Validation {
            message: "OCR languages must not contain empty entries".to_string(),
        });
    }

    if config.extraction.attempt_timeout_secs == Some(0) {
        return Err(ConfigError::Validation {
            message: "attempt_timeout_secs must be greater than zero".to_string(),
        });
    }

    let scores_filename = &config.scoring.scores_filename;
    if scores_filename.contains('/') || scores_filename.contains('\\') {
        return Err(ConfigError::Validation {
            message: format!(
                "scores_filename must be a bare file name: {}",
                scores_filename
            ),
        });
    }

    Ok(())
}
