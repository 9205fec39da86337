mod config;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use drivelink_core::{DriveLinkError, DriveLinkResult, MediaType};
use tracing::debug;

pub use config::{DefaultConfig, DriveLinkConfig, OutputConfig};

pub const MEDIA_TYPE_ENV: &str = "DRIVELINK_MEDIA_TYPE";
pub const SIMPLE_ENV: &str = "DRIVELINK_OUTPUT_SIMPLE";
pub const COPY_ENV: &str = "DRIVELINK_COPY";

pub fn config_path() -> DriveLinkResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DriveLinkError::Config("home directory not found".to_string()))?;
    Ok(home.join(".drivelink").join("config.toml"))
}

pub fn load_config() -> DriveLinkResult<DriveLinkConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> DriveLinkResult<DriveLinkConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(DriveLinkConfig::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|err| DriveLinkError::Config(format!("failed to read config: {err}")))?;
    let config = toml::from_str(&content)
        .map_err(|err| DriveLinkError::Config(format!("failed to parse config: {err}")))?;
    Ok(config)
}

pub fn save_config(config: &DriveLinkConfig) -> DriveLinkResult<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &DriveLinkConfig) -> DriveLinkResult<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|err| DriveLinkError::Config(format!("failed to serialize config: {err}")))?;
    write_config_file(path, &content)
}

pub fn resolve_media_type(config: &DriveLinkConfig) -> DriveLinkResult<MediaType> {
    resolve_media_type_with(config, env::var(MEDIA_TYPE_ENV).ok())
}

pub fn resolve_media_type_with(
    config: &DriveLinkConfig,
    env_value: Option<String>,
) -> DriveLinkResult<MediaType> {
    if let Some(value) = env_value
        && !value.trim().is_empty()
    {
        debug!(value = %value, "media type from environment");
        return value.parse();
    }
    Ok(config.default.media_type.unwrap_or_default())
}

pub fn resolve_simple_output(config: &DriveLinkConfig) -> DriveLinkResult<bool> {
    resolve_flag_with(SIMPLE_ENV, config.output.simple, env::var(SIMPLE_ENV).ok())
}

pub fn resolve_copy(config: &DriveLinkConfig) -> DriveLinkResult<bool> {
    resolve_flag_with(COPY_ENV, config.output.copy, env::var(COPY_ENV).ok())
}

/// An empty environment value falls through to the configured one.
pub fn resolve_flag_with(
    name: &str,
    configured: Option<bool>,
    env_value: Option<String>,
) -> DriveLinkResult<bool> {
    if let Some(value) = env_value
        && !value.trim().is_empty()
    {
        return parse_flag(&value).ok_or_else(|| {
            DriveLinkError::Config(format!("expected a boolean in {name}, got '{value}'"))
        });
    }
    Ok(configured.unwrap_or(false))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn set_config_value(key_path: &str, value: &str) -> DriveLinkResult<()> {
    set_config_value_at(&config_path()?, key_path, value)
}

/// Writes one key into the config file, keeping the rest of the document
/// (comments and ordering) intact.
pub fn set_config_value_at(path: &Path, key_path: &str, value: &str) -> DriveLinkResult<()> {
    let item = match key_path {
        "default.media_type" => toml_edit::value(value.parse::<MediaType>()?.as_str()),
        "output.simple" | "output.copy" => {
            let flag = parse_flag(value).ok_or_else(|| {
                DriveLinkError::Config(format!("expected a boolean for '{key_path}', got '{value}'"))
            })?;
            toml_edit::value(flag)
        }
        _ => {
            return Err(DriveLinkError::Config(format!(
                "unknown key '{key_path}' (expected one of: {})",
                DriveLinkConfig::KEYS.join(", ")
            )));
        }
    };

    let content = if path.exists() {
        fs::read_to_string(path)
            .map_err(|err| DriveLinkError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|err| DriveLinkError::Config(format!("failed to parse config: {err}")))?;

    let Some((table_name, key)) = key_path.split_once('.') else {
        return Err(DriveLinkError::Config(format!("invalid key path '{key_path}'")));
    };
    let table = doc
        .as_table_mut()
        .entry(table_name)
        .or_insert(toml_edit::Item::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| DriveLinkError::Config(format!("cannot set nested value in '{key_path}'")))?;
    table[key] = item;

    write_config_file(path, &doc.to_string())
}

pub fn open_in_editor() -> DriveLinkResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&DriveLinkConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "vim".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor).arg(&path).status().map_err(|err| {
        DriveLinkError::Config(format!("failed to open editor '{editor}': {err}"))
    })?;

    if !status.success() {
        return Err(DriveLinkError::Config(format!(
            "editor exited with status: {status}"
        )));
    }

    Ok(())
}

fn write_config_file(path: &Path, content: &str) -> DriveLinkResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| DriveLinkError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(path, content)
        .map_err(|err| DriveLinkError::Config(format!("failed to write config: {err}")))?;
    debug!(path = %path.display(), "config written");
    Ok(())
}
