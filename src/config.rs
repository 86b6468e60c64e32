use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::cleaner::{CleanOptions, DEFAULT_KEEP_INFO};

pub const DEFAULT_CONFIG_FILE: &str = "subclean.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub cleaning: Cleaning,
    pub output: Output,
}

impl Config {
    pub fn load(path_opt: Option<&Path>) -> Result<Self> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let path = if let Some(p) = path_opt {
            Some(p)
        } else if default_path.exists() {
            Some(default_path)
        } else {
            None
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading config file: {}", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        let s = toml::to_string_pretty(self).context("failed serializing config as TOML")?;
        Ok(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
    pub debug_line_samples: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            debug_line_samples: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Cleaning {
    pub strip_comments: bool,
    pub strip_info: bool,
    pub keep_info: Vec<String>,
}

impl Default for Cleaning {
    fn default() -> Self {
        Self {
            strip_comments: false,
            strip_info: false,
            keep_info: DEFAULT_KEEP_INFO.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Cleaning {
    /// Command-line flags can only switch stripping on.
    pub fn options(&self, strip_comments: bool, strip_info: bool) -> CleanOptions {
        CleanOptions {
            strip_comments: self.strip_comments || strip_comments,
            strip_info: self.strip_info || strip_info,
            keep_info: self.keep_info.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub byte_order_mark: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            byte_order_mark: true,
        }
    }
}

pub fn init_tracing(logging: &Logging, cli_override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let is_json = logging.format.to_lowercase() == "json";

    // stdout may carry the converted script
    if is_json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .event_format(fmt::format().json())
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .pretty()
            .init();
    }

    tracing::debug!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg = Config::from_toml("[cleaning]\nstrip_info = true\n").unwrap();
        assert!(cfg.cleaning.strip_info);
        assert!(!cfg.cleaning.strip_comments);
        assert_eq!(cfg.cleaning.keep_info.len(), DEFAULT_KEEP_INFO.len());
        assert!(cfg.output.byte_order_mark);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = Config::default().to_toml_pretty().unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.cleaning.keep_info, Config::default().cleaning.keep_info);
        assert_eq!(back.logging.format, "pretty");
    }

    #[test]
    fn flags_only_enable_stripping() {
        let cleaning = Cleaning {
            strip_comments: true,
            ..Cleaning::default()
        };
        let opts = cleaning.options(false, true);
        assert!(opts.strip_comments);
        assert!(opts.strip_info);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed reading config file"));
    }
}
