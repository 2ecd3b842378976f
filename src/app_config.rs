//! Application configuration loading for CLI defaults.
//!
//! The config file is a flat list of `key = value` lines (a TOML subset):
//!
//! ```text
//! sheet_key = "2PACX-1vQ..."
//! isbn_column = "ISBN"
//! station_column = "Station name"
//! url_column = "URL"
//! headline_column = "Headline"
//! on_fetch_failure = "skip"   # or "empty"
//! read_timeout_secs = 30
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use station_links_core::{CoverageColumns, FetchFailurePolicy, HttpSettings};

use crate::cli::HttpArgs;

/// File configuration; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Published spreadsheet key for `fetch-sheet`.
    pub sheet_key: Option<String>,
    /// Coverage ISBN column.
    pub isbn_column: Option<String>,
    /// Coverage station name column.
    pub station_column: Option<String>,
    /// Coverage URL column.
    pub url_column: Option<String>,
    /// Coverage headline column; `""` disables headlines.
    pub headline_column: Option<String>,
    /// Coverage book title column; `""` disables it.
    pub book_title_column: Option<String>,
    /// Policy for failed title fetches.
    pub on_fetch_failure: Option<FetchFailurePolicy>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP total request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against CLI constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        for (field, value) in [
            ("isbn_column", &self.isbn_column),
            ("station_column", &self.station_column),
            ("url_column", &self.url_column),
        ] {
            if value.as_deref().is_some_and(|name| name.trim().is_empty()) {
                bail!("Invalid config value for `{field}`: required columns cannot be empty");
            }
        }
        Ok(())
    }

    /// Coverage column mapping: config values over built-in defaults.
    #[must_use]
    pub fn coverage_columns(&self) -> CoverageColumns {
        let defaults = CoverageColumns::default();
        CoverageColumns {
            isbn: self.isbn_column.clone().unwrap_or(defaults.isbn),
            station_name: self.station_column.clone().unwrap_or(defaults.station_name),
            url: self.url_column.clone().unwrap_or(defaults.url),
            headline: optional_column(self.headline_column.as_ref(), defaults.headline),
            book_title: optional_column(self.book_title_column.as_ref(), defaults.book_title),
        }
    }

    /// HTTP settings: CLI flags over config values over defaults.
    #[must_use]
    pub fn http_settings(&self, overrides: &HttpArgs) -> HttpSettings {
        let defaults = HttpSettings::default();
        HttpSettings {
            connect_timeout_secs: overrides
                .connect_timeout
                .or(self.connect_timeout_secs)
                .unwrap_or(defaults.connect_timeout_secs),
            read_timeout_secs: overrides
                .read_timeout
                .or(self.read_timeout_secs)
                .unwrap_or(defaults.read_timeout_secs),
        }
    }
}

fn optional_column(configured: Option<&String>, default: Option<String>) -> Option<String> {
    match configured {
        Some(name) if name.trim().is_empty() => None,
        Some(name) => Some(name.clone()),
        None => default,
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Config path that was consulted, if any.
    pub path: Option<PathBuf>,
    /// Parsed config, or defaults when no file exists.
    pub config: FileConfig,
    /// Whether a file was actually read.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/station-links/config.toml`
/// 2. `$HOME/.config/station-links/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("station-links")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("station-links")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from an explicit path, or from the default path if present.
///
/// An explicit path must exist; a missing default file just yields defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config,
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    match path.as_deref() {
        Some(path_ref) if path_ref.exists() => {
            let config = load_file_config(path_ref)?;
            Ok(LoadedConfig {
                path,
                config,
                loaded_from_file: true,
            })
        }
        _ => Ok(LoadedConfig {
            path,
            config: FileConfig::default(),
            loaded_from_file: false,
        }),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let string_value = || {
            parse_string_literal(value)
                .with_context(|| format!("Invalid `{key}` value on line {line_no}"))
        };

        match key {
            "sheet_key" => cfg.sheet_key = Some(string_value()?),
            "isbn_column" => cfg.isbn_column = Some(string_value()?),
            "station_column" => cfg.station_column = Some(string_value()?),
            "url_column" => cfg.url_column = Some(string_value()?),
            "headline_column" => cfg.headline_column = Some(string_value()?),
            "book_title_column" => cfg.book_title_column = Some(string_value()?),
            "on_fetch_failure" => {
                let parsed = string_value()?;
                let policy = parsed
                    .parse::<FetchFailurePolicy>()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("Invalid `on_fetch_failure` value on line {line_no}"))?;
                cfg.on_fetch_failure = Some(policy);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_no}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            "read_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `read_timeout_secs` value on line {line_no}")
                })?;
                cfg.read_timeout_secs = Some(parsed);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}
