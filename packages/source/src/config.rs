//! Layered dashboard configuration.
//!
//! The default configuration is baked into the binary at compile time via
//! [`include_str!`]. A user file only needs the keys it changes: its
//! tables are merged key-by-key over the default before deserializing.
//! Environment variables are applied last.

use std::path::Path;

use prison_viz_dashboard_models::DashboardConfig;

use crate::SourceError;

/// Default configuration embedded at compile time.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Overrides `data.records_url`.
pub const RECORDS_URL_VAR: &str = "PRISON_VIZ_RECORDS_URL";
/// Overrides `data.counties_url`.
pub const COUNTIES_URL_VAR: &str = "PRISON_VIZ_COUNTIES_URL";
/// Overrides `output.directory`.
pub const OUTPUT_DIR_VAR: &str = "PRISON_VIZ_OUTPUT_DIR";

/// Loads the configuration: embedded default, then the optional file at
/// `path`, then environment overrides.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or the merged
/// configuration does not match the schema.
pub fn load(path: Option<&Path>) -> Result<DashboardConfig, SourceError> {
    let overlay = match path {
        Some(path) => {
            log::info!("Loading dashboard config from {}", path.display());
            std::fs::read_to_string(path)?
        }
        None => String::new(),
    };

    let mut config = parse_with_overlay(&overlay)?;
    apply_env(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Parses `overlay` TOML on top of [`DEFAULT_CONFIG`].
///
/// # Errors
///
/// Returns [`SourceError::Config`] if either document is invalid TOML or
/// the merged result does not match the schema.
pub fn parse_with_overlay(overlay: &str) -> Result<DashboardConfig, SourceError> {
    let mut base: toml::Table = toml::from_str(DEFAULT_CONFIG)?;
    let overlay: toml::Table = toml::from_str(overlay)?;
    merge(&mut base, overlay);
    Ok(toml::Value::Table(base).try_into()?)
}

fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) if matches!(base.get(&key), Some(toml::Value::Table(_))) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge(existing, incoming);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Applies environment overrides using `lookup` to read variables.
/// Blank values are ignored.
pub fn apply_env(config: &mut DashboardConfig, lookup: impl Fn(&str) -> Option<String>) {
    let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = read(RECORDS_URL_VAR) {
        log::debug!("{RECORDS_URL_VAR} overrides records URL");
        config.data.records_url = url;
    }
    if let Some(url) = read(COUNTIES_URL_VAR) {
        log::debug!("{COUNTIES_URL_VAR} overrides counties URL");
        config.data.counties_url = url;
    }
    if let Some(dir) = read(OUTPUT_DIR_VAR) {
        config.output.directory = dir.into();
    }
}
