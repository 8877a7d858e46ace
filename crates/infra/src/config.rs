//! Process configuration read from the environment.

use thiserror::Error;

use backoffice_core::LocationId;
use backoffice_observability::LogFormat;
use backoffice_products::MAX_ATTRIBUTES;

pub const MAX_ATTRIBUTES_ENV: &str = "BACKOFFICE_MAX_ATTRIBUTES";
pub const LOCATIONS_ENV: &str = "BACKOFFICE_LOCATIONS";
pub const LOG_FORMAT_ENV: &str = backoffice_observability::tracing::LOG_FORMAT_ENV;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackofficeConfig {
    /// Upper bound on option attributes per product (1..=3).
    pub max_attributes: usize,
    /// Locations stock is allocated across, in display order.
    pub locations: Vec<LocationId>,
    pub log_format: LogFormat,
}

impl Default for BackofficeConfig {
    fn default() -> Self {
        Self {
            max_attributes: MAX_ATTRIBUTES,
            locations: vec![LocationId::new(1)],
            log_format: LogFormat::Json,
        }
    }
}

impl BackofficeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = read(MAX_ATTRIBUTES_ENV) {
            let max = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::invalid(MAX_ATTRIBUTES_ENV, e.to_string()))?;
            if !(1..=MAX_ATTRIBUTES).contains(&max) {
                return Err(ConfigError::invalid(
                    MAX_ATTRIBUTES_ENV,
                    format!("must be between 1 and {MAX_ATTRIBUTES}, got {max}"),
                ));
            }
            config.max_attributes = max;
        }

        if let Some(raw) = read(LOCATIONS_ENV) {
            let mut locations: Vec<LocationId> = Vec::new();
            for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let id = part
                    .parse::<LocationId>()
                    .map_err(|e| ConfigError::invalid(LOCATIONS_ENV, e.to_string()))?;
                if !locations.contains(&id) {
                    locations.push(id);
                }
            }
            if locations.is_empty() {
                return Err(ConfigError::invalid(LOCATIONS_ENV, "no location ids given"));
            }
            config.locations = locations;
        }

        if let Some(raw) = read(LOG_FORMAT_ENV) {
            config.log_format = raw
                .parse()
                .map_err(|e: backoffice_observability::UnknownLogFormat| {
                    ConfigError::invalid(LOG_FORMAT_ENV, e.to_string())
                })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = BackofficeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BackofficeConfig::default());
        assert_eq!(config.max_attributes, 3);
        assert_eq!(config.locations, vec![LocationId::new(1)]);
    }

    #[test]
    fn reads_every_variable() {
        let config = BackofficeConfig::from_lookup(lookup(&[
            ("BACKOFFICE_MAX_ATTRIBUTES", "2"),
            ("BACKOFFICE_LOCATIONS", "4, 9,4"),
            ("BACKOFFICE_LOG_FORMAT", "pretty"),
        ]))
        .unwrap();
        assert_eq!(config.max_attributes, 2);
        assert_eq!(config.locations, vec![LocationId::new(4), LocationId::new(9)]);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn max_attributes_out_of_range_is_rejected() {
        for raw in ["0", "4", "three"] {
            let err =
                BackofficeConfig::from_lookup(lookup(&[("BACKOFFICE_MAX_ATTRIBUTES", raw)]))
                    .unwrap_err();
            match err {
                ConfigError::Invalid { var, .. } => assert_eq!(var, MAX_ATTRIBUTES_ENV),
            }
        }
    }

    #[test]
    fn malformed_location_is_rejected() {
        let err = BackofficeConfig::from_lookup(lookup(&[("BACKOFFICE_LOCATIONS", "1,x")]))
            .unwrap_err();
        assert!(err.to_string().starts_with("BACKOFFICE_LOCATIONS"));
    }
}
