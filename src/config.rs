use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::geo::Coordinates;
use crate::source::{DEFAULT_GEOLOCATION_URL, DEFAULT_ISS_URL};
use crate::tracker::{ErrorPolicy, TrackerSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field} {value:?}: {source}")]
    Duration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("invalid location {0:?}, expected \"lat, lon\"")]
    Location(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub iss_url: String,
    pub geolocation_url: String,
    /// Pause before every poll, e.g. `1s`, `500ms`.
    pub interval: String,
    /// Upper bound for each HTTP request.
    pub timeout: String,
    /// Number of reports to print, 0 for no limit.
    pub count: u64,
    pub on_error: ErrorPolicy,
    /// `"lat, lon"` to skip the IP geolocation lookup.
    pub location: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iss_url: DEFAULT_ISS_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            interval: "1s".to_string(),
            timeout: "10s".to_string(),
            count: 0,
            on_error: ErrorPolicy::default(),
            location: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        parse_duration("interval", &self.interval)
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        let timeout = parse_duration("timeout", &self.timeout)?;
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(timeout)
    }

    pub fn fixed_location(&self) -> Result<Option<Coordinates>, ConfigError> {
        self.location
            .as_deref()
            .map(|s| Coordinates::from_coordinates(s).ok_or_else(|| ConfigError::Location(s.into())))
            .transpose()
    }

    pub fn tracker_settings(&self) -> Result<TrackerSettings, ConfigError> {
        Ok(TrackerSettings {
            poll_interval: self.poll_interval()?,
            on_error: self.on_error,
        })
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::Duration {
        field,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.iss_url, "http://api.open-notify.org/iss-now.json");
        assert_eq!(config.poll_interval().unwrap(), Duration::from_secs(1));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(config.fixed_location().unwrap(), None);
    }

    #[test]
    fn reads_all_fields() {
        let yaml = r#"
iss_url: http://localhost:8000/iss-now.json
geolocation_url: https://ipapi.co/json
interval: 2s 500ms
timeout: 5s
count: 3
on_error: skip
location: "52.52, 13.405"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.iss_url, "http://localhost:8000/iss-now.json");
        assert_eq!(config.geolocation_url, "https://ipapi.co/json");
        assert_eq!(config.poll_interval().unwrap(), Duration::from_millis(2500));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(config.count, 3);
        assert_eq!(config.on_error, ErrorPolicy::Skip);
        assert_eq!(
            config.fixed_location().unwrap(),
            Some(Coordinates::new(52.52, 13.405))
        );

        let settings = config.tracker_settings().unwrap();
        assert_eq!(settings.poll_interval, Duration::from_millis(2500));
        assert_eq!(settings.on_error, ErrorPolicy::Skip);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_yaml("count: 7\n").unwrap();
        assert_eq!(config.count, 7);
        assert_eq!(config.interval, "1s");
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            Config::from_yaml("poll_interval: 1s\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn rejects_bad_values() {
        let config = Config {
            interval: "soon".into(),
            timeout: "0s".into(),
            location: Some("north pole".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.poll_interval(),
            Err(ConfigError::Duration { field: "interval", .. })
        ));
        assert!(matches!(config.request_timeout(), Err(ConfigError::ZeroTimeout)));
        assert!(matches!(config.fixed_location(), Err(ConfigError::Location(_))));
    }
}
