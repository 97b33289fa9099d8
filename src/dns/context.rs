//! Provider configuration

use std::fs;
use std::path::Path;
use std::time::Duration;

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::dns::logging::LoggerConfig;

#[derive(Debug, Display, From, Error)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    #[from(ignore)]
    #[display(fmt = "invalid {}: {}", parameter, reason)]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

type Result<T> = std::result::Result<T, ConfigError>;

/// Settings shared by the provider and the store adapters
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration pointing at a local etcd.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Store endpoints, e.g. `http://10.0.0.1:2379`
    pub endpoints: Vec<String>,
    /// Root of the SkyDNS key space
    pub prefix: String,
    /// Host suffix that marks a stored host as a CNAME target
    pub reserved_suffix: String,
    /// Deadline for each store round-trip
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Deadline for establishing the store connection
    #[serde(with = "duration_secs")]
    pub dial_timeout: Duration,
    pub logging: LoggerConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://127.0.0.1:2379".to_string()],
            prefix: "/skydns".to_string(),
            reserved_suffix: ".dev".to_string(),
            request_timeout: Duration::from_secs(5),
            dial_timeout: Duration::from_secs(5),
            logging: LoggerConfig::default(),
        }
    }
}

impl ProviderConfig {
    pub fn from_toml_str(source: &str) -> Result<ProviderConfig> {
        let config: ProviderConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<ProviderConfig> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(invalid("endpoints", "at least one endpoint is required"));
        }
        if !self.prefix.starts_with('/') || self.prefix.ends_with('/') {
            return Err(invalid(
                "prefix",
                format!("{:?} must start with '/' and not end with '/'", self.prefix),
            ));
        }
        if self.request_timeout == Duration::from_secs(0) {
            return Err(invalid("request_timeout", "must be greater than zero"));
        }
        if self.dial_timeout == Duration::from_secs(0) {
            return Err(invalid("dial_timeout", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid<R: Into<String>>(parameter: &'static str, reason: R) -> ConfigError {
    ConfigError::Invalid {
        parameter,
        reason: reason.into(),
    }
}

/// Durations are configured as whole seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
