use std::fs;
use std::path::Path;
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Root of the JSON settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(
        rename = "Destinations",
        alias = "destinations",
        default,
        deserialize_with = "null_as_default"
    )]
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Destination {
    #[serde(
        rename = "IPAddress",
        alias = "ipAddress",
        alias = "ipaddress",
        alias = "IpAddress",
        default,
        deserialize_with = "null_as_default"
    )]
    pub ip_address: String,

    // Kept wide so out-of-range entries load and fail per attempt.
    #[serde(rename = "Ports", alias = "ports", default, deserialize_with = "null_as_default")]
    pub ports: Vec<i64>,
}

impl Settings {
    /// Every (address, port) pair in file order.
    pub fn targets(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.destinations
            .iter()
            .flat_map(|d| d.ports.iter().map(move |&port| (d.ip_address.as_str(), port)))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: Settings = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        destinations = settings.destinations.len(),
        "loaded settings"
    );
    Ok(settings)
}
