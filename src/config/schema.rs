//! Configuration schema definitions.
//!
//! This is the configuration of the runtime wrapper itself, not of the
//! engine. The engine's config is an opaque byte payload and never passes
//! through these types.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy runtime.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// File names under the home directory.
    pub layout: LayoutConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Log bridge settings.
    pub bridge: BridgeConfig,
}

/// Paths, relative to the home directory, of the files the engine uses.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Engine config file written by the store.
    pub config_file: String,

    /// Country MMDB dataset.
    pub mmdb: String,

    /// ASN MMDB dataset.
    pub asn: String,

    /// GeoSite domain dataset.
    pub geosite: String,

    /// GeoIP dat dataset.
    pub geoip: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            config_file: "config.yaml".to_string(),
            mmdb: "geoip.metadb".to_string(),
            asn: "GeoLite2-ASN.mmdb".to_string(),
            geosite: "GeoSite.dat".to_string(),
            geoip: "GeoIP.dat".to_string(),
        }
    }
}

impl LayoutConfig {
    /// `(field name, value)` pairs, used by validation.
    pub(crate) fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("layout.config_file", &self.config_file),
            ("layout.mmdb", &self.mmdb),
            ("layout.asn", &self.asn),
            ("layout.geosite", &self.geosite),
            ("layout.geoip", &self.geoip),
        ]
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record lifecycle metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// Log bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the forwarding thread.
    pub thread_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            thread_name: "log-bridge".to_string(),
        }
    }
}
