//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RuntimeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::path::{Component, Path};

use crate::config::schema::RuntimeConfig;

/// A single semantic problem in a runtime config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be relative to the home directory, got {value}")]
    Absolute { field: &'static str, value: String },
    #[error("{field} must stay inside the home directory, got {value}")]
    EscapesHome { field: &'static str, value: String },
}

pub fn validate_config(config: &RuntimeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in config.layout.entries() {
        if value.trim().is_empty() {
            errors.push(ValidationError::Empty { field });
            continue;
        }
        let path = Path::new(value);
        if path.is_absolute() {
            errors.push(ValidationError::Absolute {
                field,
                value: value.to_string(),
            });
        } else if path.components().any(|c| matches!(c, Component::ParentDir)) {
            errors.push(ValidationError::EscapesHome {
                field,
                value: value.to_string(),
            });
        }
    }

    if config.bridge.thread_name.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "bridge.thread_name",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RuntimeConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RuntimeConfig::default();
        config.layout.config_file = "/etc/proxy/config.yaml".into();
        config.layout.asn = "../ASN.mmdb".into();
        config.layout.geoip = "  ".into();
        config.bridge.thread_name = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::Absolute { field: "layout.config_file", .. }));
        assert!(matches!(errors[1], ValidationError::EscapesHome { field: "layout.asn", .. }));
        assert_eq!(errors[2], ValidationError::Empty { field: "layout.geoip" });
        assert_eq!(errors[3], ValidationError::Empty { field: "bridge.thread_name" });
    }

    #[test]
    fn test_nested_relative_paths_allowed() {
        let mut config = RuntimeConfig::default();
        config.layout.geosite = "geo/GeoSite.dat".into();
        assert!(validate_config(&config).is_ok());
    }
}
