//! Turns a caller-supplied config source into bytes plus a target path.
//!
//! Classification is by priority, not by exclusive detection:
//! existing file > standard base64 > raw text. A string that is both valid
//! base64 and plausible raw YAML is treated as base64.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Serialize;

use crate::engine::HomeLayout;

/// Standard alphabet with required padding, tolerant of non-zero trailing bits.
const CONFIG_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode a standard base64 config payload. Line breaks anywhere in the
/// payload are skipped, so text wrapped at 76 columns decodes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let unwrapped: Vec<u8> = payload
        .bytes()
        .filter(|b| !matches!(b, b'\r' | b'\n'))
        .collect();
    CONFIG_BASE64.decode(unwrapped)
}

/// How a config source was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Base64,
    Raw,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::File => "file",
            SourceKind::Base64 => "base64",
            SourceKind::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// Concrete configuration produced by [`ConfigResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub bytes: Vec<u8>,
    /// Always absolute; inline sources get the default config path.
    pub path: PathBuf,
    pub source: SourceKind,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("configuration is empty")]
    EmptyConfig,
    #[error("read config file {} failed: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves config sources relative to one home directory.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    home: &'a Path,
    default_path: &'a Path,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(layout: &'a HomeLayout) -> Self {
        Self {
            home: &layout.home,
            default_path: &layout.config_file,
        }
    }

    pub fn resolve(&self, input: &str) -> Result<ResolvedConfig, ResolveError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::EmptyConfig);
        }

        // Absolute paths replace the home directory on join.
        let candidate = self.home.join(trimmed);
        if fs::metadata(&candidate).is_ok_and(|m| m.is_file()) {
            let bytes = fs::read(&candidate).map_err(|source| ResolveError::ReadFailed {
                path: candidate.clone(),
                source,
            })?;
            return Ok(ResolvedConfig {
                bytes,
                path: candidate,
                source: SourceKind::File,
            });
        }

        if let Ok(bytes) = decode_base64(trimmed) {
            return Ok(ResolvedConfig {
                bytes,
                path: self.default_path.to_path_buf(),
                source: SourceKind::Base64,
            });
        }

        Ok(ResolvedConfig {
            bytes: trimmed.as_bytes().to_vec(),
            path: self.default_path.to_path_buf(),
            source: SourceKind::Raw,
        })
    }
}
