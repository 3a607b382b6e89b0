//! Shared configuration loader for the draftmark toolchain.
//!
//! `defaults/draftmark.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`DraftmarkConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use draftmark_babel::formats::markdown::ParseOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/draftmark.default.toml");

/// Top-level configuration consumed by draftmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftmarkConfig {
    pub convert: ConvertConfig,
}

/// Format-specific conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub markdown: MarkdownConvertConfig,
    pub raw: RawConvertConfig,
}

/// Mirrors the knobs exposed by the Markdown parser.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConvertConfig {
    pub hard_breaks: bool,
}

impl From<&MarkdownConvertConfig> for ParseOptions {
    fn from(config: &MarkdownConvertConfig) -> Self {
        ParseOptions {
            hard_breaks: config.hard_breaks,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawConvertConfig {
    pub pretty: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DraftmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DraftmarkConfig, ConfigError> {
    Loader::new().build()
}
