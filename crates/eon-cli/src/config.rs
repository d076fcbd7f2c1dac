//! Configuration loading and management.

use std::path::{Path, PathBuf};

use eon_io::{DuplicatePolicy, ExportFormat, IngestOptions};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed for defaulted event colors.
    pub color_seed: u64,
    /// What to do when an import contains a duplicate event ID.
    pub duplicate_policy: DuplicatePolicy,
    /// Format used when none can be inferred.
    pub default_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_seed: 0x0e07,
            duplicate_policy: DuplicatePolicy::default(),
            default_format: ExportFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Precedence, lowest to highest: built-in defaults, the platform config
    /// file, the `--config` file, `EON_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("EON_"));

        figment.extract()
    }

    /// The ingestion options this configuration implies.
    #[must_use]
    pub const fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            color_seed: self.color_seed,
            duplicate_policy: self.duplicate_policy,
        }
    }
}

/// Returns the platform-specific config directory for eon.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("eon"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Skip);
        assert_eq!(config.default_format, ExportFormat::Yaml);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "color_seed = 99\nduplicate_policy = \"overwrite\"\ndefault_format = \"csv\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.color_seed, 99);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Overwrite);
        assert_eq!(config.default_format, ExportFormat::Csv);
    }

    #[test]
    fn ingest_options_carry_seed_and_policy() {
        let config = Config {
            color_seed: 7,
            duplicate_policy: DuplicatePolicy::Overwrite,
            default_format: ExportFormat::Yaml,
        };
        let options = config.ingest_options();
        assert_eq!(options.color_seed, 7);
        assert_eq!(options.duplicate_policy, DuplicatePolicy::Overwrite);
    }
}
