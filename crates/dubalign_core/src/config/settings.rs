//! Settings struct with TOML-based sections.

use serde::{Deserialize, Serialize};

use crate::orchestrator::DEFAULT_OUTPUT_PREFIX;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Output naming settings.
    #[serde(default)]
    pub output: OutputSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for scratch and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder for scratch directories. Empty means the system
    /// temporary directory.
    #[serde(default)]
    pub temp_root: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            temp_root: String::new(),
        }
    }
}

/// Output naming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Prefix for synthesized output filenames.
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

fn default_filename_prefix() -> String {
    DEFAULT_OUTPUT_PREFIX.to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Show timestamps in run log lines.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            show_timestamps: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.output.filename_prefix, "ad_");
        assert!(settings.paths.temp_root.is_empty());
        assert!(settings.logging.show_timestamps);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.output.filename_prefix, "ad_");
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let settings: Settings = toml::from_str(
            r#"
            [output]
            filename_prefix = "dub_"
            "#,
        )
        .unwrap();
        assert_eq!(settings.output.filename_prefix, "dub_");
        assert!(settings.logging.show_timestamps);
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.paths.temp_root = "/var/scratch".to_string();
        settings.logging.show_timestamps = false;

        let text = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();

        assert_eq!(parsed.paths.temp_root, "/var/scratch");
        assert!(!parsed.logging.show_timestamps);
    }
}
