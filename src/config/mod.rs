// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for notegrid.
//!
//! Settings are read from a YAML or TOML file and passed explicitly to
//! score loading, corpus building and data formatting. There is no
//! process-wide default.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::arrangement::LoadOptions;
use crate::music::Pitch;

/// Root settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Grid step in beats that loaded times are snapped to
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    /// Octave used to order pitches that carry none
    #[serde(default = "default_assumed_octave")]
    pub assumed_octave: u8,
    /// Window width used when slicing bars for training data
    #[serde(default = "default_slice_resolution")]
    pub slice_resolution: f64,
    /// Corpus loading options
    #[serde(default)]
    pub corpus: CorpusOptions,
}

fn default_resolution() -> f64 {
    1.0 / 16.0
}
fn default_assumed_octave() -> u8 {
    4
}
fn default_slice_resolution() -> f64 {
    0.25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            assumed_octave: default_assumed_octave(),
            slice_resolution: default_slice_resolution(),
            corpus: CorpusOptions::default(),
        }
    }
}

impl Settings {
    /// Load settings from a file. `.toml` files are read as TOML,
    /// anything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents)?,
            _ => Self::from_yaml(&contents)?,
        };
        settings
            .validate()
            .with_context(|| format!("Invalid settings in {:?}", path))?;
        Ok(settings)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML settings")
    }

    /// Parse settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML settings")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize settings to YAML")
    }

    /// Save settings to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write settings file: {:?}", path.as_ref()))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            bail!("resolution must be positive, got {}", self.resolution);
        }
        if !(self.slice_resolution.is_finite() && self.slice_resolution > 0.0) {
            bail!(
                "slice_resolution must be positive, got {}",
                self.slice_resolution
            );
        }
        if self.corpus.max_len == Some(0) {
            bail!("corpus.max_len must be at least 1");
        }
        self.corpus.load_options()?;
        Ok(())
    }
}

/// Options applied while loading a corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorpusOptions {
    /// Drop rests from every piece after loading
    #[serde(default)]
    pub discard_rests: bool,
    /// Stop once this many pieces have been admitted
    #[serde(default)]
    pub max_len: Option<usize>,
    /// Skip files that fail to parse instead of failing the load
    #[serde(default)]
    pub ignore_load_errors: bool,
    /// Report every admitted, rejected or skipped file at info level
    #[serde(default)]
    pub verbose: bool,
    /// Transpose every piece to this tonic (e.g. "C")
    #[serde(default)]
    pub transpose_to: Option<String>,
    /// Keep the detected key on each piece
    #[serde(default)]
    pub save_key: bool,
}

impl CorpusOptions {
    /// Per-piece load options, with the transposition target parsed
    pub fn load_options(&self) -> Result<LoadOptions> {
        let transpose_to = match &self.transpose_to {
            Some(name) => Some(
                Pitch::from_name(name)
                    .with_context(|| format!("Invalid transpose_to pitch: {:?}", name))?,
            ),
            None => None,
        };
        Ok(LoadOptions {
            save_key: self.save_key,
            transpose_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yaml_settings() {
        let yaml = r#"
resolution: 0.125
slice_resolution: 0.5
corpus:
  discard_rests: true
  max_len: 10
  transpose_to: "C"
"#;

        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.resolution, 0.125);
        assert_eq!(settings.slice_resolution, 0.5);
        assert_eq!(settings.assumed_octave, 4);
        assert!(settings.corpus.discard_rests);
        assert_eq!(settings.corpus.max_len, Some(10));
        assert!(!settings.corpus.ignore_load_errors);

        let options = settings.corpus.load_options().unwrap();
        assert_eq!(options.transpose_to, Some(Pitch::from_name("C").unwrap()));
        assert!(!options.save_key);
    }

    #[test]
    fn test_parse_toml_settings() {
        let text = r#"
assumed_octave = 3

[corpus]
ignore_load_errors = true
verbose = true
"#;

        let settings = Settings::from_toml(text).unwrap();
        assert_eq!(settings.assumed_octave, 3);
        assert_eq!(settings.resolution, 1.0 / 16.0);
        assert!(settings.corpus.ignore_load_errors);
        assert!(settings.corpus.verbose);
    }

    #[test]
    fn test_default_values() {
        let settings = Settings::from_yaml("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.slice_resolution, 0.25);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.resolution = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.slice_resolution = -1.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.corpus.transpose_to = Some("H".to_string());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_dispatches_on_extension() {
        let dir = tempdir().unwrap();

        let yaml_path = dir.path().join("settings.yaml");
        fs::write(&yaml_path, "slice_resolution: 1.0\n").unwrap();
        assert_eq!(Settings::load(&yaml_path).unwrap().slice_resolution, 1.0);

        let toml_path = dir.path().join("settings.toml");
        fs::write(&toml_path, "slice_resolution = 0.5\n").unwrap();
        assert_eq!(Settings::load(&toml_path).unwrap().slice_resolution, 0.5);

        let bad_path = dir.path().join("bad.yaml");
        fs::write(&bad_path, "resolution: -2.0\n").unwrap();
        assert!(Settings::load(&bad_path).is_err());

        assert!(Settings::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");

        let mut original = Settings::default();
        original.corpus.save_key = true;
        original.corpus.max_len = Some(3);
        original.save(&path).unwrap();

        let parsed = Settings::load(&path).unwrap();
        assert_eq!(original, parsed);
    }
}
