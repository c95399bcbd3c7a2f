//! Aspect vocabulary configuration.
//!
//! Three interchangeable file formats, chosen by extension:
//!
//! - `.yaml` / `.yml` and `.json`: a top-level `aspects` map of
//!   `name → { phrases: [..], category: .. }`. Both fields are optional; an
//!   aspect without phrases is matched by its own name.
//! - `.txt`: one entry per line. `camera` declares a bare aspect,
//!   `hardware: camera, battery` declares two aspects in category `hardware`.
//!   Blank lines and `#` comments are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ConfigError;

/// Phrases and category for one aspect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectData {
    #[serde(default)]
    pub phrases: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
}

impl AspectData {
    /// Phrases to match for this aspect; falls back to the aspect name when
    /// none are declared.
    pub fn phrases_or<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        match &self.phrases {
            Some(phrases) if !phrases.is_empty() => phrases.iter().map(String::as_str).collect(),
            _ => vec![name],
        }
    }
}

/// The aspect vocabulary, keyed by aspect name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AspectConfig {
    pub aspects: BTreeMap<String, AspectData>,
}

/// On-disk shape: tolerates `screen:` (null) entries in YAML.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    aspects: BTreeMap<String, Option<AspectData>>,
}

impl From<RawConfig> for AspectConfig {
    fn from(raw: RawConfig) -> Self {
        let aspects = raw
            .aspects
            .into_iter()
            .map(|(name, data)| (name, data.unwrap_or_default()))
            .collect();
        Self { aspects }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Txt,
}

impl AspectConfig {
    /// Load a vocabulary from a `.yaml`, `.yml`, `.json` or `.txt` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let format = match ext.as_str() {
            "yaml" | "yml" => Format::Yaml,
            "json" => Format::Json,
            "txt" => Format::Txt,
            _ => {
                return Err(ConfigError::UnsupportedExtension {
                    path: path.to_path_buf(),
                    ext,
                });
            }
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match format {
            Format::Yaml => Self::from_yaml_str(&raw)?,
            Format::Json => Self::from_json_str(&raw)?,
            Format::Txt => Self::from_txt_str(&raw)?,
        };

        info!(
            path = %path.display(),
            aspects = config.aspects.len(),
            "loaded aspect vocabulary"
        );
        Ok(config)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(s)?;
        Self::from(raw).non_empty()
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(s)?;
        Self::from(raw).non_empty()
    }

    pub fn from_txt_str(s: &str) -> Result<Self, ConfigError> {
        let mut aspects = BTreeMap::new();

        for (idx, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once(':') {
                Some((category, terms)) => {
                    let category = category.trim();
                    let terms: Vec<&str> = terms
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .collect();
                    if category.is_empty() || terms.is_empty() {
                        return Err(ConfigError::MalformedLine { line: idx + 1 });
                    }
                    for term in terms {
                        aspects.entry(term.to_string()).or_insert_with(|| AspectData {
                            phrases: None,
                            category: Some(category.to_string()),
                        });
                    }
                }
                None => {
                    aspects.entry(line.to_string()).or_insert_with(AspectData::default);
                }
            }
        }

        Self { aspects }.non_empty()
    }

    /// Distinct category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut cats: Vec<&str> = self
            .aspects
            .values()
            .filter_map(|a| a.category.as_deref())
            .collect();
        cats.sort_unstable();
        cats.dedup();
        cats
    }

    fn non_empty(self) -> Result<Self, ConfigError> {
        if self.aspects.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        Ok(self)
    }
}
