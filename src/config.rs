//! Configuration management for the resume relevance checker

use crate::error::{Result, ResumeRelevanceError};
use crate::processing::highlighter::DEFAULT_CONTEXT_CHARS;
use crate::processing::scorer::{ScoreWeights, DEFAULT_HARD_WEIGHT, DEFAULT_SEMANTIC_WEIGHT};
use crate::processing::similarity::SimilarityAlgorithm;
use crate::processing::verdict::{VerdictThresholds, DEFAULT_MODERATE_THRESHOLD, DEFAULT_STRONG_THRESHOLD};
use crate::processing::vocabulary::DEFAULT_SKILLS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub skills: SkillsConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub hard_weight: f64,
    pub semantic_weight: f64,
    pub strong_threshold: f64,
    pub moderate_threshold: f64,
    pub similarity: SimilarityAlgorithm,
    pub autojunk: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    pub vocabulary: Vec<String>,
    /// Appended after `vocabulary`
    pub additional: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub enabled: bool,
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub max_compare: usize,
    pub snippet_context_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            hard_weight: DEFAULT_HARD_WEIGHT,
            semantic_weight: DEFAULT_SEMANTIC_WEIGHT,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
            moderate_threshold: DEFAULT_MODERATE_THRESHOLD,
            similarity: SimilarityAlgorithm::SequenceMatcher,
            autojunk: true,
        }
    }
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            additional: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let database_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resume-relevance")
            .join("resume_results.db");

        Self {
            enabled: true,
            database_path,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
            max_compare: 3,
            snippet_context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }
}

impl Config {
    /// Load from `path` (or the default location), writing defaults when missing
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeRelevanceError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeRelevanceError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-relevance")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        if scoring.hard_weight < 0.0 || scoring.semantic_weight < 0.0 {
            return Err(ResumeRelevanceError::Configuration(
                "Scoring weights must be non-negative".to_string(),
            ));
        }
        if (scoring.hard_weight + scoring.semantic_weight - 1.0).abs() > 1e-6 {
            return Err(ResumeRelevanceError::Configuration(format!(
                "Scoring weights must sum to 1.0, got {} + {}",
                scoring.hard_weight, scoring.semantic_weight
            )));
        }
        if scoring.strong_threshold <= scoring.moderate_threshold {
            return Err(ResumeRelevanceError::Configuration(format!(
                "Strong threshold ({}) must be above moderate threshold ({})",
                scoring.strong_threshold, scoring.moderate_threshold
            )));
        }
        if !(2..=4).contains(&self.output.max_compare) {
            return Err(ResumeRelevanceError::Configuration(format!(
                "output.max_compare must be between 2 and 4, got {}",
                self.output.max_compare
            )));
        }
        if self.output.snippet_context_chars == 0 {
            return Err(ResumeRelevanceError::Configuration(
                "output.snippet_context_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            hard: self.scoring.hard_weight,
            semantic: self.scoring.semantic_weight,
        }
    }

    pub fn thresholds(&self) -> VerdictThresholds {
        VerdictThresholds {
            strong: self.scoring.strong_threshold,
            moderate: self.scoring.moderate_threshold,
        }
    }

    /// Every configured skill name, vocabulary first
    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills
            .vocabulary
            .iter()
            .chain(self.skills.additional.iter())
            .map(String::as_str)
    }

    /// Set a dotted key such as `scoring.hard_weight`; the result is re-validated
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let unknown = || ResumeRelevanceError::Configuration(format!("Unknown configuration key: {}", key));

        let mut root = toml::Value::try_from(&*self)
            .map_err(|e| ResumeRelevanceError::Configuration(format!("Failed to serialize config: {}", e)))?;

        let parts: Vec<&str> = key.split('.').collect();
        let (field, sections) = parts.split_last().ok_or_else(unknown)?;

        let mut cursor = &mut root;
        for section in sections {
            cursor = cursor.get_mut(*section).ok_or_else(unknown)?;
        }
        let table = cursor.as_table_mut().ok_or_else(unknown)?;
        let current = table.get(*field).ok_or_else(unknown)?;

        let parsed = parse_like(current, value)
            .ok_or_else(|| ResumeRelevanceError::Configuration(format!("Invalid value for {}: {}", key, value)))?;
        table.insert(field.to_string(), parsed);

        let updated: Config = root
            .try_into()
            .map_err(|e| ResumeRelevanceError::Configuration(format!("Invalid value for {}: {}", key, e)))?;
        updated.validate()?;

        *self = updated;
        Ok(())
    }
}

/// Parse `raw` into the same TOML type as `current`
fn parse_like(current: &toml::Value, raw: &str) -> Option<toml::Value> {
    let raw = raw.trim();
    match current {
        toml::Value::Boolean(_) => raw.parse().ok().map(toml::Value::Boolean),
        toml::Value::Integer(_) => raw.parse().ok().map(toml::Value::Integer),
        toml::Value::Float(_) => raw.parse().ok().map(toml::Value::Float),
        toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
        toml::Value::Array(_) => Some(toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.weights(), ScoreWeights::default());
        assert_eq!(config.thresholds(), VerdictThresholds::default());
        assert_eq!(config.skill_names().count(), DEFAULT_SKILLS.len());
    }

    #[test]
    fn test_load_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = Config::load(Some(&path)).unwrap();
        assert!(path.exists());
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(created, loaded);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[skills]\nadditional = [\"Rust\"]\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.skills.additional, vec!["Rust".to_string()]);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nhard_weight = 0.9\nsemantic_weight = 0.3\n").unwrap();

        assert!(matches!(Config::load(Some(&path)), Err(ResumeRelevanceError::Configuration(_))));
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("output.max_compare", "4").unwrap();
        config.set_value("scoring.similarity", "levenshtein").unwrap();
        config.set_value("skills.additional", "Rust, Go").unwrap();
        config.set_value("output.color_output", "false").unwrap();
        config.set_value("output.format", "json").unwrap();

        assert_eq!(config.output.max_compare, 4);
        assert_eq!(config.scoring.similarity, SimilarityAlgorithm::Levenshtein);
        assert_eq!(config.skills.additional, vec!["Rust".to_string(), "Go".to_string()]);
        assert!(!config.output.color_output);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_output_format_is_lowercase_in_file() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(content.contains("format = \"console\""));

        let config: Config = toml::from_str("[output]\nformat = \"markdown\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("scoring.nonexistent", "1").is_err());
        assert!(config.set_value("output.max_compare", "ten").is_err());
        assert!(config.set_value("output.max_compare", "9").is_err());
        assert!(config.set_value("scoring.similarity", "cosine").is_err());
        assert!(config.set_value("scoring.strong_threshold", "50").is_err());
        assert_eq!(config, Config::default());
    }
}
