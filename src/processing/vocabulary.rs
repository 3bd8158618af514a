//! Skill vocabulary: the ordered set of recognized skill terms

use crate::error::{Result, ResumeRelevanceError};
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Skills recognized when the configuration does not override the vocabulary
pub const DEFAULT_SKILLS: &[&str] = &[
    "Python", "JavaScript", "SQL", "Pandas", "NumPy", "TensorFlow", "PyTorch",
    "React", "Angular", "Flask", "Django", "AWS", "Azure", "GCP", "Docker",
    "Kubernetes", "Git", "GitHub", "API", "REST", "Machine Learning",
    "Deep Learning", "Data Science", "Natural Language Processing", "NLP", "Computer Vision",
];

/// A recognized skill name together with its compiled whole-word matcher.
///
/// Two terms are equal when their names match case-insensitively.
#[derive(Debug, Clone)]
pub struct SkillTerm {
    name: String,
    pattern: Regex,
}

impl SkillTerm {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ResumeRelevanceError::InvalidInput(
                "Skill term cannot be empty".to_string(),
            ));
        }

        // The term is matched literally; punctuation such as "C++" or "Node.js"
        // must never be read as pattern syntax.
        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(trimmed)))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ResumeRelevanceError::Processing(format!(
                    "Failed to build matcher for skill '{}': {}",
                    trimmed, e
                ))
            })?;

        Ok(Self {
            name: trimmed.to_string(),
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whole-word, case-insensitive presence test
    pub fn is_present_in(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl PartialEq for SkillTerm {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SkillTerm {}

impl fmt::Display for SkillTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl AsRef<str> for SkillTerm {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl Serialize for SkillTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for SkillTerm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        SkillTerm::new(name).map_err(serde::de::Error::custom)
    }
}

/// Ordered, duplicate-free skill vocabulary, fixed once constructed
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    terms: Vec<SkillTerm>,
}

impl SkillVocabulary {
    /// Build a vocabulary preserving insertion order.
    ///
    /// Later entries that repeat an earlier one case-insensitively are dropped.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        for name in names {
            let term = SkillTerm::new(name)?;
            if seen.insert(term.key()) {
                terms.push(term);
            } else {
                debug!("Skipping duplicate vocabulary entry: {}", term.name());
            }
        }

        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[SkillTerm] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillTerm> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.terms.iter().any(|t| t.key() == key)
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied()).expect("Failed to create default skill vocabulary")
    }
}

impl<'a> IntoIterator for &'a SkillVocabulary {
    type Item = &'a SkillTerm;
    type IntoIter = std::slice::Iter<'a, SkillTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let vocabulary = SkillVocabulary::default();
        assert_eq!(vocabulary.len(), DEFAULT_SKILLS.len());
        assert_eq!(vocabulary.terms()[0].name(), "Python");
        assert!(vocabulary.contains("machine learning"));
    }

    #[test]
    fn test_duplicates_dropped_keeping_first() {
        let vocabulary = SkillVocabulary::new(["Rust", "Go", "rust", "RUST"]).unwrap();
        let names: Vec<&str> = vocabulary.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_empty_term_rejected() {
        assert!(SkillTerm::new("   ").is_err());
        assert!(SkillVocabulary::new(["Rust", ""]).is_err());
    }

    #[test]
    fn test_whole_word_matching() {
        let python = SkillTerm::new("Python").unwrap();
        assert!(python.is_present_in("Senior PYTHON engineer"));
        assert!(python.is_present_in("python, rust"));
        assert!(!python.is_present_in("Pythonic code only"));
    }

    #[test]
    fn test_punctuation_is_literal() {
        let node = SkillTerm::new("Node.js").unwrap();
        assert!(node.is_present_in("Built services in Node.js daily"));
        assert!(!node.is_present_in("Built services in Nodexjs daily"));
    }

    #[test]
    fn test_term_equality_ignores_case() {
        assert_eq!(SkillTerm::new("AWS").unwrap(), SkillTerm::new("aws").unwrap());
        assert_ne!(SkillTerm::new("AWS").unwrap(), SkillTerm::new("GCP").unwrap());
    }
}
