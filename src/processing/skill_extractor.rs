//! Skill extraction against a fixed vocabulary

use crate::error::Result;
use crate::processing::vocabulary::{SkillTerm, SkillVocabulary};
use serde::{Deserialize, Serialize};

/// Subset of a vocabulary relevant to one document, in vocabulary order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedSkillSet {
    terms: Vec<SkillTerm>,
}

impl ExtractedSkillSet {
    pub fn new(terms: Vec<SkillTerm>) -> Self {
        Self { terms }
    }

    /// Build a set directly from skill names, keeping the given order
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(SkillTerm::new)
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn terms(&self) -> &[SkillTerm] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillTerm> {
        self.terms.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn join(&self, separator: &str) -> String {
        self.names().join(separator)
    }
}

impl FromIterator<SkillTerm> for ExtractedSkillSet {
    fn from_iter<T: IntoIterator<Item = SkillTerm>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ExtractedSkillSet {
    type Item = &'a SkillTerm;
    type IntoIter = std::slice::Iter<'a, SkillTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

/// Return every vocabulary term that occurs in the document as a whole word.
///
/// Absent or blank text yields an empty set.
pub fn extract_skills(document_text: Option<&str>, vocabulary: &SkillVocabulary) -> ExtractedSkillSet {
    let text = match document_text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return ExtractedSkillSet::default(),
    };

    vocabulary
        .iter()
        .filter(|term| term.is_present_in(text))
        .cloned()
        .collect()
}
