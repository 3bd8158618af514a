//! Relevance scoring: keyword coverage blended with text similarity

use crate::processing::similarity::SimilarityAlgorithm;
use crate::processing::skill_extractor::ExtractedSkillSet;
use crate::processing::vocabulary::SkillTerm;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HARD_WEIGHT: f64 = 0.7;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub hard: f64,
    pub semantic: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            hard: DEFAULT_HARD_WEIGHT,
            semantic: DEFAULT_SEMANTIC_WEIGHT,
        }
    }
}

/// Scores are percentages in `[0, 100]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub final_score: f64,
    pub hard_score: f64,
    pub semantic_score: f64,
    pub found_skills: ExtractedSkillSet,
    pub missing_skills: ExtractedSkillSet,
}

#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    weights: ScoreWeights,
    algorithm: SimilarityAlgorithm,
    autojunk: bool,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RelevanceScorer {
    pub fn new() -> Self {
        Self {
            weights: ScoreWeights::default(),
            algorithm: SimilarityAlgorithm::default(),
            autojunk: true,
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_algorithm(mut self, algorithm: SimilarityAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_autojunk(mut self, autojunk: bool) -> Self {
        self.autojunk = autojunk;
        self
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    pub fn algorithm(&self) -> SimilarityAlgorithm {
        self.algorithm
    }

    /// Score a resume against a job description.
    ///
    /// Never fails: an empty skill set gives a hard score of 0 and empty text
    /// only lowers the similarity component.
    pub fn score(&self, jd_text: &str, resume_text: &str, required_skills: &ExtractedSkillSet) -> ScoreResult {
        let jd_lower = jd_text.to_lowercase();
        let resume_lower = resume_text.to_lowercase();

        let (found, missing): (Vec<SkillTerm>, Vec<SkillTerm>) = required_skills
            .iter()
            .cloned()
            .partition(|skill| skill.is_present_in(&resume_lower));

        let hard_score = if required_skills.is_empty() {
            0.0
        } else {
            100.0 * found.len() as f64 / required_skills.len() as f64
        };

        let semantic_score = self.semantic_score(&jd_lower, &resume_lower);
        let final_score = self.weights.hard * hard_score + self.weights.semantic * semantic_score;

        ScoreResult {
            final_score,
            hard_score,
            semantic_score,
            found_skills: ExtractedSkillSet::new(found),
            missing_skills: ExtractedSkillSet::new(missing),
        }
    }

    /// Similarity of two already-normalized texts, scaled to `[0, 100]`
    pub fn semantic_score(&self, jd_text: &str, resume_text: &str) -> f64 {
        self.algorithm.ratio(jd_text, resume_text, self.autojunk) * 100.0
    }
}

/// Score with the default weights and similarity measure
pub fn score(jd_text: &str, resume_text: &str, required_skills: &ExtractedSkillSet) -> ScoreResult {
    RelevanceScorer::default().score(jd_text, resume_text, required_skills)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> ExtractedSkillSet {
        ExtractedSkillSet::from_names(names.iter().copied()).unwrap()
    }

    #[test]
    fn test_partial_skill_coverage() {
        let jd = "Looking for Python and AWS experience.";
        let resume = "Experienced Python developer.";
        let result = score(jd, resume, &skills(&["Python", "AWS"]));

        assert_eq!(result.found_skills.names(), vec!["Python"]);
        assert_eq!(result.missing_skills.names(), vec!["AWS"]);
        assert_eq!(result.hard_score, 50.0);
        let expected = 35.0 + 0.3 * result.semantic_score;
        assert!((result.final_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_required_skills() {
        let result = score("Python role", "Python developer", &ExtractedSkillSet::default());

        assert_eq!(result.hard_score, 0.0);
        assert!(result.missing_skills.is_empty());
        assert!((result.final_score - 0.3 * result.semantic_score).abs() < 1e-9);
    }

    #[test]
    fn test_identical_texts_are_fully_similar() {
        let text = "Senior engineer: Python, Docker, Kubernetes and REST services.";
        let result = score(text, text, &skills(&["Python", "Docker"]));

        assert_eq!(result.semantic_score, 100.0);
        assert_eq!(result.hard_score, 100.0);
        assert!((result.final_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_never_fail() {
        let result = score("", "", &skills(&["Python"]));
        assert_eq!(result.hard_score, 0.0);
        assert_eq!(result.missing_skills.names(), vec!["Python"]);

        let result = score("Python role", "", &skills(&["Python"]));
        assert_eq!(result.semantic_score, 0.0);
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn test_missing_order_follows_required_order() {
        let result = score("", "I know Docker.", &skills(&["Kubernetes", "AWS", "Docker", "Azure"]));
        assert_eq!(result.missing_skills.names(), vec!["Kubernetes", "AWS", "Azure"]);
    }

    #[test]
    fn test_whole_word_in_resume() {
        let result = score("", "Pythonic style guide author", &skills(&["Python"]));
        assert_eq!(result.hard_score, 0.0);
        assert_eq!(result.missing_skills.names(), vec!["Python"]);
    }

    #[test]
    fn test_case_insensitive_in_resume() {
        for resume in ["PYTHON", "python", "Python"] {
            let result = score("", resume, &skills(&["Python"]));
            assert_eq!(result.hard_score, 100.0);
        }
    }

    #[test]
    fn test_custom_weights() {
        let scorer = RelevanceScorer::new().with_weights(ScoreWeights { hard: 1.0, semantic: 0.0 });
        let result = scorer.score("python", "aws", &skills(&["AWS"]));
        assert_eq!(result.final_score, 100.0);
    }

    #[test]
    fn test_levenshtein_backend() {
        let scorer = RelevanceScorer::new().with_algorithm(SimilarityAlgorithm::Levenshtein);
        let result = scorer.score("Rust", "rust", &ExtractedSkillSet::default());
        assert_eq!(result.semantic_score, 100.0);
    }
}
