//! Recommendation sentences derived from a score and its missing skills

use crate::processing::skill_extractor::ExtractedSkillSet;
use crate::processing::verdict::{Verdict, VerdictThresholds};

pub const STRONG_MATCH_FEEDBACK: &str = "Excellent match with the JD. Minimal improvements required.";
pub const MODERATE_MATCH_FEEDBACK: &str = "Good match, consider strengthening these areas:";
pub const WEAK_MATCH_FEEDBACK: &str = "Low match. Significant skill improvements needed:";

fn template(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::StrongMatch => STRONG_MATCH_FEEDBACK,
        Verdict::ModerateMatch => MODERATE_MATCH_FEEDBACK,
        Verdict::WeakMatch => WEAK_MATCH_FEEDBACK,
    }
}

pub fn feedback_with_thresholds(
    score: f64,
    missing_skills: &ExtractedSkillSet,
    thresholds: &VerdictThresholds,
) -> String {
    let sentence = template(thresholds.classify(score));
    if missing_skills.is_empty() {
        sentence.to_string()
    } else {
        format!("{} {}", sentence, missing_skills.join(", "))
    }
}

pub fn feedback(score: f64, missing_skills: &ExtractedSkillSet) -> String {
    feedback_with_thresholds(score, missing_skills, &VerdictThresholds::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_without_missing() {
        let text = feedback(92.0, &ExtractedSkillSet::default());
        assert_eq!(text, STRONG_MATCH_FEEDBACK);
        assert!(text.starts_with("Excellent match"));
    }

    #[test]
    fn test_moderate_lists_missing_in_order() {
        let missing = ExtractedSkillSet::from_names(["Kubernetes", "AWS"]).unwrap();
        assert_eq!(
            feedback(70.0, &missing),
            "Good match, consider strengthening these areas: Kubernetes, AWS"
        );
    }

    #[test]
    fn test_weak_band() {
        let missing = ExtractedSkillSet::from_names(["Machine Learning"]).unwrap();
        assert_eq!(
            feedback(12.5, &missing),
            "Low match. Significant skill improvements needed: Machine Learning"
        );
        assert_eq!(feedback(59.9, &ExtractedSkillSet::default()), WEAK_MATCH_FEEDBACK);
    }

    #[test]
    fn test_respects_custom_thresholds() {
        let thresholds = VerdictThresholds { strong: 50.0, moderate: 20.0 };
        let text = feedback_with_thresholds(55.0, &ExtractedSkillSet::default(), &thresholds);
        assert_eq!(text, STRONG_MATCH_FEEDBACK);
    }
}
