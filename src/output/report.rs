//! Batch report structures consumed by the output formatters

use crate::error::{Result, ResumeRelevanceError};
use crate::processing::highlighter::{render_snippets_html, SkillSnippet};
use crate::processing::scorer::{ScoreResult, ScoreWeights};
use crate::processing::skill_extractor::ExtractedSkillSet;
use crate::processing::verdict::{Verdict, VerdictThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub job: JobSummary,
    /// Scored resumes in input order
    pub candidates: Vec<CandidateResult>,
    pub failures: Vec<ExtractionFailure>,
    /// Resume names selected for side-by-side comparison
    pub comparison: Vec<String>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    pub skills: ExtractedSkillSet,
    pub character_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub resume_name: String,
    pub score: ScoreResult,
    pub verdict: Verdict,
    pub feedback: String,
    pub snippets: Vec<SkillSnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub resume_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCount {
    pub verdict: Verdict,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub processing_time_ms: u64,
    pub version: String,
    pub weights: ScoreWeights,
    pub thresholds: VerdictThresholds,
    pub similarity: String,
}

impl CandidateResult {
    /// Missing skills for tables, "None" when nothing is missing
    pub fn missing_display(&self) -> String {
        if self.score.missing_skills.is_empty() {
            "None".to_string()
        } else {
            self.score.missing_skills.join(", ")
        }
    }

    pub fn snippets_html(&self) -> String {
        render_snippets_html(&self.snippets)
    }
}

impl BatchReport {
    pub fn find(&self, resume_name: &str) -> Option<&CandidateResult> {
        self.candidates.iter().find(|c| c.resume_name == resume_name)
    }

    /// Candidates by final score, highest first; ties keep input order
    pub fn ranked(&self) -> Vec<&CandidateResult> {
        let mut ranked: Vec<&CandidateResult> = self.candidates.iter().collect();
        ranked.sort_by(|a, b| b.score.final_score.total_cmp(&a.score.final_score));
        ranked
    }

    /// Counts of each verdict that occurs, in band order
    pub fn verdict_distribution(&self) -> Vec<VerdictCount> {
        Verdict::ALL
            .into_iter()
            .map(|verdict| VerdictCount {
                verdict,
                count: self.candidates.iter().filter(|c| c.verdict == verdict).count(),
            })
            .filter(|vc| vc.count > 0)
            .collect()
    }

    /// Select candidates for comparison, at most `max` and all known
    pub fn with_comparison(mut self, names: &[String], max: usize) -> Result<Self> {
        if names.len() > max {
            return Err(ResumeRelevanceError::InvalidInput(format!(
                "At most {} candidates can be compared, got {}",
                max,
                names.len()
            )));
        }

        let mut selected: Vec<String> = Vec::new();
        for name in names {
            if self.find(name).is_none() {
                return Err(ResumeRelevanceError::InvalidInput(format!(
                    "No scored resume named '{}'",
                    name
                )));
            }
            if !selected.contains(name) {
                selected.push(name.clone());
            }
        }

        self.comparison = selected;
        Ok(self)
    }

    pub fn compared(&self) -> Vec<&CandidateResult> {
        self.comparison.iter().filter_map(|name| self.find(name)).collect()
    }
}
