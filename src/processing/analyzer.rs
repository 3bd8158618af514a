//! Batch analysis engine: one job description scored against many resumes

use crate::config::Config;
use crate::error::Result;
use crate::output::report::{BatchReport, CandidateResult, ExtractionFailure, JobSummary, ReportMetadata};
use crate::processing::feedback::feedback_with_thresholds;
use crate::processing::highlighter::highlight;
use crate::processing::scorer::RelevanceScorer;
use crate::processing::skill_extractor::{extract_skills, ExtractedSkillSet};
use crate::processing::verdict::VerdictThresholds;
use crate::processing::vocabulary::SkillVocabulary;
use crate::storage::{AuditEvent, EventType, ResultRecord, ResultSink};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::time::Instant;

/// A resume as delivered by the text source; extraction may have failed
pub struct ResumeInput {
    pub name: String,
    pub text: Result<String>,
}

impl ResumeInput {
    pub fn new(name: impl Into<String>, text: Result<String>) -> Self {
        Self {
            name: name.into(),
            text,
        }
    }
}

/// Main analysis engine that coordinates extraction, scoring and persistence
pub struct AnalysisEngine {
    vocabulary: SkillVocabulary,
    scorer: RelevanceScorer,
    thresholds: VerdictThresholds,
    context_chars: usize,
    progress: ProgressBar,
}

impl AnalysisEngine {
    pub fn new(config: &Config) -> Result<Self> {
        let vocabulary = SkillVocabulary::new(config.skill_names())?;
        let scorer = RelevanceScorer::new()
            .with_weights(config.weights())
            .with_algorithm(config.scoring.similarity)
            .with_autojunk(config.scoring.autojunk);

        debug!(
            "Analysis engine: {} skills, {} similarity",
            vocabulary.len(),
            scorer.algorithm()
        );

        Ok(Self {
            vocabulary,
            scorer,
            thresholds: config.thresholds(),
            context_chars: config.output.snippet_context_chars,
            progress: ProgressBar::hidden(),
        })
    }

    /// Advance `progress` once per resume
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn job_skills(&self, jd_text: Option<&str>) -> ExtractedSkillSet {
        extract_skills(jd_text, &self.vocabulary)
    }

    pub fn analyze_resume(
        &self,
        resume_name: &str,
        jd_text: &str,
        job_skills: &ExtractedSkillSet,
        resume_text: &str,
    ) -> CandidateResult {
        let score = self.scorer.score(jd_text, resume_text, job_skills);
        let verdict = self.thresholds.classify(score.final_score);
        let feedback = feedback_with_thresholds(score.final_score, &score.missing_skills, &self.thresholds);

        let snippets = if score.missing_skills.is_empty() {
            Vec::new()
        } else {
            highlight(resume_text, &score.missing_skills, self.context_chars)
        };

        CandidateResult {
            resume_name: resume_name.to_string(),
            score,
            verdict,
            feedback,
            snippets,
        }
    }

    /// Score every resume against the job description.
    ///
    /// Resumes without usable text become failure entries. Sink errors are
    /// logged and never stop the batch.
    pub fn analyze(
        &self,
        job_name: &str,
        jd_text: &str,
        resumes: Vec<ResumeInput>,
        sink: Option<&dyn ResultSink>,
    ) -> BatchReport {
        let start_time = Instant::now();

        let job_skills = self.job_skills(Some(jd_text));
        if job_skills.is_empty() {
            warn!("No known skills found in job description {}", job_name);
        } else {
            info!("Job description {} requires: {}", job_name, job_skills.join(", "));
        }
        record_event(sink, EventType::JdUploaded, job_name);

        self.progress.set_length(resumes.len() as u64);

        let mut candidates = Vec::new();
        let mut failures = Vec::new();

        for resume in resumes {
            self.progress.set_message(resume.name.clone());

            match usable_text(resume.text) {
                Ok(text) => {
                    let candidate = self.analyze_resume(&resume.name, jd_text, &job_skills, &text);
                    info!(
                        "{}: {:.2} ({})",
                        candidate.resume_name, candidate.score.final_score, candidate.verdict
                    );

                    if let Some(sink) = sink {
                        let record = ResultRecord {
                            resume_name: &candidate.resume_name,
                            jd_name: job_name,
                            score: &candidate.score,
                            verdict: candidate.verdict,
                        };
                        match sink.save_result(&record) {
                            Ok(()) => record_event(Some(sink), EventType::ResultSaved, &candidate.resume_name),
                            Err(e) => warn!("Failed to save result for {}: {}", candidate.resume_name, e),
                        }
                    }

                    candidates.push(candidate);
                }
                Err(reason) => {
                    warn!("Skipping {}: {}", resume.name, reason);
                    record_event(sink, EventType::ExtractionFailed, &resume.name);
                    failures.push(ExtractionFailure {
                        resume_name: resume.name,
                        reason,
                    });
                }
            }

            self.progress.inc(1);
        }

        self.progress.finish_and_clear();

        BatchReport {
            job: JobSummary {
                name: job_name.to_string(),
                skills: job_skills,
                character_count: jd_text.chars().count(),
            },
            candidates,
            failures,
            comparison: Vec::new(),
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now(),
                processing_time_ms: start_time.elapsed().as_millis() as u64,
                version: env!("CARGO_PKG_VERSION").to_string(),
                weights: self.scorer.weights(),
                thresholds: self.thresholds,
                similarity: self.scorer.algorithm().to_string(),
            },
        }
    }
}

fn usable_text(text: Result<String>) -> std::result::Result<String, String> {
    match text {
        Ok(text) if text.trim().is_empty() => Err("No extractable text".to_string()),
        Ok(text) => Ok(text),
        Err(e) => Err(e.to_string()),
    }
}

fn record_event(sink: Option<&dyn ResultSink>, event_type: EventType, item_name: &str) {
    if let Some(sink) = sink {
        if let Err(e) = sink.log_event(&AuditEvent::new(event_type, item_name)) {
            warn!("Failed to record {} for {}: {}", event_type, item_name, e);
        }
    }
}
