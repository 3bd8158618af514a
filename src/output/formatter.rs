//! Output formatters for batch reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeRelevanceError};
use crate::output::report::*;
use crate::processing::verdict::Verdict;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

const BAR_WIDTH: usize = 30;

/// Trait for formatting batch reports
pub trait OutputFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors, a score chart and optional per-candidate detail
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Relevance Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1000px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .section h2 {
            color: #007acc;
            border-bottom: 2px solid #e9ecef;
            padding-bottom: 10px;
        }
        table { border-collapse: collapse; width: 100%; }
        th, td { border-bottom: 1px solid #e9ecef; padding: 8px; text-align: left; vertical-align: top; }
        .bar { background: #007acc; height: 12px; border-radius: 6px; }
        .verdict { font-weight: bold; padding: 2px 10px; border-radius: 12px; color: white; }
        .strong { background: #28a745; }
        .moderate { background: #ffc107; color: #000; }
        .weak { background: #dc3545; }
        .candidate { background: #f8f9fa; padding: 15px; border-radius: 6px; margin: 15px 0; border-left: 4px solid #007acc; }
        .compare { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; }
        mark { background: #fff3a3; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Resume Relevance Report</h1>
            <p>Job description: <strong>{{ job_name }}</strong></p>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <div class="section">
            <h2>Required Skills</h2>
            <p>{{ job_skills }}</p>
        </div>

        <div class="section">
            <h2>Ranking</h2>
            <table>
                <tr><th>#</th><th>Resume</th><th>Score</th><th></th><th>Verdict</th><th>Missing Skills</th></tr>
                {% for row in rows %}
                <tr>
                    <td>{{ row.rank }}</td>
                    <td>{{ row.resume_name }}</td>
                    <td>{{ row.final_score }}</td>
                    <td style="width: 160px"><div class="bar" style="width: {{ row.bar_percent }}%"></div></td>
                    <td><span class="verdict {{ row.verdict_class }}">{{ row.verdict }}</span></td>
                    <td>{{ row.missing }}</td>
                </tr>
                {% endfor %}
            </table>
        </div>

        <div class="section">
            <h2>Verdict Distribution</h2>
            <ul>
                {% for item in distribution %}
                <li>{{ item }}</li>
                {% endfor %}
            </ul>
        </div>

        {% if has_comparison %}
        <div class="section">
            <h2>Comparison</h2>
            <div class="compare">
                {% for row in compared %}
                <div class="candidate">
                    <h3>{{ row.resume_name }}</h3>
                    <p><strong>{{ row.final_score }}</strong> <span class="verdict {{ row.verdict_class }}">{{ row.verdict }}</span></p>
                    <p>Hard: {{ row.hard_score }} | Semantic: {{ row.semantic_score }}</p>
                    <p>Missing: {{ row.missing }}</p>
                </div>
                {% endfor %}
            </div>
        </div>
        {% endif %}

        <div class="section">
            <h2>Candidate Feedback</h2>
            {% for row in rows %}
            <div class="candidate">
                <h3>{{ row.resume_name }}</h3>
                <p>Hard: {{ row.hard_score }} | Semantic: {{ row.semantic_score }}</p>
                <p>{{ row.feedback }}</p>
                {{ row.snippets_html|safe }}
            </div>
            {% endfor %}
        </div>

        {% if has_failures %}
        <div class="section">
            <h2>Skipped Resumes</h2>
            <ul>
                {% for failure in failures %}
                <li>{{ failure }}</li>
                {% endfor %}
            </ul>
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>Generated by resume-relevance v{{ version }}</strong></p>
            <p>Weights: {{ weights }} | Thresholds: {{ thresholds }} | Similarity: {{ similarity }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    job_name: String,
    job_skills: String,
    generated_at: String,
    processing_time: u64,
    rows: Vec<HtmlRow>,
    distribution: Vec<String>,
    has_comparison: bool,
    compared: Vec<HtmlRow>,
    has_failures: bool,
    failures: Vec<String>,
    version: String,
    weights: String,
    thresholds: String,
    similarity: String,
}

struct HtmlRow {
    rank: usize,
    resume_name: String,
    final_score: String,
    hard_score: String,
    semantic_score: String,
    bar_percent: String,
    verdict: String,
    verdict_class: &'static str,
    missing: String,
    feedback: String,
    snippets_html: String,
}

impl HtmlRow {
    fn new(rank: usize, candidate: &CandidateResult) -> Self {
        Self {
            rank,
            resume_name: candidate.resume_name.clone(),
            final_score: format!("{:.2}", candidate.score.final_score),
            hard_score: format!("{:.2}", candidate.score.hard_score),
            semantic_score: format!("{:.2}", candidate.score.semantic_score),
            bar_percent: format!("{:.0}", candidate.score.final_score.clamp(0.0, 100.0)),
            verdict: candidate.verdict.to_string(),
            verdict_class: match candidate.verdict {
                Verdict::StrongMatch => "strong",
                Verdict::ModerateMatch => "moderate",
                Verdict::WeakMatch => "weak",
            },
            missing: candidate.missing_display(),
            feedback: candidate.feedback.clone(),
            snippets_html: candidate.snippets_html(),
        }
    }
}

fn format_timestamp(report: &BatchReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_distribution(report: &BatchReport) -> Vec<String> {
    let total = report.candidates.len().max(1) as f64;
    report
        .verdict_distribution()
        .iter()
        .map(|vc| format!("{}: {} ({:.1}%)", vc.verdict, vc.count, vc.count as f64 * 100.0 / total))
        .collect()
}

fn job_skills_display(report: &BatchReport) -> String {
    if report.job.skills.is_empty() {
        "None recognized".to_string()
    } else {
        report.job.skills.join(", ")
    }
}

/// Snippet markup rendered for a terminal: marks become `[..]`, entities decoded
fn snippet_to_text(snippet: &str) -> (String, Vec<(usize, usize)>) {
    let mut text = String::new();
    let mut marks = Vec::new();
    let mut rest = snippet;
    let mut open = None;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("<mark>") {
            open = Some(text.len());
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("</mark>") {
            if let Some(start) = open.take() {
                marks.push((start, text.len()));
            }
            rest = tail;
        } else if let Some((entity, decoded)) = [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"')]
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            text.push(*decoded);
            rest = &rest[entity.len()..];
        } else if let Some(c) = rest.chars().next() {
            text.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    (text, marks)
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn verdict_color(verdict: Verdict) -> Color {
        match verdict {
            Verdict::StrongMatch => Color::Green,
            Verdict::ModerateMatch => Color::Yellow,
            Verdict::WeakMatch => Color::Red,
        }
    }

    fn format_verdict(&self, verdict: Verdict) -> String {
        if self.use_colors {
            verdict.label().color(Self::verdict_color(verdict)).bold().to_string()
        } else {
            verdict.label().to_string()
        }
    }

    fn format_bar(&self, candidate: &CandidateResult) -> String {
        let filled = ((candidate.score.final_score.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        self.colorize(&bar, Self::verdict_color(candidate.verdict))
    }

    fn format_snippet(&self, snippet: &str) -> String {
        let (text, marks) = snippet_to_text(snippet);
        let mut output = String::new();
        let mut last = 0;
        for (start, end) in marks {
            output.push_str(&text[last..start]);
            let marked = &text[start..end];
            if self.use_colors {
                output.push_str(&marked.black().on_yellow().to_string());
            } else {
                output.push_str(&format!("[{}]", marked));
            }
            last = end;
        }
        output.push_str(&text[last..]);
        output
    }

    fn format_candidate_detail(&self, candidate: &CandidateResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            self.colorize(&candidate.resume_name, Color::Cyan),
            self.format_verdict(candidate.verdict)
        ));
        output.push_str(&format!(
            "  Final: {:.2} | Hard: {:.2} | Semantic: {:.2}\n",
            candidate.score.final_score, candidate.score.hard_score, candidate.score.semantic_score
        ));
        if !candidate.score.found_skills.is_empty() {
            output.push_str(&format!(
                "  Found: {}\n",
                self.colorize(&candidate.score.found_skills.join(", "), Color::Green)
            ));
        }
        output.push_str(&format!(
            "  Missing: {}\n",
            self.colorize(&candidate.missing_display(), Color::Red)
        ));
        output.push_str(&format!("  Feedback: {}\n", candidate.feedback));

        for snippet in &candidate.snippets {
            output.push_str(&format!(
                "    • {}: ...{}...\n",
                skill_label(snippet.skill.name(), snippet.matched),
                self.format_snippet(&snippet.snippet)
            ));
        }
        output.push('\n');
        output
    }
}

fn skill_label(name: &str, matched: bool) -> String {
    if matched {
        name.to_string()
    } else {
        format!("{} (not mentioned)", name)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        // Header
        output.push_str(&self.format_header("RESUME RELEVANCE REPORT", 1));
        output.push_str(&format!(
            "Job: {} | Generated: {} | Processing time: {}ms\n",
            report.job.name,
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Required skills: {}\n",
            self.colorize(&job_skills_display(report), Color::Cyan)
        ));

        // Ranking with score chart
        output.push_str(&self.format_header("Ranking", 2));
        if report.candidates.is_empty() {
            output.push_str("No resumes were scored.\n");
        }
        let name_width = report
            .candidates
            .iter()
            .map(|c| c.resume_name.chars().count())
            .max()
            .unwrap_or(0);
        for (i, candidate) in report.ranked().into_iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. {:<width$}  {} {:>6.2}  {}\n",
                i + 1,
                candidate.resume_name,
                self.format_bar(candidate),
                candidate.score.final_score,
                self.format_verdict(candidate.verdict),
                width = name_width
            ));
        }

        // Verdict distribution
        if !report.candidates.is_empty() {
            output.push_str(&self.format_header("Verdict Distribution", 3));
            for line in format_distribution(report) {
                output.push_str(&format!("  • {}\n", line));
            }
        }

        // Comparison
        let compared = report.compared();
        if !compared.is_empty() {
            output.push_str(&self.format_header("Comparison", 2));
            output.push_str(&format!(
                "{:<width$}  {:>8}  {:>8}  {:>8}  {}\n",
                "Resume",
                "Final",
                "Hard",
                "Semantic",
                "Missing",
                width = name_width.max(6)
            ));
            for candidate in compared {
                output.push_str(&format!(
                    "{:<width$}  {:>8.2}  {:>8.2}  {:>8.2}  {}\n",
                    candidate.resume_name,
                    candidate.score.final_score,
                    candidate.score.hard_score,
                    candidate.score.semantic_score,
                    candidate.missing_display(),
                    width = name_width.max(6)
                ));
            }
        }

        // Feedback
        output.push_str(&self.format_header("Feedback", 2));
        if self.detailed {
            for candidate in &report.candidates {
                output.push_str(&self.format_candidate_detail(candidate));
            }
        } else {
            for candidate in &report.candidates {
                output.push_str(&format!(
                    "  • {}: {}\n",
                    self.colorize(&candidate.resume_name, Color::Cyan),
                    candidate.feedback
                ));
            }
        }

        // Failures
        if !report.failures.is_empty() {
            output.push_str(&self.format_header("Skipped Resumes", 3));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  • {} {}\n",
                    self.colorize(&failure.resume_name, Color::Red),
                    self.colorize(&format!("({})", failure.reason), Color::BrightBlack)
                ));
            }
        }

        // Footer
        output.push_str(&format!(
            "\n{} Generated by resume-relevance v{} | Similarity: {}\n",
            self.colorize("ℹ", Color::Blue),
            report.metadata.version,
            report.metadata.similarity
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &BatchReport) -> HtmlTemplate {
        let rows: Vec<HtmlRow> = report
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| HtmlRow::new(i + 1, candidate))
            .collect();
        let compared: Vec<HtmlRow> = report
            .compared()
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| HtmlRow::new(i + 1, candidate))
            .collect();
        let failures: Vec<String> = report
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.resume_name, f.reason))
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            job_name: report.job.name.clone(),
            job_skills: job_skills_display(report),
            generated_at: format_timestamp(report),
            processing_time: report.metadata.processing_time_ms,
            rows,
            distribution: format_distribution(report),
            has_comparison: !compared.is_empty(),
            compared,
            has_failures: !failures.is_empty(),
            failures,
            version: report.metadata.version.clone(),
            weights: format!(
                "hard {:.2} / semantic {:.2}",
                report.metadata.weights.hard, report.metadata.weights.semantic
            ),
            thresholds: format!(
                "strong ≥ {} / moderate ≥ {}",
                report.metadata.thresholds.strong, report.metadata.thresholds.moderate
            ),
            similarity: report.metadata.similarity.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeRelevanceError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Relevance Report\n\n");
        output.push_str(&format!("**Job description:** `{}`\n\n", report.job.name));

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n\n",
                format_timestamp(report),
                report.metadata.processing_time_ms
            ));
        }

        output.push_str(&format!("**Required skills:** {}\n\n", job_skills_display(report)));

        // Ranking
        output.push_str("## Ranking\n\n");
        output.push_str("| # | Resume | Score | Hard | Semantic | Verdict | Missing Skills |\n");
        output.push_str("|---|--------|-------|------|----------|---------|----------------|\n");
        for (i, candidate) in report.ranked().into_iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {:.2} | {:.2} | {} | {} |\n",
                i + 1,
                Self::escape_cell(&candidate.resume_name),
                candidate.score.final_score,
                candidate.score.hard_score,
                candidate.score.semantic_score,
                candidate.verdict,
                Self::escape_cell(&candidate.missing_display())
            ));
        }
        output.push('\n');

        // Verdict distribution
        if !report.candidates.is_empty() {
            output.push_str("## Verdict Distribution\n\n");
            for line in format_distribution(report) {
                output.push_str(&format!("- {}\n", line));
            }
            output.push('\n');
        }

        // Comparison
        let compared = report.compared();
        if !compared.is_empty() {
            output.push_str("## Comparison\n\n");
            output.push_str("| Metric |");
            for candidate in &compared {
                output.push_str(&format!(" {} |", Self::escape_cell(&candidate.resume_name)));
            }
            output.push_str("\n|--------|");
            output.push_str(&"---|".repeat(compared.len()));
            output.push('\n');

            let metric_rows: [(&str, fn(&CandidateResult) -> String); 5] = [
                ("Final score", |c| format!("{:.2}", c.score.final_score)),
                ("Hard score", |c| format!("{:.2}", c.score.hard_score)),
                ("Semantic score", |c| format!("{:.2}", c.score.semantic_score)),
                ("Verdict", |c| c.verdict.to_string()),
                ("Missing skills", |c| c.missing_display()),
            ];
            for (label, value) in metric_rows {
                output.push_str(&format!("| {} |", label));
                for candidate in &compared {
                    output.push_str(&format!(" {} |", Self::escape_cell(&value(*candidate))));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        // Feedback
        output.push_str("## Feedback\n\n");
        for candidate in &report.candidates {
            output.push_str(&format!("### {}\n\n", candidate.resume_name));
            output.push_str(&format!("{}\n\n", candidate.feedback));
            for snippet in &candidate.snippets {
                output.push_str(&format!(
                    "- **{}:** ...{}...\n",
                    skill_label(snippet.skill.name(), snippet.matched),
                    snippet.snippet
                ));
            }
            if !candidate.snippets.is_empty() {
                output.push('\n');
            }
        }

        // Failures
        if !report.failures.is_empty() {
            output.push_str("## Skipped Resumes\n\n");
            for failure in &report.failures {
                output.push_str(&format!("- `{}`: {}\n", failure.resume_name, failure.reason));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by resume-relevance v{} (weights {:.2}/{:.2}, {} similarity)*\n",
                report.metadata.version,
                report.metadata.weights.hard,
                report.metadata.weights.semantic,
                report.metadata.similarity
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &BatchReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, job_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(job_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_relevance{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_relevance{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_relevance{}.md", base_name, timestamp_suffix),
        OutputFormat::Html => format!("{}_relevance{}.html", base_name, timestamp_suffix),
    }
}
