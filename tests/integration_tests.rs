//! Integration tests for the resume relevance checker

use resume_relevance::config::{Config, OutputFormat};
use resume_relevance::input::manager::InputManager;
use resume_relevance::output::ReportGenerator;
use resume_relevance::processing::analyzer::{AnalysisEngine, ResumeInput};
use resume_relevance::processing::verdict::Verdict;
use resume_relevance::storage::{Database, ResultSink};
use std::io::Write;
use std::path::Path;

const JOB: &str = "tests/fixtures/job_description.txt";
const RESUME_TXT: &str = "tests/fixtures/sample_resume.txt";
const RESUME_MD: &str = "tests/fixtures/sample_resume.md";

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new(RESUME_TXT);

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new(RESUME_MD);

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_text_extraction_from_docx() {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(
        br#"<w:document><w:body><w:p><w:r><w:t>Jane Roe</w:t></w:r></w:p><w:p><w:r><w:t>Python &amp; AWS</w:t></w:r></w:p></w:body></w:document>"#,
    )
    .unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jane.docx");
    std::fs::write(&path, bytes).unwrap();

    let text = InputManager::new().extract_text(&path).await.unwrap();
    assert_eq!(text, "Jane Roe\nPython & AWS");
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new(RESUME_TXT);

    // First extraction
    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    // Second extraction should use cache
    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

async fn load_batch(manager: &mut InputManager) -> (String, Vec<ResumeInput>) {
    let jd_text = manager.extract_text(Path::new(JOB)).await.unwrap();
    let mut resumes = Vec::new();
    for path in [RESUME_TXT, "tests/fixtures/missing_resume.pdf", RESUME_MD] {
        let text = manager.extract_text(Path::new(path)).await;
        let name = Path::new(path).file_name().unwrap().to_string_lossy().to_string();
        resumes.push(ResumeInput::new(name, text));
    }
    (jd_text, resumes)
}

#[tokio::test]
async fn test_batch_analysis_end_to_end() {
    let mut manager = InputManager::new();
    let (jd_text, resumes) = load_batch(&mut manager).await;

    let db = Database::open_in_memory().unwrap();
    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let report = engine.analyze("job_description.txt", &jd_text, resumes, Some(&db as &dyn ResultSink));

    assert_eq!(
        report.job.skills.names(),
        vec!["Python", "SQL", "AWS", "Docker", "Kubernetes", "API", "REST", "Machine Learning"]
    );

    assert_eq!(report.candidates.len(), 2);
    let txt = report.find("sample_resume.txt").unwrap();
    assert_eq!(txt.score.hard_score, 75.0);
    assert_eq!(txt.score.missing_skills.names(), vec!["AWS", "Machine Learning"]);
    assert_eq!(txt.snippets.len(), 2);
    assert!(txt.score.final_score >= 52.5 && txt.score.final_score <= 82.5);
    assert_ne!(txt.verdict, Verdict::StrongMatch);
    assert!(txt.feedback.ends_with("AWS, Machine Learning"));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].resume_name, "missing_resume.pdf");

    let stored = db.recent_results(10).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|r| r.jd_name == "job_description.txt"));
    assert!(stored.iter().any(|r| r.missing_keywords == "AWS, Machine Learning"));

    let events = db.recent_events(50).unwrap();
    assert_eq!(events.len(), 4);
    assert!(events.iter().any(|e| e.event_type == "JD_UPLOADED"));
    assert_eq!(events.iter().filter(|e| e.event_type == "RESULT_SAVED").count(), 2);
    assert_eq!(events.iter().filter(|e| e.event_type == "EXTRACTION_FAILED").count(), 1);
}

#[tokio::test]
async fn test_batch_report_in_every_format() {
    let mut manager = InputManager::new();
    let (jd_text, resumes) = load_batch(&mut manager).await;

    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let names = vec!["sample_resume.txt".to_string(), "sample_resume.md".to_string()];
    let report = engine
        .analyze("job_description.txt", &jd_text, resumes, None)
        .with_comparison(&names, 3)
        .unwrap();

    let generator = ReportGenerator::with_options(false, true, true, true, true);
    for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Html] {
        let output = generator.generate_report(&report, &format).unwrap();
        assert!(output.contains("sample_resume.md"), "{:?} output lacks candidate", format);
        assert!(output.contains("missing_resume.pdf"), "{:?} output lacks failure", format);
    }
}

#[tokio::test]
async fn test_unsupported_resume_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = dir.path().join("old.doc");
    std::fs::write(&legacy, b"binary word document").unwrap();

    let mut manager = InputManager::new();
    let jd_text = manager.extract_text(Path::new(JOB)).await.unwrap();
    let resumes = vec![
        ResumeInput::new("sample_resume.txt", manager.extract_text(Path::new(RESUME_TXT)).await),
        ResumeInput::new("old.doc", manager.extract_text(&legacy).await),
    ];

    let db = Database::open_in_memory().unwrap();
    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let report = engine.analyze("job_description.txt", &jd_text, resumes, Some(&db as &dyn ResultSink));

    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].resume_name, "sample_resume.txt");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].resume_name, "old.doc");
    assert!(report.failures[0].reason.contains("not supported"));

    let events = db.recent_events(50).unwrap();
    let failed: Vec<_> = events.iter().filter(|e| e.event_type == "EXTRACTION_FAILED").collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].item_name.as_deref(), Some("old.doc"));
}

#[tokio::test]
async fn test_custom_vocabulary_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "[skills]\nvocabulary = [\"Node.js\", \"React\"]\nadditional = [\"Terraform\"]\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let engine = AnalysisEngine::new(&config).unwrap();
    assert_eq!(engine.vocabulary().len(), 3);

    let text = InputManager::new().extract_text(Path::new(RESUME_TXT)).await.unwrap();
    let skills = engine.job_skills(Some(&text));
    assert_eq!(skills.names(), vec!["Node.js", "React"]);
}
