//! Input manager for handling different file types

use crate::error::{Result, ResumeRelevanceError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        // Check cache first
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeRelevanceError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Docx => {
                info!("Extracting text from DOCX: {}", path.display());
                DocxExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeRelevanceError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Extract from an in-memory buffer; `file_name` only selects the format
    pub fn extract_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        match self.detect_file_type(Path::new(file_name))? {
            FileType::Pdf => PdfExtractor.extract_bytes(bytes),
            FileType::Docx => DocxExtractor.extract_bytes(bytes),
            FileType::Text => PlainTextExtractor.extract_bytes(bytes),
            FileType::Markdown => MarkdownExtractor.extract_bytes(bytes),
            FileType::Unknown => Err(ResumeRelevanceError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                file_name
            ))),
        }
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        if path.extension().is_none() {
            return Err(ResumeRelevanceError::InvalidInput(format!(
                "File has no extension: {}",
                path.display()
            )));
        }
        Ok(FileType::from_path(path))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_extract_bytes_dispatches_on_name() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<w:document><w:body><w:p><w:r><w:t>Kubernetes</w:t></w:r></w:p></w:body></w:document>")
            .unwrap();
        let docx = zip.finish().unwrap().into_inner();

        let manager = InputManager::new();
        assert_eq!(manager.extract_bytes("cv.docx", &docx).unwrap(), "Kubernetes");
        assert_eq!(manager.extract_bytes("cv.md", b"**Rust**").unwrap(), "Rust");
        assert!(matches!(
            manager.extract_bytes("cv.doc", b"legacy"),
            Err(ResumeRelevanceError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            manager.extract_bytes("cv", b"text"),
            Err(ResumeRelevanceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let mut manager = InputManager::new().with_cache(false);
        let text = manager.extract_text(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap();
        assert!(text.contains("John Doe"));
        assert_eq!(manager.cache_size(), 0);
    }
}
