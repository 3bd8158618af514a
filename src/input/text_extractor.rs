//! Text extraction from various file formats

use crate::error::{Result, ResumeRelevanceError};
use pulldown_cmark::{html, Parser};
use regex::{Captures, Regex};
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String>;

    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send
    where
        Self: Sync,
    {
        async move {
            let bytes = fs::read(path).await?;
            self.extract_bytes(&bytes)
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ResumeRelevanceError::Processing(format!("Invalid pattern {}: {}", pattern, e)))
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ResumeRelevanceError::PdfExtraction(format!("Failed to extract text from PDF: {}", e))
        })
    }
}

/// Word documents: text runs of `word/document.xml`
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| ResumeRelevanceError::DocxExtraction(format!("Missing word/document.xml: {}", e)))?
            .read_to_string(&mut xml)?;

        self.xml_to_text(&xml)
    }
}

impl DocxExtractor {
    fn xml_to_text(&self, xml: &str) -> Result<String> {
        let tokens = compile(r"(?s)<w:t(?:\s[^>]*[^/])?>(.*?)</w:t>|<w:tab\s*/>|<w:(?:br|cr)(?:\s[^>]*)?/>|</w:p>")?;
        let entities = compile(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);")?;

        let mut text = String::new();
        for cap in tokens.captures_iter(xml) {
            if let Some(run) = cap.get(1) {
                text.push_str(&decode_entities(&entities, run.as_str()));
                continue;
            }
            match cap.get(0).map(|m| m.as_str()) {
                Some(tag) if tag.starts_with("<w:tab") => text.push('\t'),
                Some(_) => text.push('\n'),
                None => {}
            }
        }

        Ok(text.trim_end().to_string())
    }
}

fn decode_entities(entities: &Regex, text: &str) -> String {
    entities
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") => u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32),
                _ if entity.starts_with('#') => entity[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = String::from_utf8_lossy(bytes);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        let tags = compile(r"<[^>]*>")?;
        let clean_text = tags.replace_all(&text, "");

        let lines: Vec<&str> = clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs_and_entities() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Skills: </w:t></w:r><w:r><w:t>Python &amp; SQL</w:t></w:r></w:p>
            <w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C &#x2013; D</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = DocxExtractor.extract_bytes(&build_docx(xml)).unwrap();
        assert_eq!(text, "Jane Doe\nSkills: Python & SQL\nA\tB\nC \u{2013} D");
    }

    #[test]
    fn test_docx_self_closing_run_is_empty() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t xml:space="preserve"/></w:r><w:r><w:t>Next</w:t></w:r><w:r><w:t/></w:r></w:p></w:body></w:document>"#;
        let text = DocxExtractor.extract_bytes(&build_docx(xml)).unwrap();
        assert_eq!(text, "Next");
    }

    #[test]
    fn test_docx_without_document_part() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", zip::write::SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<x/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        assert!(matches!(
            DocxExtractor.extract_bytes(&bytes),
            Err(ResumeRelevanceError::DocxExtraction(_))
        ));
    }

    #[test]
    fn test_docx_not_a_zip() {
        assert!(DocxExtractor.extract_bytes(b"plain bytes").is_err());
    }

    #[test]
    fn test_markdown_stripped() {
        let text = MarkdownExtractor
            .extract_bytes(b"# Jane Doe\n\n**Skills:** Rust & Python\n\n- Docker\n- AWS")
            .unwrap();
        assert_eq!(text, "Jane Doe\nSkills: Rust & Python\nDocker\nAWS");
    }

    #[test]
    fn test_plain_text_lossy() {
        let text = PlainTextExtractor.extract_bytes(b"Python \xFF dev").unwrap();
        assert!(text.starts_with("Python"));
        assert!(text.ends_with("dev"));
    }
}
