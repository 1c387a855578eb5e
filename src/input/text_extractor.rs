//! Text extraction from candidate and job documents

use crate::error::{MatcherError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Decode uploaded bytes as UTF-8; anything else yields an empty document
pub fn decode_upload(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{FEFF}').to_string(),
        Err(_) => String::new(),
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            MatcherError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        String::from_utf8(bytes).map_err(|_| {
            MatcherError::MalformedDocument(format!("'{}' is not valid UTF-8", path.display()))
        })
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = PlainTextExtractor.extract(path).await?;
        Ok(markdown_to_text(&markdown))
    }
}

/// Plain text of a Markdown document, one block per line
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_upload() {
        assert_eq!(decode_upload(b"Rust engineer"), "Rust engineer");
        assert_eq!(decode_upload(b"\xEF\xBB\xBFPython"), "Python");
        assert_eq!(decode_upload(&[0xff, 0xfe, 0x00, 0x52]), "");
    }

    #[test]
    fn test_markdown_to_text() {
        let markdown = "# Jane Roe\n\n**Senior** engineer using `Rust`\nand Go.\n\n- Docker\n- AWS\n";
        let text = markdown_to_text(markdown);

        assert_eq!(text, "Jane Roe\nSenior engineer using Rust and Go.\nDocker\nAWS");
    }
}
