//! Data types passed between extraction and writing.
//!
//! The writer pulls pages from a [`PageSource`] one at a time and drops each
//! page (with its decoded bitmaps) before asking for the next. The pdfium
//! extractor is one source; [`ExtractedDocument`] is an in-memory one.

use crate::error::Pdf2MdError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document-level information read from the PDF info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Pages in the whole document, regardless of selection.
    pub page_count: usize,
    /// e.g. `"Pdf1_7"`; empty when unknown.
    pub pdf_version: String,
}

/// Raw content of one page.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-indexed page number within the source document.
    pub page_num: usize,
    /// Text as returned by the PDF engine, before cleanup.
    pub text: String,
    /// Decoded embedded images in content-stream order.
    pub images: Vec<DynamicImage>,
}

impl PageContent {
    pub fn new(page_num: usize, text: impl Into<String>) -> Self {
        Self {
            page_num,
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: DynamicImage) -> Self {
        self.images.push(image);
        self
    }
}

/// A document the Markdown writer can consume page by page.
pub trait PageSource {
    /// Base name of the source file, used in the top-level heading.
    fn file_name(&self) -> &str;

    fn metadata(&self) -> &DocumentMetadata;

    /// Number of pages still to be yielded by [`PageSource::next_page`].
    fn remaining_pages(&self) -> usize;

    /// Read the next selected page, or `None` once all have been yielded.
    fn next_page(&mut self) -> Option<Result<PageContent, Pdf2MdError>>;
}

impl<S: PageSource + ?Sized> PageSource for &mut S {
    fn file_name(&self) -> &str {
        (**self).file_name()
    }

    fn metadata(&self) -> &DocumentMetadata {
        (**self).metadata()
    }

    fn remaining_pages(&self) -> usize {
        (**self).remaining_pages()
    }

    fn next_page(&mut self) -> Option<Result<PageContent, Pdf2MdError>> {
        (**self).next_page()
    }
}

/// A fully materialised document, yielded front to back.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub file_name: String,
    pub metadata: DocumentMetadata,
    /// Selected pages in ascending order.
    pub pages: Vec<PageContent>,
}

impl PageSource for ExtractedDocument {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    fn remaining_pages(&self) -> usize {
        self.pages.len()
    }

    fn next_page(&mut self) -> Option<Result<PageContent, Pdf2MdError>> {
        if self.pages.is_empty() {
            None
        } else {
            Some(Ok(self.pages.remove(0)))
        }
    }
}

/// An image file written next to the Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedImage {
    pub page_num: usize,
    /// 1-indexed position of the image on its page.
    pub index: usize,
    /// `page{N}_img{index}.{ext}`
    pub file_name: String,
    pub path: PathBuf,
}

/// Counters for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages written to the Markdown (the selection).
    pub converted_pages: usize,
    /// Converted pages with no extractable text.
    pub empty_pages: usize,
    pub images_written: usize,
    pub markdown_bytes: usize,
    pub total_duration_ms: u64,
}

/// Result of writing a document to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub markdown_path: PathBuf,
    /// Directory images were written to, when image extraction was enabled.
    pub images_dir: Option<PathBuf>,
    pub images: Vec<SavedImage>,
    pub metadata: DocumentMetadata,
    pub stats: ConversionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_document_yields_pages_in_order() {
        let mut doc = ExtractedDocument {
            file_name: "a.pdf".into(),
            metadata: DocumentMetadata::default(),
            pages: vec![PageContent::new(2, "two"), PageContent::new(5, "five")],
        };
        assert_eq!(doc.remaining_pages(), 2);

        let first = doc.next_page().unwrap().unwrap();
        assert_eq!((first.page_num, first.text.as_str()), (2, "two"));
        assert_eq!(doc.remaining_pages(), 1);

        let second = doc.next_page().unwrap().unwrap();
        assert_eq!(second.page_num, 5);
        assert!(doc.next_page().is_none());
        assert_eq!(doc.remaining_pages(), 0);
    }
}
