//! PDF extraction: page text and embedded images via pdfium.
//!
//! ## Binding order
//!
//! 1. `PDFIUM_LIB_PATH`, when set, names the library file to load.
//! 2. Otherwise a platform-named library in the working directory.
//! 3. Otherwise the system library search path.
//!
//! Pages are read lazily through [`PdfiumPages`]: text and decoded bitmaps
//! of a page are only loaded when the writer asks for that page.

use crate::config::{ConversionConfig, PageSelection};
use crate::error::Pdf2MdError;
use crate::output::{DocumentMetadata, PageContent, PageSource};
use crate::pipeline::input::display_name;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit pdfium library file.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2MdError> {
    if let Ok(explicit) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let path = PathBuf::from(explicit);
        debug!("Binding pdfium from {}={}", PDFIUM_LIB_PATH_ENV, path.display());
        return Pdfium::bind_to_library(&path)
            .map(Pdfium::new)
            .map_err(|e| Pdf2MdError::PdfiumBindingFailed(format!("{}: {e}", path.display())));
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Pdf2MdError::PdfiumBindingFailed(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// An open PDF yielding the selected pages one at a time.
pub struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
    file_name: String,
    metadata: DocumentMetadata,
    indices: vec::IntoIter<usize>,
    extract_images: bool,
}

/// Open `pdf_path` and prepare to read the pages selected in `config`.
///
/// Fails with [`Pdf2MdError::PageOutOfRange`] when an explicit selection
/// matches no page of the document.
pub fn open_pages<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    config: &'a ConversionConfig,
) -> Result<PdfiumPages<'a>, Pdf2MdError> {
    let document = open_document(pdfium, pdf_path, config.password.as_deref())?;

    let metadata = read_metadata(&document);
    let total_pages = metadata.page_count;
    info!("PDF loaded: {} pages", total_pages);

    let indices = config.pages.to_indices(total_pages);
    // An empty document still converts to a header-only file; only an explicit
    // selection that matches nothing is an error.
    if indices.is_empty() && config.pages != PageSelection::All {
        return Err(Pdf2MdError::PageOutOfRange {
            page: first_requested_page(config),
            total: total_pages,
        });
    }

    Ok(PdfiumPages {
        document,
        file_name: display_name(pdf_path),
        metadata,
        indices: indices.into_iter(),
        extract_images: config.extracts_images(),
    })
}

impl PdfiumPages<'_> {
    fn read_page(&self, idx: usize) -> Result<PageContent, Pdf2MdError> {
        let page_num = idx + 1;
        let page = self
            .document
            .pages()
            .get(idx as PdfPageIndex)
            .map_err(|e| extraction_failed(page_num, e))?;

        let text = page
            .text()
            .map_err(|e| extraction_failed(page_num, e))?
            .all();

        let images = if self.extract_images {
            page_images(&page, page_num)?
        } else {
            Vec::new()
        };

        debug!(
            "Extracted page {} → {} chars, {} images",
            page_num,
            text.len(),
            images.len()
        );
        Ok(PageContent {
            page_num,
            text,
            images,
        })
    }
}

impl PageSource for PdfiumPages<'_> {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    fn remaining_pages(&self) -> usize {
        self.indices.len()
    }

    fn next_page(&mut self) -> Option<Result<PageContent, Pdf2MdError>> {
        let idx = self.indices.next()?;
        Some(self.read_page(idx))
    }
}

/// Extract document metadata without reading any page content.
pub fn extract_metadata(pdf_path: &Path, password: Option<&str>) -> Result<DocumentMetadata, Pdf2MdError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;
    Ok(read_metadata(&document))
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2MdError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2MdError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Pdf2MdError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Pdf2MdError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// Decoded image objects of `page`, in content-stream order.
fn page_images(page: &PdfPage<'_>, page_num: usize) -> Result<Vec<DynamicImage>, Pdf2MdError> {
    let mut images = Vec::new();
    for object in page.objects().iter() {
        let Some(image_object) = object.as_image_object() else {
            continue;
        };
        let image = image_object
            .get_raw_image()
            .map_err(|e| extraction_failed(page_num, e))?;
        if image.width() == 0 || image.height() == 0 {
            warn!("Skipping empty image object on page {}", page_num);
            continue;
        }
        images.push(image);
    }
    Ok(images)
}

fn first_requested_page(config: &ConversionConfig) -> usize {
    match &config.pages {
        PageSelection::All => 1,
        PageSelection::Single(p) => *p,
        PageSelection::Range(start, _) => *start,
        PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(1),
    }
}

fn extraction_failed(page: usize, e: PdfiumError) -> Pdf2MdError {
    Pdf2MdError::ExtractionFailed {
        page,
        detail: format!("{:?}", e),
    }
}
