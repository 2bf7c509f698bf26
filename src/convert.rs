//! Conversion entry points.
//!
//! [`convert_to_file`] runs the whole pipeline: it opens the PDF as a
//! [`PageSource`] and hands it to [`write_document`], which pulls one page at
//! a time, saves that page's images and renders its section before reading
//! the next. The writer never touches pdfium itself, so any source works.

use crate::config::{ConversionConfig, ImageFormat};
use crate::error::Pdf2MdError;
use crate::output::{
    ConversionOutput, ConversionStats, DocumentMetadata, PageContent, PageSource, SavedImage,
};
use crate::pipeline::{encode, extract, input, markdown, postprocess};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file and write the Markdown to `output_path`.
///
/// Images go to [`ConversionConfig::images_dir`] when set.
///
/// # Errors
/// Every failure is fatal: missing or unreadable input, a file that is not a
/// PDF, a pdfium failure, or any write error. The Markdown file only appears
/// once it is complete.
///
/// # Example
/// ```rust,no_run
/// use pdf2md_lite::{convert_to_file, default_images_dir, ConversionConfig};
///
/// let md = std::path::Path::new("report.md");
/// let config = ConversionConfig::builder()
///     .images_dir(default_images_dir(md))
///     .build()?;
/// let output = convert_to_file("report.pdf", md, &config)?;
/// println!("{} images", output.stats.images_written);
/// # Ok::<(), pdf2md_lite::Pdf2MdError>(())
/// ```
pub fn convert_to_file(
    pdf_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError> {
    let start = Instant::now();
    let pdf_path = input::resolve_local(pdf_path)?;
    info!("Starting conversion: {}", pdf_path.display());

    let pdfium = extract::bind_pdfium()?;
    let pages = extract::open_pages(&pdfium, &pdf_path, config)?;
    let mut output = write_document(pages, output_path.as_ref(), config)?;
    output.stats.total_duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Write a document as Markdown plus image files.
///
/// Pages are pulled from `source` strictly in order and each one is dropped
/// before the next is read, so at most one page's bitmaps are held at a time.
/// Within a page, images are handled in order.
/// Each image is encoded and saved as `page{N}_img{index}.{ext}` before the
/// page section referencing it is rendered. The images directory is created
/// on the first image, so a document without images leaves no directory.
pub fn write_document(
    mut source: impl PageSource,
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError> {
    let start = Instant::now();
    let total = source.remaining_pages();
    let metadata = source.metadata().clone();
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    let link_dir = config
        .images_dir
        .as_deref()
        .map(markdown::link_dir_name)
        .unwrap_or_default();

    let mut md = String::new();
    if config.include_metadata {
        md.push_str(&markdown::front_matter(&metadata));
    }
    md.push_str(&markdown::document_header(
        source.file_name(),
        metadata.page_count,
    ));

    let mut images = Vec::new();
    let mut empty_pages = 0;
    let mut converted = 0;
    while let Some(page) = source.next_page() {
        let page = page?;
        converted += 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page.page_num, total);
        }

        let text = postprocess::clean_text(&page.text);
        if text.is_none() {
            empty_pages += 1;
        }
        let saved = match config.images_dir.as_deref() {
            Some(dir) => save_page_images(&page, dir, config.image_format)?,
            None => Vec::new(),
        };
        md.push_str(&markdown::page_section(
            page.page_num,
            text.as_deref(),
            &saved,
            &link_dir,
        ));

        debug!(
            "Page {}: {} chars, {} images",
            page.page_num,
            text.as_ref().map_or(0, String::len),
            saved.len()
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(
                page.page_num,
                total,
                text.as_ref().map_or(0, String::len),
                saved.len(),
            );
        }
        images.extend(saved);
    }

    write_atomic(output_path, &md)?;

    let stats = ConversionStats {
        total_pages: metadata.page_count,
        converted_pages: converted,
        empty_pages,
        images_written: images.len(),
        markdown_bytes: md.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Wrote {} ({} pages, {} images, {}ms)",
        output_path.display(),
        stats.converted_pages,
        stats.images_written,
        stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(converted, stats.images_written);
    }

    Ok(ConversionOutput {
        markdown_path: output_path.to_path_buf(),
        images_dir: config.images_dir.clone(),
        images,
        metadata,
        stats,
    })
}

/// Extract PDF metadata without converting content.
pub fn inspect(pdf_path: impl AsRef<Path>, password: Option<&str>) -> Result<DocumentMetadata, Pdf2MdError> {
    let pdf_path = input::resolve_local(pdf_path)?;
    extract::extract_metadata(&pdf_path, password)
}

/// `<input without extension>.md`
pub fn default_output_path(pdf_path: &Path) -> PathBuf {
    pdf_path.with_extension("md")
}

/// `<output without extension>_images`
pub fn default_images_dir(markdown_path: &Path) -> PathBuf {
    let mut dir: OsString = markdown_path.with_extension("").into_os_string();
    dir.push("_images");
    PathBuf::from(dir)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn save_page_images(
    page: &PageContent,
    dir: &Path,
    format: ImageFormat,
) -> Result<Vec<SavedImage>, Pdf2MdError> {
    let mut saved = Vec::with_capacity(page.images.len());
    for (i, img) in page.images.iter().enumerate() {
        let index = i + 1;
        let bytes = encode::encode_image(img, format).map_err(|source| {
            Pdf2MdError::ImageEncodeFailed {
                page: page.page_num,
                index,
                source,
            }
        })?;

        let file_name = encode::image_file_name(page.page_num, index, format);
        let path = dir.join(&file_name);
        fs::create_dir_all(dir)
            .and_then(|_| fs::write(&path, &bytes))
            .map_err(|source| Pdf2MdError::ImageWriteFailed {
                path: path.clone(),
                source,
            })?;
        debug!("Saved {} ({} bytes)", path.display(), bytes.len());

        saved.push(SavedImage {
            page_num: page.page_num,
            index,
            file_name,
            path,
        });
    }
    Ok(saved)
}

/// Atomic write: write to a sibling temp file, then rename.
fn write_atomic(path: &Path, contents: &str) -> Result<(), Pdf2MdError> {
    let write_failed = |source: std::io::Error| Pdf2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    fs::write(&tmp_path, contents).map_err(write_failed)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_failed(e));
    }
    Ok(())
}
