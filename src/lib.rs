//! # pdf2md-lite
//!
//! Extract the text and embedded images of a PDF into a Markdown file.
//!
//! No layout analysis and no OCR: each page becomes one `## Page N` section
//! holding the text pdfium reports for it, followed by links to the images
//! found on that page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    check the path exists and starts with %PDF
//!  ├─ 2. Extract  metadata, page text and decoded images via pdfium
//!  ├─ 3. Clean    line endings, trailing whitespace, invisible characters
//!  ├─ 4. Images   re-encode as PNG/JPEG into page{N}_img{index}.{ext}
//!  └─ 5. Output   fixed Markdown layout, written atomically
//! ```
//!
//! Everything runs synchronously, one page after another: a page is read,
//! its images are saved and its section rendered before the next page is
//! read. The first error aborts the conversion.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2md_lite::{convert_to_file, default_images_dir, ConversionConfig};
//! use std::path::Path;
//!
//! let md = Path::new("document.md");
//! let config = ConversionConfig::builder()
//!     .images_dir(default_images_dir(md))
//!     .build()?;
//! let output = convert_to_file("document.pdf", md, &config)?;
//! eprintln!("{} pages, {} images", output.stats.converted_pages, output.stats.images_written);
//! # Ok::<(), pdf2md_lite::Pdf2MdError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2md-lite = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! A pdfium shared library must be loadable at run time. Set
//! `PDFIUM_LIB_PATH` to its file path, drop it in the working directory, or
//! install it system-wide.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ImageFormat, PageSelection};
pub use convert::{convert_to_file, default_images_dir, default_output_path, inspect, write_document};
pub use error::Pdf2MdError;
pub use output::{
    ConversionOutput, ConversionStats, DocumentMetadata, ExtractedDocument, PageContent, PageSource,
    SavedImage,
};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
