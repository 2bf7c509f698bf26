//! Error type for the pdf2md-lite library.
//!
//! Every failure is fatal: the converter walks pages strictly in order and
//! stops at the first error. There is no per-page error channel and no partial
//! output; the Markdown file is only renamed into place once complete.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2md-lite library.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input PDF not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium failed while reading text or image objects of a page.
    #[error("Extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// An embedded image could not be re-encoded.
    #[error("Failed to encode image {index} on page {page}: {source}")]
    ImageEncodeFailed {
        page: usize,
        index: usize,
        #[source]
        source: image::ImageError,
    },

    /// An encoded image could not be written to the images directory.
    #[error("Failed to write image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the working directory, install it system-wide,\n\
or set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),
}

impl Pdf2MdError {
    /// True when the error means the input file does not exist.
    ///
    /// `pdf2md` exits with status 2 in this case.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Pdf2MdError::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_names_path() {
        let e = Pdf2MdError::FileNotFound {
            path: PathBuf::from("/no/such.pdf"),
        };
        assert!(e.to_string().contains("/no/such.pdf"));
        assert!(e.is_missing_input());
    }

    #[test]
    fn extraction_failed_display() {
        let e = Pdf2MdError::ExtractionFailed {
            page: 3,
            detail: "bad object".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("bad object"));
        assert!(!e.is_missing_input());
    }

    #[test]
    fn image_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = Pdf2MdError::ImageWriteFailed {
            path: PathBuf::from("out/page1_img1.png"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.to_string().contains("page1_img1.png"));
        assert!(e.source().is_some());
    }

    #[test]
    fn binding_failure_mentions_env_var() {
        let e = Pdf2MdError::PdfiumBindingFailed("not found".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
