//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Callers set only what they care about
//! and rely on the defaults for the rest.

use crate::error::Pdf2MdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2md_lite::{ConversionConfig, ImageFormat, PageSelection};
///
/// let config = ConversionConfig::builder()
///     .images_dir("out/report_images")
///     .image_format(ImageFormat::Jpeg)
///     .pages(PageSelection::Range(1, 3))
///     .build()
///     .unwrap();
/// assert!(config.extracts_images());
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// Directory receiving `page{N}_img{index}.{ext}` files. Default: None.
    ///
    /// `None` skips image extraction entirely; the Markdown then carries no
    /// image sections. The directory is created on the first image written,
    /// so a document without images leaves no directory behind.
    pub images_dir: Option<PathBuf>,

    /// Encoding used for saved images. Default: [`ImageFormat::Png`].
    pub image_format: ImageFormat,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Prepend YAML front-matter with document metadata. Default: false.
    pub include_metadata: bool,

    /// Optional per-page progress callback. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("images_dir", &self.images_dir)
            .field("image_format", &self.image_format)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field("include_metadata", &self.include_metadata)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether embedded images are extracted and saved.
    pub fn extracts_images(&self) -> bool {
        self.images_dir.is_some()
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.images_dir = Some(dir.into());
        self
    }

    /// Skip image extraction.
    pub fn no_images(mut self) -> Self {
        self.config.images_dir = None;
        self
    }

    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.config.image_format = format;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn include_metadata(mut self, v: bool) -> Self {
        self.config.include_metadata = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2MdError> {
        let c = &self.config;
        if matches!(&c.images_dir, Some(dir) if dir.as_os_str().is_empty()) {
            return Err(Pdf2MdError::InvalidConfig(
                "images directory must not be empty".into(),
            ));
        }
        c.pages.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Encoding for extracted images.
///
/// Embedded images are decoded by pdfium into bitmaps and re-encoded here,
/// so the on-disk format is a choice rather than a copy of the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless; keeps transparency. (default)
    #[default]
    Png,
    /// Smaller files for photographs; alpha is dropped.
    Jpeg,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub(crate) fn as_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    ///
    /// Pages beyond `total_pages` are dropped silently.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    fn validate(&self) -> Result<(), Pdf2MdError> {
        match self {
            PageSelection::All => Ok(()),
            PageSelection::Single(0) => Err(Pdf2MdError::InvalidConfig(
                "pages are 1-indexed, got 0".into(),
            )),
            PageSelection::Single(_) => Ok(()),
            PageSelection::Range(start, end) if *start == 0 || start > end => Err(
                Pdf2MdError::InvalidConfig(format!("invalid page range {start}-{end}")),
            ),
            PageSelection::Range(..) => Ok(()),
            PageSelection::Set(pages) if pages.is_empty() || pages.contains(&0) => Err(
                Pdf2MdError::InvalidConfig(format!("invalid page set {pages:?}")),
            ),
            PageSelection::Set(_) => Ok(()),
        }
    }
}

impl std::str::FromStr for PageSelection {
    type Err = Pdf2MdError;

    /// Parse `all`, `5`, `3-15` or `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let number = |p: &str| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| Pdf2MdError::InvalidConfig(format!("invalid page number '{}'", p.trim())))
        };

        let selection = if s == "all" {
            PageSelection::All
        } else if let Some((start, end)) = s.split_once('-') {
            PageSelection::Range(number(start)?, number(end)?)
        } else if s.contains(',') {
            PageSelection::Set(s.split(',').map(number).collect::<Result<_, _>>()?)
        } else {
            PageSelection::Single(number(s.as_str())?)
        };
        selection.validate()?;
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_skip_images() {
        let c = ConversionConfig::default();
        assert!(!c.extracts_images());
        assert_eq!(c.image_format, ImageFormat::Png);
        assert_eq!(c.pages, PageSelection::All);
        assert!(!c.include_metadata);
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(PageSelection::Range(4, 9).to_indices(5), vec![3, 4]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn parse_page_selection() {
        assert_eq!("all".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!("5".parse::<PageSelection>().unwrap(), PageSelection::Single(5));
        assert_eq!(
            "3-15".parse::<PageSelection>().unwrap(),
            PageSelection::Range(3, 15)
        );
        assert_eq!(
            "1, 3,5".parse::<PageSelection>().unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
        assert!("0".parse::<PageSelection>().is_err());
        assert!("9-2".parse::<PageSelection>().is_err());
        assert!("x".parse::<PageSelection>().is_err());
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(ConversionConfig::builder().images_dir("").build().is_err());
        assert!(ConversionConfig::builder()
            .pages(PageSelection::Range(0, 2))
            .build()
            .is_err());
    }

    #[test]
    fn no_images_clears_dir() {
        let c = ConversionConfig::builder()
            .images_dir("imgs")
            .no_images()
            .build()
            .unwrap();
        assert!(c.images_dir.is_none());
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        assert!(!format!("{c:?}").contains("hunter2"));
    }

    #[test]
    fn image_format_extensions() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }
}
