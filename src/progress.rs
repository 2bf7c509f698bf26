//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the writer walks each page. The CLI uses it to drive an
//! indicatif progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use pdf2md_lite::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct ImageCounter {
//!     saved: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for ImageCounter {
//!     fn on_page_complete(&self, _page_num: usize, _total: usize, _text_len: usize, images: usize) {
//!         self.saved.fetch_add(images, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(ImageCounter { saved: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// Pages are processed strictly in order on the calling thread, so events
/// arrive in page order. The trait is still `Send + Sync` so a config can be
/// shared across threads. All methods have default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first page is written.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be processed
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page's text and images are written.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — number of pages being processed
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page section is complete.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — number of pages being processed
    /// * `text_len`    — byte length of the cleaned page text (0 when empty)
    /// * `images`      — images saved for this page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize, images: usize) {
        let _ = (page_num, total_pages, text_len, images);
    }

    /// Called once after the Markdown file is in place.
    ///
    /// # Arguments
    /// * `total_pages`   — pages processed
    /// * `images_written` — images saved across all pages
    fn on_conversion_complete(&self, total_pages: usize, images_written: usize) {
        let _ = (total_pages, images_written);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
