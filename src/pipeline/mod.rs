//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step, so each can
//! be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ postprocess ──▶ encode ──▶ markdown
//! (path)    (pdfium)    (text cleanup)   (images)   (layout)
//! ```
//!
//! 1. [`input`]       — validate the user-supplied path and PDF magic bytes
//! 2. [`extract`]     — bind pdfium, read metadata, then page text and images on demand
//! 3. [`postprocess`] — deterministic text-cleanup rules
//! 4. [`encode`]      — re-encode decoded bitmaps as PNG or JPEG
//! 5. [`markdown`]    — fixed document layout and image links

pub mod encode;
pub mod extract;
pub mod input;
pub mod markdown;
pub mod postprocess;
