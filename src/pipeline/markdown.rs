//! Markdown assembly.
//!
//! ## Layout
//!
//! ```text
//! ---                                  (optional front matter)
//! title: "..."
//! ---
//!
//! # Converted from `report.pdf`
//!
//! _Pages: 3_
//!
//! ## Page 1
//!
//! <cleaned text or *(no extractable text on this page)*>
//!
//! ### Images on page 1                 (only when images were saved)
//!
//! ![page1_img1.png](report_images/page1_img1.png)
//! ```
//!
//! Every block ends with a blank line. Image links are relative to the
//! Markdown file and always use forward slashes.

use crate::output::{DocumentMetadata, SavedImage};
use std::fmt::Write as _;
use std::path::Path;

/// Placeholder written for pages whose text is empty after cleanup.
pub const NO_TEXT_PLACEHOLDER: &str = "*(no extractable text on this page)*";

/// Top-level heading and page-count line.
pub fn document_header(file_name: &str, total_pages: usize) -> String {
    format!("# Converted from `{file_name}`\n\n_Pages: {total_pages}_\n\n")
}

/// One `## Page N` section with its text and image links.
///
/// `link_dir` is the directory prefix used in image links, normally the
/// base name of the images directory (see [`link_dir_name`]).
pub fn page_section(page_num: usize, text: Option<&str>, images: &[SavedImage], link_dir: &str) -> String {
    let mut out = format!("## Page {page_num}\n\n");
    out.push_str(text.unwrap_or(NO_TEXT_PLACEHOLDER));
    out.push_str("\n\n");

    if !images.is_empty() {
        let _ = write!(out, "### Images on page {page_num}\n\n");
        for img in images {
            let _ = write!(out, "![{0}]({1}/{0})\n\n", img.file_name, link_dir);
        }
    }
    out
}

/// Directory component used in image links: the base name of `images_dir`
/// with forward slashes.
pub fn link_dir_name(images_dir: &Path) -> String {
    let name = images_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| images_dir.to_string_lossy().into_owned());
    name.replace('\\', "/").trim_end_matches('/').to_string()
}

/// Format document metadata as YAML front matter.
pub fn front_matter(meta: &DocumentMetadata) -> String {
    let mut yaml = String::from("---\n");

    let fields = [
        ("title", &meta.title),
        ("author", &meta.author),
        ("subject", &meta.subject),
        ("creator", &meta.creator),
        ("producer", &meta.producer),
        ("creation_date", &meta.creation_date),
        ("modification_date", &meta.modification_date),
    ];
    for (key, value) in fields {
        if let Some(v) = value {
            let _ = writeln!(yaml, "{key}: {}", yaml_quote(v));
        }
    }
    let _ = writeln!(yaml, "pages: {}", meta.page_count);
    if !meta.pdf_version.is_empty() {
        let _ = writeln!(yaml, "pdf_version: {}", yaml_quote(&meta.pdf_version));
    }

    yaml.push_str("---\n\n");
    yaml
}

fn yaml_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
