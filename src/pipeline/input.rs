//! Input resolution: validate a user-supplied path before pdfium sees it.
//!
//! We check existence, read permission and the PDF magic bytes (`%PDF`) up
//! front so callers get a meaningful error rather than a pdfium failure code.
//! None of this needs the pdfium library to be bound.

use crate::error::Pdf2MdError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local PDF path and return it unchanged.
pub fn resolve_local(path: impl AsRef<Path>) -> Result<PathBuf, Pdf2MdError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(Pdf2MdError::FileNotFound { path });
    }

    match File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2MdError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Pdf2MdError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2MdError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Base name of `path` for display in the Markdown heading.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = resolve_local("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, Pdf2MdError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_local(dir.path()),
            Err(Pdf2MdError::FileNotFound { .. })
        ));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"GIF89a....").unwrap();
        match resolve_local(f.path()) {
            Err(Pdf2MdError::NotAPdf { magic, .. }) => assert_eq!(&magic, b"GIF8"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn pdf_header_is_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n").unwrap();
        assert_eq!(resolve_local(f.path()).unwrap(), f.path());
    }

    #[test]
    fn display_name_is_base_name() {
        assert_eq!(display_name(Path::new("/tmp/docs/report.pdf")), "report.pdf");
        assert_eq!(display_name(Path::new("report.pdf")), "report.pdf");
    }
}
