//! Upload intake: validate the submitted file and persist it to scratch.
//!
//! ## Why persist to disk at all?
//!
//! The object-store client streams the file from a filesystem path, and
//! keeping the upload on disk until the store accepts it means a failed
//! remote call never costs the user a re-upload within the same request.
//! The scratch directory is created on startup and files are written under
//! a sanitised name so a hostile filename (`../../etc/passwd`) can never
//! escape it.
//!
//! Validation is deliberately shallow: the contract is "name ends in
//! `.pdf`", checked before any remote call is made. Content sniffing is the
//! converter's job — it sees the real bytes and fails on garbage.

use crate::error::QuizGenError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An upload that passed validation and now lives in the scratch directory.
#[derive(Debug, Clone)]
pub struct UploadedPdf {
    /// The name the browser sent, before sanitisation. Display only.
    pub original_name: String,
    /// Sanitised filename, used as the object-store key.
    pub stored_name: String,
    /// Full path inside the scratch directory.
    pub path: PathBuf,
}

/// Anything outside `[A-Za-z0-9._-]` collapses to a single underscore.
static RE_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Whether the submitted filename names a PDF.
pub fn is_pdf_filename(name: &str) -> bool {
    name.ends_with(".pdf")
}

/// Reduce a browser-supplied filename to something safe to join onto the
/// scratch directory.
///
/// Path components are stripped first (both separator styles — browsers on
/// Windows send backslashes), then unsafe runs collapse to `_` and leading
/// dots are dropped so the result can never be a dotfile or traverse
/// upwards. Returns `None` when nothing survives.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);
    let cleaned = RE_UNSAFE.replace_all(base, "_");
    let cleaned = cleaned.trim_matches(['.', '_']);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Validate the upload and write it into `scratch_dir`.
///
/// Rejects a missing/empty filename and anything not ending in `.pdf`
/// before touching the filesystem — and long before any remote call.
pub async fn persist_upload(
    scratch_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<UploadedPdf, QuizGenError> {
    if original_name.is_empty() {
        return Err(QuizGenError::MissingUpload);
    }
    if !is_pdf_filename(original_name) {
        return Err(QuizGenError::NotAPdf {
            name: original_name.to_string(),
        });
    }
    let stored_name = sanitize_filename(original_name).ok_or_else(|| {
        QuizGenError::InvalidFilename {
            name: original_name.to_string(),
        }
    })?;

    let path = scratch_dir.join(&stored_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| QuizGenError::ScratchWriteFailed {
            path: path.clone(),
            source,
        })?;

    debug!("Saved upload '{}' to {}", original_name, path.display());
    Ok(UploadedPdf {
        original_name: original_name.to_string(),
        stored_name,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_check() {
        assert!(is_pdf_filename("lecture.pdf"));
        assert!(!is_pdf_filename("notes.txt"));
        assert!(!is_pdf_filename("archive.pdf.zip"));
        assert!(!is_pdf_filename(""));
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(
            sanitize_filename("../../etc/passwd.pdf").as_deref(),
            Some("passwd.pdf")
        );
        assert_eq!(
            sanitize_filename(r"C:\Users\me\slides.pdf").as_deref(),
            Some("slides.pdf")
        );
    }

    #[test]
    fn sanitize_collapses_unsafe_runs() {
        assert_eq!(
            sanitize_filename("my lecture notes (v2).pdf").as_deref(),
            Some("my_lecture_notes_v2_.pdf")
        );
    }

    #[test]
    fn sanitize_rejects_hostile_names() {
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename("???"), None);
        assert_eq!(sanitize_filename(""), None);
        // Degenerate but harmless: a bare ".pdf" stores as "pdf".
        assert_eq!(sanitize_filename(".pdf").as_deref(), Some("pdf"));
    }

    #[tokio::test]
    async fn non_pdf_upload_is_rejected_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = persist_upload(dir.path(), "notes.txt", b"hello")
            .await
            .unwrap_err();
        assert!(matches!(err, QuizGenError::NotAPdf { .. }));
        // Nothing was written.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_filename_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = persist_upload(dir.path(), "", b"hello").await.unwrap_err();
        assert!(matches!(err, QuizGenError::MissingUpload));
    }

    #[tokio::test]
    async fn valid_upload_lands_in_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let upload = persist_upload(dir.path(), "intro to rust.pdf", b"%PDF-1.7")
            .await
            .unwrap();
        assert_eq!(upload.stored_name, "intro_to_rust.pdf");
        assert_eq!(std::fs::read(&upload.path).unwrap(), b"%PDF-1.7");
    }
}
