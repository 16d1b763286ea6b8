use crate::utils::error::AppError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Matches the original 16 MiB request cap.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 8] = ["pdf", "png", "jpg", "jpeg", "doc", "docx", "xls", "xlsx"];

pub fn upload_dir() -> PathBuf {
    std::env::var("UPLOAD_DIR")
        .unwrap_or_else(|_| "uploads".to_string())
        .into()
}

#[derive(Debug)]
pub struct StoredUpload {
    /// Sanitized original filename, echoed back to the client
    pub name: String,
    /// Retrievable path URL, `/uploads/<uuid>-<name>`
    pub url: String,
}

/// Writes the attachment under `dir` with a fresh UUID prefix. Collisions
/// are avoided only by the uniqueness of the prefix; two uploads of the
/// same filename produce two distinct files and URLs.
pub async fn store(dir: &Path, original_name: &str, data: &[u8]) -> Result<StoredUpload, AppError> {
    let filename = sanitize_filename(original_name);
    if filename.is_empty() {
        return Err(AppError::InvalidRequest("No selected file".to_string()));
    }
    if !is_allowed(&filename) {
        return Err(AppError::InvalidRequest("File type not allowed".to_string()));
    }

    let stored_name = format!("{}-{}", Uuid::new_v4(), filename);

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;

    let path = dir.join(&stored_name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write {}: {}", path.display(), e)))?;

    log::info!("📎 Stored upload: {} ({} bytes)", stored_name, data.len());

    Ok(StoredUpload {
        name: filename,
        url: format!("/uploads/{}", stored_name),
    })
}

/// Strips path components and replaces anything outside `[A-Za-z0-9._-]`,
/// so the stored name is safe to join onto the upload directory.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_matches('.').to_string()
}

pub fn is_allowed(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\invoice.pdf"), "invoice.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my report (final).pdf"), "my_report__final_.pdf");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_extension_allowlist() {
        assert!(is_allowed("scan.PDF"));
        assert!(is_allowed("photo.jpeg"));
        assert!(!is_allowed("malware.exe"));
        assert!(!is_allowed("no_extension"));
    }

    #[tokio::test]
    async fn test_same_filename_uploads_get_distinct_urls() {
        let dir = std::env::temp_dir().join(format!("supplier-uploads-{}", Uuid::new_v4()));

        let first = store(&dir, "invoice.pdf", b"first").await.unwrap();
        let second = store(&dir, "invoice.pdf", b"second").await.unwrap();

        assert_ne!(first.url, second.url);
        assert!(first.url.starts_with("/uploads/"));
        assert!(first.url.ends_with("-invoice.pdf"));
        assert_eq!(first.name, "invoice.pdf");

        let stored = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(stored, 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_disallowed_extension_rejected() {
        let dir = std::env::temp_dir().join(format!("supplier-uploads-{}", Uuid::new_v4()));
        let err = store(&dir, "script.sh", b"#!/bin/sh").await.unwrap_err();
        assert_eq!(err.to_string(), "File type not allowed");
    }
}
