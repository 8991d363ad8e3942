use crate::errors::{AppError, AppResult};
use axum::{body::Bytes, extract::Multipart};
use chrono::Utc;
use std::{collections::HashMap, path::Path};
use tracing::{debug, warn};
use uuid::Uuid;

/// A file part pulled out of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub original_name: Option<String>,
    pub bytes: Bytes,
}

/// Text fields and file parts of a multipart body
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(original_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    // browsers send an empty part when no file was picked
                    if bytes.is_empty() {
                        continue;
                    }
                    form.files.push(UploadedFile {
                        field: name,
                        original_name: Some(original_name),
                        bytes,
                    });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text value; blank values count as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }
}

/// Extension of the uploaded name including the dot, restricted to
/// alphanumerics so it can't smuggle path separators.
pub fn extension_of(original_name: Option<&str>) -> Option<String> {
    let name = original_name?;
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// `<prefix>-<unix millis>-<8 hex chars><ext>`; the random part keeps names
/// written in the same millisecond apart
pub fn generated_name(prefix: &str, original_name: Option<&str>, default_ext: &str) -> String {
    let ext = extension_of(original_name).unwrap_or_else(|| default_ext.to_string());
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}{}", prefix, Utc::now().timestamp_millis(), &suffix[..8], ext)
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Write `bytes` as `dir/file_name`, creating the directory on first use
pub async fn store(dir: &Path, file_name: &str, bytes: &[u8]) -> AppResult<()> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    debug!(path = %path.display(), size = bytes.len(), "stored upload");
    Ok(())
}

/// Best-effort removal of a stored upload; a missing file is not an error
pub async fn remove(dir: &Path, file_name: &str) {
    let path = dir.join(file_name);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => debug!(path = %path.display(), "removed upload"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove upload"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_sanitized() {
        assert_eq!(extension_of(Some("Foto.JPG")), Some(".jpg".to_string()));
        assert_eq!(extension_of(Some("scan.final.pdf")), Some(".pdf".to_string()));
        assert_eq!(extension_of(Some("noext")), None);
        assert_eq!(extension_of(Some("evil.p/h")), None);
        assert_eq!(extension_of(None), None);
    }

    #[test]
    fn generated_name_falls_back_to_default_extension() {
        let name = generated_name("leave", Some("firmado"), ".pdf");
        assert!(name.starts_with("leave-"));
        assert!(name.ends_with(".pdf"));

        let name = generated_name("photo", Some("me.png"), ".bin");
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn generated_names_do_not_repeat() {
        let first = generated_name("dpi", Some("scan.pdf"), ".pdf");
        let second = generated_name("dpi", Some("scan.pdf"), ".pdf");
        assert_ne!(first, second);

        let parts: Vec<&str> = first.trim_end_matches(".pdf").split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn digits_only_strips_separators() {
        assert_eq!(digits_only("2456 78901 0101"), "2456789010101");
        assert_eq!(digits_only("sin-dpi"), "");
    }

    #[test]
    fn blank_text_fields_are_absent() {
        let mut form = MultipartForm::default();
        form.fields.insert("phone".to_string(), "   ".to_string());
        form.fields.insert("dpi".to_string(), " 123 ".to_string());
        assert_eq!(form.text("phone"), None);
        assert_eq!(form.text("dpi"), Some("123"));
        assert_eq!(form.text("missing"), None);
    }

    #[tokio::test]
    async fn store_creates_directory() {
        let dir = std::env::temp_dir().join(format!("muni-hr-store-{}", Uuid::new_v4()));
        store(&dir, "a.txt", b"hello").await.unwrap();
        let written = tokio::fs::read(dir.join("a.txt")).await.unwrap();
        assert_eq!(written, b"hello");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn remove_deletes_file_and_ignores_missing() {
        let dir = std::env::temp_dir().join(format!("muni-hr-remove-{}", Uuid::new_v4()));
        store(&dir, "b.pdf", b"%PDF").await.unwrap();
        remove(&dir, "b.pdf").await;
        assert!(!dir.join("b.pdf").exists());
        remove(&dir, "b.pdf").await;
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
