//! Multipart form reading and per-request staging of uploaded files.
//!
//! Every staged file gets a unique name inside its upload directory and is
//! deleted when the `StagedFile` is dropped.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::Multipart;
use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::errors::AppError;

/// One file part of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    /// As sent by the client. Empty when the browser submitted no file.
    pub file_name: String,
    pub data: Bytes,
}

impl UploadedFile {
    /// Lowercased extension of the client filename, or `""`.
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_default()
    }
}

/// A fully-read multipart form: text fields by name plus every file part in order.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Invalid upload: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            match file_name {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::InvalidInput(format!("Invalid upload: {e}")))?;
                    form.files.push(UploadedFile {
                        field: name,
                        file_name,
                        data,
                    });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::InvalidInput(format!("Invalid upload: {e}")))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn files_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UploadedFile> {
        self.files.iter().filter(move |f| f.field == name)
    }
}

/// An upload written to disk under a unique name. Removed on drop.
#[derive(Debug)]
pub struct StagedFile {
    pub file_name: String,
    pub extension: String,
    file: NamedTempFile,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn path_buf(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}

/// Writes `upload` into `dir` as `resume-<random>.<extension>`.
pub async fn stage(dir: &Path, upload: &UploadedFile, extension: &str) -> Result<StagedFile, AppError> {
    let dir = dir.to_path_buf();
    let data = upload.data.clone();
    let file_name = upload.file_name.clone();
    let extension = extension.to_string();

    let staged = tokio::task::spawn_blocking(move || -> anyhow::Result<StagedFile> {
        let suffix = if extension.is_empty() {
            String::new()
        } else {
            format!(".{extension}")
        };
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(&suffix)
            .tempfile_in(&dir)
            .with_context(|| format!("Failed to create upload file in {}", dir.display()))?;
        file.write_all(&data)
            .with_context(|| format!("Failed to write upload '{file_name}'"))?;
        file.flush()?;

        Ok(StagedFile {
            file_name,
            extension,
            file,
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed while staging upload: {e}")))??;

    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str, data: &'static [u8]) -> UploadedFile {
        UploadedFile {
            field: "resumes".to_string(),
            file_name: file_name.to_string(),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(upload("CV.PDF", b"").extension(), "pdf");
        assert_eq!(upload("resume.final.docx", b"").extension(), "docx");
        assert_eq!(upload("README", b"").extension(), "");
        assert_eq!(upload("", b"").extension(), "");
    }

    #[tokio::test]
    async fn test_stage_writes_unique_files_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let a = stage(dir.path(), &upload("cv.txt", b"first"), "txt").await.unwrap();
        let b = stage(dir.path(), &upload("cv.txt", b"second"), "txt").await.unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(dir.path()));
        assert_eq!(a.path().extension().unwrap(), "txt");
        assert_eq!(std::fs::read(a.path()).unwrap(), b"first");
        assert_eq!(std::fs::read(b.path()).unwrap(), b"second");
        assert_eq!(a.file_name, "cv.txt");

        let path = a.path_buf();
        drop(a);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_stage_into_missing_dir_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = stage(&missing, &upload("cv.txt", b"x"), "txt").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
