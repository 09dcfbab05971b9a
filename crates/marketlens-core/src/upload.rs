//! Attachments uploaded alongside an analysis request.

use serde::{Deserialize, Serialize};

use crate::format::format_file_size;

/// A file accepted by `/api/upload_attachment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Original filename
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// MIME type of the file
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let mime_type = infer_mime_type(&name);
        Self {
            name,
            size,
            mime_type,
        }
    }

    pub fn size_label(&self) -> String {
        format_file_size(self.size)
    }
}

/// Content type sent with an attachment part, guessed from its extension.
/// Unknown extensions go out as `application/octet-stream`.
pub fn infer_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

/// Body returned by the upload endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_inference() {
        assert_eq!(UploadedFile::new("notes.pdf", 10).mime_type, "application/pdf");
        assert_eq!(
            UploadedFile::new("blob", 10).mime_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_size_label() {
        assert_eq!(UploadedFile::new("a.txt", 2048).size_label(), "2 KB");
    }
}
