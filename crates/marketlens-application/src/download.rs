//! Temporary object URLs and the sinks that receive downloads.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use marketlens_core::{LensError, Result};
use uuid::Uuid;

/// Handle to an in-memory blob, valid until revoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
struct Blob {
    mime_type: String,
    bytes: Arc<Vec<u8>>,
}

/// Live object URLs. Every download creates one and revokes it afterwards.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    live: HashMap<ObjectUrl, Blob>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, mime_type: impl Into<String>, bytes: Vec<u8>) -> ObjectUrl {
        let url = ObjectUrl(format!("blob:marketlens/{}", Uuid::new_v4()));
        self.live.insert(
            url.clone(),
            Blob {
                mime_type: mime_type.into(),
                bytes: Arc::new(bytes),
            },
        );
        url
    }

    pub fn resolve(&self, url: &ObjectUrl) -> Option<Arc<Vec<u8>>> {
        self.live.get(url).map(|blob| Arc::clone(&blob.bytes))
    }

    pub fn mime_type(&self, url: &ObjectUrl) -> Option<&str> {
        self.live.get(url).map(|blob| blob.mime_type.as_str())
    }

    /// Returns false when the URL was not live.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        self.live.remove(url).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// One file handed to a [`DownloadSink`].
pub struct Download<'a> {
    pub url: &'a ObjectUrl,
    pub filename: &'a str,
    pub mime_type: &'a str,
    pub bytes: &'a [u8],
}

/// Receives downloaded files (the "save as" side of a download).
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Stores the file and returns where it ended up.
    async fn deliver(&self, download: Download<'_>) -> Result<PathBuf>;
}

/// Writes downloads into a directory.
pub struct FileSystemSink {
    dir: PathBuf,
}

impl FileSystemSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for FileSystemSink {
    async fn deliver(&self, download: Download<'_>) -> Result<PathBuf> {
        if !is_plain_file_name(download.filename) {
            return Err(LensError::io(format!(
                "Refusing to write '{}' outside {}",
                download.filename,
                self.dir.display()
            )));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(download.filename);
        tokio::fs::write(&path, download.bytes).await?;
        tracing::info!(
            target: "marketlens::download",
            "[Download] Saved {} ({} bytes, {}) to {}",
            download.filename,
            download.bytes.len(),
            download.mime_type,
            path.display()
        );
        Ok(path)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Opens a URL for viewing (a browser tab, in the web front-end).
pub trait Viewer: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_create_and_revoke() {
        let mut registry = ObjectUrlRegistry::new();
        let url = registry.create("text/markdown", b"# Hi".to_vec());
        assert!(url.as_str().starts_with("blob:marketlens/"));
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.mime_type(&url), Some("text/markdown"));
        assert_eq!(registry.resolve(&url).unwrap().as_slice(), b"# Hi");

        assert!(registry.revoke(&url));
        assert!(!registry.revoke(&url));
        assert_eq!(registry.live_count(), 0);
        assert!(registry.resolve(&url).is_none());
    }

    #[tokio::test]
    async fn test_filesystem_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSystemSink::new(dir.path().join("downloads"));
        let mut registry = ObjectUrlRegistry::new();
        let url = registry.create("application/json", b"{}".to_vec());

        let path = sink
            .deliver(Download {
                url: &url,
                filename: "analise.json",
                mime_type: "application/json",
                bytes: b"{}",
            })
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("downloads").join("analise.json"));
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_filesystem_sink_rejects_nested_names() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSystemSink::new(dir.path().join("downloads"));
        let mut registry = ObjectUrlRegistry::new();
        let url = registry.create("application/json", b"{}".to_vec());

        for filename in ["../escape.json", "nested/analise.json", "/tmp/analise.json"] {
            let err = sink
                .deliver(Download {
                    url: &url,
                    filename,
                    mime_type: "application/json",
                    bytes: b"{}",
                })
                .await
                .unwrap_err();
            assert!(matches!(err, LensError::Io { .. }), "{filename}");
        }
        assert!(!dir.path().join("escape.json").exists());
    }
}
