// Document store — the on-disk data directory for uploaded documents.
//
// Text extraction happens upstream of this crate; the store only reads the
// pre-extracted plain text it is handed. It never parses PDFs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory if it does not exist yet.
    pub async fn init(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))
    }

    /// Resolve a client-supplied file name inside the data directory.
    /// Rejects anything that could escape it.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            anyhow::bail!("Invalid file name: {name:?}");
        }
        Ok(self.data_dir.join(name))
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(name)?;
        self.init().await?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(file = name, bytes = bytes.len(), "stored document");
        Ok(path)
    }

    /// Stored document names, sorted. A missing data directory is an empty
    /// store, not an error.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    files.push(name.to_string());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Delete a stored document. Returns false when it was not present.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
        }
    }

    /// Read one document's extracted text.
    pub async fn read_text(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("File {name} not found in the data directory"))?;
        String::from_utf8(bytes).map_err(|_| {
            anyhow::anyhow!(
                "File {name} is not plain text — text extraction happens upstream; \
                 upload the extracted text file"
            )
        })
    }

    /// Concatenate the named documents' text in caller order.
    pub async fn combined_text(&self, names: &[String]) -> Result<String> {
        let mut combined = String::new();
        for name in names {
            combined.push_str(&self.read_text(name).await?);
        }
        Ok(combined)
    }
}
