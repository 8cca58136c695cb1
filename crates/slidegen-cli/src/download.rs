//! File-system download sink
//!
//! Writes generated artifacts into a directory, never overwriting an
//! existing file: a clash becomes `Presentation_<ts> (1).pptx` and so on.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use slidegen::{ArtifactDownloader, DownloadedFile, FormError, GeneratedArtifact};

pub struct FileDownloader {
    output_dir: PathBuf,
}

impl FileDownloader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn free_path(&self, file_name: &str) -> Result<PathBuf, FormError> {
        let candidate = self.output_dir.join(file_name);
        if !exists(&candidate).await? {
            return Ok(candidate);
        }

        let path = Path::new(file_name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
        let ext = path.extension().and_then(|s| s.to_str());

        let mut n = 1;
        loop {
            let name = match ext {
                Some(ext) => format!("{} ({}).{}", stem, n, ext),
                None => format!("{} ({})", stem, n),
            };
            let candidate = self.output_dir.join(name);
            if !exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

async fn exists(path: &Path) -> Result<bool, FormError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| FormError::Download(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl ArtifactDownloader for FileDownloader {
    async fn download(&self, artifact: GeneratedArtifact) -> Result<DownloadedFile, FormError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| FormError::Download(format!("{}: {}", self.output_dir.display(), e)))?;

        let location = self.free_path(&artifact.file_name).await?;
        tokio::fs::write(&location, &artifact.bytes)
            .await
            .map_err(|e| FormError::Download(format!("{}: {}", location.display(), e)))?;

        let file_name = location
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&artifact.file_name)
            .to_string();

        info!("Wrote {} bytes to {}", artifact.len(), location.display());

        Ok(DownloadedFile {
            file_name,
            location,
            size: artifact.len(),
        })
    }
}
