//! Artifact Downloader Port
//!
//! Abstract interface for delivering a generated artifact to the user.

use async_trait::async_trait;

use crate::domain::entities::{DownloadedFile, GeneratedArtifact};
use crate::domain::errors::FormError;

/// Save-file mechanism
#[async_trait]
pub trait ArtifactDownloader: Send + Sync {
    /// Deliver the artifact. Takes ownership so no copy outlives the download.
    async fn download(&self, artifact: GeneratedArtifact) -> Result<DownloadedFile, FormError>;
}
