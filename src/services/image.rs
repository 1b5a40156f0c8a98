use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;

/// Stores uploaded listing images on disk and hands back the reference URL
/// they are served under.
pub struct ImageService {
    images_path: PathBuf,
    max_bytes: u64,
}

impl ImageService {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            images_path: PathBuf::from(&config.general.images_path),
            max_bytes: config.general.max_upload_mb * 1024 * 1024,
        }
    }

    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Whether the filename looks like an image we accept.
    #[must_use]
    pub fn is_supported(filename: &str) -> bool {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        mime_guess::from_ext(&extension).first_or_octet_stream().type_()
            == mime_guess::mime::IMAGE
    }

    /// Validates and persists one uploaded image, returning its public URL
    /// path. The stored filename is a fresh UUID so uploads can never clash
    /// or traverse out of the images directory.
    pub async fn save_upload(&self, original_filename: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            anyhow::bail!("Uploaded file is empty");
        }

        if bytes.len() as u64 > self.max_bytes {
            anyhow::bail!(
                "Uploaded file exceeds the {} MB limit",
                self.max_bytes / 1024 / 1024
            );
        }

        if !Self::is_supported(original_filename) {
            anyhow::bail!("Unsupported file type: {original_filename:?}");
        }

        let extension = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !self.images_path.exists() {
            fs::create_dir_all(&self.images_path).await?;
        }

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = self.images_path.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write image to {}", file_path.display()))?;

        info!(path = %file_path.display(), size = bytes.len(), "Stored uploaded image");

        Ok(format!("/images/{filename}"))
    }
}
