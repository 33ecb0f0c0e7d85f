use super::ImageExporter;
use crate::ai::encoder::decode_data_url;
use crate::{Error, Result};
use async_trait::async_trait;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct PngExporter {
    output_dir: PathBuf,
}

impl PngExporter {
    /// The directory is created on the first export, not here.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_png_sync(bytes: Vec<u8>, path: PathBuf) -> Result<()> {
        // Re-encode so the file is a PNG even if the service sent JPEG bytes
        // under the PNG label.
        let image = image::load_from_memory(&bytes)?;
        image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    async fn write_png(&self, bytes: Vec<u8>, path: &Path) -> Result<()> {
        tokio::task::spawn_blocking({
            let path = path.to_path_buf();
            move || Self::write_png_sync(bytes, path)
        })
        .await
        .map_err(|e| Error::Upstream(format!("Image export task join error: {}", e)))?
    }
}

#[async_trait]
impl ImageExporter for PngExporter {
    async fn export_image(&self, data_url: &str, base_name: &str) -> Result<PathBuf> {
        let (mime_type, bytes) = decode_data_url(data_url)?;
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self
            .output_dir
            .join(format!("{}_{}.png", base_name, Uuid::new_v4()));

        self.write_png(bytes, &path).await?;
        tracing::info!("Exported {} image to {}", mime_type, path.display());

        Ok(path)
    }
}
