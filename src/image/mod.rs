//! Export of generated images
//!
//! Writes PNG data-URLs returned by the media client to disk when the user
//! asks for it. The client itself never persists anything.

pub mod exporter;
pub mod mock;

pub use exporter::PngExporter;
pub use mock::MockImageExporter;

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait ImageExporter: Send + Sync {
    /// Decode `data_url` and store it, returning where it went.
    async fn export_image(&self, data_url: &str, base_name: &str) -> Result<PathBuf>;
}
