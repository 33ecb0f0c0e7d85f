//! Generative media client
//!
//! Six stateless operations over the Gemini and Imagen REST APIs. Each one
//! encodes its inputs, assembles an ordered request, makes a single call and
//! normalizes the response.

pub mod encoder;
pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiMediaClient;
pub use mock::MockMediaClient;

use crate::models::{AspectRatio, GenerationResult, ImageAsset, PromptIdeaForm};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MediaService: Send + Sync {
    /// Edit `image` following a free-text instruction.
    async fn edit_image(&self, image: &ImageAsset, prompt: &str) -> Result<GenerationResult>;

    /// Edit only the regions of `image` selected by `mask`.
    async fn edit_image_with_mask(
        &self,
        image: &ImageAsset,
        mask: &ImageAsset,
        prompt: &str,
    ) -> Result<GenerationResult>;

    /// Short edit suggestions for `image`. `None` when the model gave none.
    async fn get_creative_ideas(&self, image: &ImageAsset) -> Result<Option<Vec<String>>>;

    /// Text-to-image generation. Returns PNG data-URLs.
    async fn generate_images(
        &self,
        prompt: &str,
        count: u32,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<String>>;

    /// One image guided by reference images, framed to `aspect_ratio` (`"W:H"`).
    async fn generate_image_with_reference(
        &self,
        references: &[ImageAsset],
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<Vec<String>>;

    /// Candidate text-to-image prompts from a form and/or reference images.
    async fn generate_prompt_ideas(
        &self,
        form: &PromptIdeaForm,
        references: &[ImageAsset],
    ) -> Result<Vec<String>>;
}
