use super::MediaService;
use crate::models::{AspectRatio, GenerationResult, ImageAsset, PromptIdeaForm};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A 1x1 PNG, base64 encoded.
const TINY_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// In-memory [`MediaService`] with canned responses and call counting.
#[derive(Clone)]
pub struct MockMediaClient {
    results: Arc<Mutex<Vec<GenerationResult>>>,
    ideas: Arc<Mutex<Vec<Vec<String>>>>,
    failure: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockMediaClient {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::new())),
            ideas: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_result(self, result: GenerationResult) -> Self {
        self.results.lock().unwrap().push(result);
        self
    }

    pub fn with_ideas(self, ideas: Vec<String>) -> Self {
        self.ideas.lock().unwrap().push(ideas);
        self
    }

    /// Every call fails with `Error::Upstream(message)`.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(message.into());
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn tiny_png_data_url() -> String {
        crate::ai::encoder::to_png_data_url(TINY_PNG_B64)
    }

    fn begin_call(&self) -> Result<usize> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(Error::Upstream(message.clone())),
            None => Ok(*count),
        }
    }

    fn next_result(&self, call: usize) -> GenerationResult {
        let results = self.results.lock().unwrap();
        if results.is_empty() {
            GenerationResult {
                image: Some(Self::tiny_png_data_url()),
                text: None,
            }
        } else {
            results[(call - 1) % results.len()].clone()
        }
    }

    fn next_ideas(&self, call: usize) -> Vec<String> {
        let ideas = self.ideas.lock().unwrap();
        if ideas.is_empty() {
            vec!["Add a dramatic sunset".to_string()]
        } else {
            ideas[(call - 1) % ideas.len()].clone()
        }
    }
}

impl Default for MockMediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaService for MockMediaClient {
    async fn edit_image(&self, _image: &ImageAsset, _prompt: &str) -> Result<GenerationResult> {
        let call = self.begin_call()?;
        Ok(self.next_result(call))
    }

    async fn edit_image_with_mask(
        &self,
        _image: &ImageAsset,
        _mask: &ImageAsset,
        _prompt: &str,
    ) -> Result<GenerationResult> {
        let call = self.begin_call()?;
        Ok(self.next_result(call))
    }

    async fn get_creative_ideas(&self, _image: &ImageAsset) -> Result<Option<Vec<String>>> {
        let call = self.begin_call()?;
        Ok(Some(self.next_ideas(call)))
    }

    async fn generate_images(
        &self,
        prompt: &str,
        count: u32,
        _aspect_ratio: AspectRatio,
    ) -> Result<Vec<String>> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput("Prompt cannot be empty".to_string()));
        }
        self.begin_call()?;
        Ok((0..count).map(|_| Self::tiny_png_data_url()).collect())
    }

    async fn generate_image_with_reference(
        &self,
        references: &[ImageAsset],
        _prompt: &str,
        _aspect_ratio: &str,
    ) -> Result<Vec<String>> {
        if references.is_empty() {
            return Err(Error::InvalidInput(
                "At least one reference image is required".to_string(),
            ));
        }
        let call = self.begin_call()?;
        self.next_result(call)
            .image
            .map(|image| vec![image])
            .ok_or_else(|| Error::EmptyResult("No image was generated.".to_string()))
    }

    async fn generate_prompt_ideas(
        &self,
        _form: &PromptIdeaForm,
        _references: &[ImageAsset],
    ) -> Result<Vec<String>> {
        let call = self.begin_call()?;
        Ok(self.next_ideas(call))
    }
}
