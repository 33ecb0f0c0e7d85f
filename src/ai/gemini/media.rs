use super::client::GeminiHttpClient;
use super::response::{first_text, normalize, response_parts};
use super::types::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, PredictInstance,
    PredictParameters, PredictRequest, PredictResponse,
};
use crate::ai::encoder::{encode_image, to_png_data_url};
use crate::ai::MediaService;
use crate::canvas::seed_canvas;
use crate::models::{
    AspectRatio, Config, EncodedImage, GenerationResult, IdeaList, ImageAsset, PromptIdeaForm,
    PromptRequest, PNG_MIME,
};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde_json::json;

const EDIT_IMAGE_FAILED: &str = "Failed to edit image.";
const EDIT_WITH_MASK_FAILED: &str = "Failed to edit image with mask.";
const CREATIVE_IDEAS_FAILED: &str = "Failed to get creative ideas.";
const GENERATE_IMAGES_FAILED: &str = "Failed to generate images.";
const REFERENCE_FAILED: &str = "Failed to generate image with reference.";
const PROMPT_IDEAS_FAILED: &str = "Failed to generate prompt ideas.";

/// Ratios the image model accepts in `imageConfig.aspectRatio`.
const IMAGE_CONFIG_RATIOS: [&str; 8] = ["1:1", "16:9", "9:16", "4:3", "3:4", "21:9", "3:2", "2:3"];

/// Which instruction steers prompt-idea generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptIdeasTemplate {
    /// At least one form field is filled in.
    Form,
    /// Every field is empty; ideas come from the reference images alone.
    ImagesOnly,
}

impl PromptIdeasTemplate {
    pub fn select(form: &PromptIdeaForm, image_count: usize) -> Result<Self> {
        if !form.is_empty() {
            Ok(Self::Form)
        } else if image_count > 0 {
            Ok(Self::ImagesOnly)
        } else {
            Err(Error::InvalidInput(
                "Fill in at least one field or add a reference image".to_string(),
            ))
        }
    }
}

fn ideas_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ideas": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["ideas"]
    })
}

fn parse_ideas(text: &str) -> Result<Option<Vec<String>>> {
    let list: IdeaList = serde_json::from_str(text.trim())?;
    Ok(list.ideas)
}

fn encode_all(images: &[ImageAsset]) -> Vec<EncodedImage> {
    images.iter().map(|image| encode_image(image, None)).collect()
}

fn or_unspecified(field: &str) -> &str {
    let field = field.trim();
    if field.is_empty() {
        "(not specified)"
    } else {
        field
    }
}

/// Image + text output, with `imageConfig.aspectRatio` only when the model
/// accepts the ratio. Other ratios are framed by the seed canvas alone.
fn reference_generation_config(aspect_ratio: &str) -> GenerationConfig {
    let config = GenerationConfig::image_and_text();
    if IMAGE_CONFIG_RATIOS.contains(&aspect_ratio) {
        config.with_aspect_ratio(aspect_ratio)
    } else {
        tracing::debug!(
            "Aspect ratio {} has no imageConfig equivalent; relying on the seed canvas",
            aspect_ratio
        );
        config
    }
}

/// `[image, instruction]`
pub fn edit_request(image: &ImageAsset, prompt: &str) -> PromptRequest {
    PromptRequest::new()
        .image(encode_image(image, None))
        .text(prompt)
}

/// `[image, mask, instruction]`, with the mask always labelled PNG.
pub fn mask_edit_request(image: &ImageAsset, mask: &ImageAsset, prompt: &str) -> PromptRequest {
    PromptRequest::new()
        .image(encode_image(image, None))
        .image(encode_image(mask, Some(PNG_MIME)))
        .text(prompts::render(prompts::MASK_EDIT, &[("prompt", prompt)]))
}

/// `[seed canvas, references.., instruction]`. The canvas comes first so the
/// model anchors its output frame to it.
pub fn reference_request(
    references: &[ImageAsset],
    prompt: &str,
    aspect_ratio: &str,
) -> Result<PromptRequest> {
    if references.is_empty() {
        return Err(Error::InvalidInput(
            "At least one reference image is required".to_string(),
        ));
    }
    if prompt.trim().is_empty() {
        return Err(Error::InvalidInput("Prompt cannot be empty".to_string()));
    }

    let canvas = EncodedImage {
        data: seed_canvas(aspect_ratio)?,
        mime_type: PNG_MIME.to_string(),
    };

    Ok(PromptRequest::new()
        .image(canvas)
        .images(encode_all(references))
        .text(prompts::render(
            prompts::REFERENCE_GENERATION,
            &[("prompt", prompt.trim()), ("aspect_ratio", aspect_ratio)],
        )))
}

/// Instruction text first, then any reference images.
pub fn prompt_ideas_request(
    form: &PromptIdeaForm,
    references: &[ImageAsset],
) -> Result<(PromptIdeasTemplate, PromptRequest)> {
    let template = PromptIdeasTemplate::select(form, references.len())?;

    let instruction = match template {
        PromptIdeasTemplate::Form => {
            let reference_note = if references.is_empty() {
                String::new()
            } else {
                format!(
                    "\nAlso draw on the {} attached reference image(s) for subjects and style.\n",
                    references.len()
                )
            };
            prompts::render(
                prompts::PROMPT_IDEAS_FORM,
                &[
                    ("subject", or_unspecified(&form.subject)),
                    ("style", or_unspecified(&form.style)),
                    ("mood", or_unspecified(&form.mood)),
                    ("details", or_unspecified(&form.details)),
                    ("reference_note", &reference_note),
                ],
            )
        }
        PromptIdeasTemplate::ImagesOnly => prompts::render(
            prompts::PROMPT_IDEAS_IMAGES,
            &[("image_count", &references.len().to_string())],
        ),
    };

    Ok((
        template,
        PromptRequest::new()
            .text(instruction)
            .images(encode_all(references)),
    ))
}

pub struct GeminiMediaClient {
    http: GeminiHttpClient,
    image_model: String,
    text_model: String,
    imagen_model: String,
}

impl GeminiMediaClient {
    pub fn new(config: &Config) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    pub fn new_with_client(config: &Config, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(config, client),
            image_model: config.image_model.clone(),
            text_model: config.text_model.clone(),
            imagen_model: config.imagen_model.clone(),
        }
    }

    async fn generate_media(
        &self,
        prompt: PromptRequest,
        generation_config: GenerationConfig,
    ) -> Result<GenerationResult> {
        let request = GenerateContentRequest::new(prompt, generation_config);
        let response: GenerateContentResponse = self
            .http
            .generate_content(&self.image_model, &request)
            .await?;
        Ok(normalize(response_parts(response)))
    }

    async fn request_ideas(&self, prompt: PromptRequest) -> Result<Option<Vec<String>>> {
        let request = GenerateContentRequest::new(prompt, GenerationConfig::json(ideas_schema()));
        let response: GenerateContentResponse = self
            .http
            .generate_content(&self.text_model, &request)
            .await?;

        match first_text(response) {
            Some(text) => parse_ideas(&text),
            None => {
                tracing::warn!("Gemini returned no text for an ideas request");
                Ok(None)
            }
        }
    }

    async fn generate_images_impl(
        &self,
        prompt: &str,
        count: u32,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<String>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::InvalidInput("Prompt cannot be empty".to_string()));
        }
        if count == 0 {
            return Err(Error::InvalidInput(
                "Image count must be at least 1".to_string(),
            ));
        }

        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: count,
                aspect_ratio: aspect_ratio.as_str().to_string(),
                output_mime_type: PNG_MIME.to_string(),
            },
        };

        let response: PredictResponse = self.http.predict(&self.imagen_model, &request).await?;

        let images: Vec<String> = response
            .predictions
            .into_iter()
            .filter_map(|p| match p.bytes_base64_encoded {
                Some(data) => Some(to_png_data_url(&data)),
                None => {
                    tracing::warn!(
                        "Imagen filtered a sample: {}",
                        p.rai_filtered_reason.as_deref().unwrap_or("no reason given")
                    );
                    None
                }
            })
            .collect();

        if images.is_empty() {
            return Err(Error::EmptyResult(
                "No images were generated. Try a different prompt.".to_string(),
            ));
        }

        tracing::info!("Imagen returned {}/{} images", images.len(), count);
        Ok(images)
    }

    async fn prompt_ideas_impl(
        &self,
        form: &PromptIdeaForm,
        references: &[ImageAsset],
    ) -> Result<Vec<String>> {
        let (template, request) = prompt_ideas_request(form, references)?;
        tracing::debug!("Requesting prompt ideas with {:?} template", template);
        Ok(self.request_ideas(request).await?.unwrap_or_default())
    }

    async fn generate_with_reference_impl(
        &self,
        references: &[ImageAsset],
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<Vec<String>> {
        let request = reference_request(references, prompt, aspect_ratio)?;
        let result = self
            .generate_media(request, reference_generation_config(aspect_ratio))
            .await?;

        match result.image {
            Some(image) => Ok(vec![image]),
            None => Err(Error::EmptyResult(match result.text {
                Some(text) => format!("No image was generated: {}", text),
                None => "No image was generated.".to_string(),
            })),
        }
    }
}

#[async_trait]
impl MediaService for GeminiMediaClient {
    async fn edit_image(&self, image: &ImageAsset, prompt: &str) -> Result<GenerationResult> {
        tracing::debug!("Editing image ({} bytes)", image.bytes.len());
        self.generate_media(edit_request(image, prompt), GenerationConfig::image_and_text())
            .await
            .map_err(|e| e.for_operation(EDIT_IMAGE_FAILED))
    }

    async fn edit_image_with_mask(
        &self,
        image: &ImageAsset,
        mask: &ImageAsset,
        prompt: &str,
    ) -> Result<GenerationResult> {
        tracing::debug!(
            "Editing image ({} bytes) with mask ({} bytes)",
            image.bytes.len(),
            mask.bytes.len()
        );
        self.generate_media(
            mask_edit_request(image, mask, prompt),
            GenerationConfig::image_and_text(),
        )
        .await
        .map_err(|e| e.for_operation(EDIT_WITH_MASK_FAILED))
    }

    async fn get_creative_ideas(&self, image: &ImageAsset) -> Result<Option<Vec<String>>> {
        let request = PromptRequest::new()
            .image(encode_image(image, None))
            .text(prompts::CREATIVE_IDEAS);
        self.request_ideas(request)
            .await
            .map_err(|e| e.for_operation(CREATIVE_IDEAS_FAILED))
    }

    async fn generate_images(
        &self,
        prompt: &str,
        count: u32,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<String>> {
        self.generate_images_impl(prompt, count, aspect_ratio)
            .await
            .map_err(|e| e.for_operation(GENERATE_IMAGES_FAILED))
    }

    async fn generate_image_with_reference(
        &self,
        references: &[ImageAsset],
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<Vec<String>> {
        self.generate_with_reference_impl(references, prompt, aspect_ratio)
            .await
            .map_err(|e| e.for_operation(REFERENCE_FAILED))
    }

    async fn generate_prompt_ideas(
        &self,
        form: &PromptIdeaForm,
        references: &[ImageAsset],
    ) -> Result<Vec<String>> {
        self.prompt_ideas_impl(form, references)
            .await
            .map_err(|e| e.for_operation(PROMPT_IDEAS_FAILED))
    }
}
