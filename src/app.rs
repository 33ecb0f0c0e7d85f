//! Application orchestration: login, one media operation, optional export.

use crate::ai::{GeminiMediaClient, MediaService};
use crate::auth::{LoginGate, StaticCredentialVerifier};
use crate::image::{ImageExporter, PngExporter};
use crate::models::{AspectRatio, Config, GenerationResult, ImageAsset, PromptIdeaForm};
use crate::Result;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// One request to the media client, with inputs still on disk.
#[derive(Debug, Clone)]
pub enum Operation {
    Edit {
        image: PathBuf,
        prompt: String,
    },
    EditWithMask {
        image: PathBuf,
        mask: PathBuf,
        prompt: String,
    },
    CreativeIdeas {
        image: PathBuf,
    },
    Generate {
        prompt: String,
        count: u32,
        aspect_ratio: AspectRatio,
    },
    Reference {
        images: Vec<PathBuf>,
        prompt: String,
        aspect_ratio: String,
    },
    PromptIdeas {
        form: PromptIdeaForm,
        images: Vec<PathBuf>,
    },
}

impl Operation {
    fn export_name(&self) -> &'static str {
        match self {
            Self::Edit { .. } => "edit",
            Self::EditWithMask { .. } => "masked_edit",
            Self::CreativeIdeas { .. } => "ideas",
            Self::Generate { .. } => "generated",
            Self::Reference { .. } => "reference",
            Self::PromptIdeas { .. } => "prompt_ideas",
        }
    }
}

/// What an operation produced, ready to print.
#[derive(Debug, Default, Serialize)]
pub struct Outcome {
    /// Data-URLs; left out once the images have been exported.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exported: Vec<PathBuf>,
}

impl From<GenerationResult> for Outcome {
    fn from(result: GenerationResult) -> Self {
        Self {
            images: result.image.into_iter().collect(),
            text: result.text,
            ..Default::default()
        }
    }
}

/// Coordinates login, the media client and image export for one invocation.
pub struct App {
    media: Box<dyn MediaService>,
    exporter: Option<Box<dyn ImageExporter>>,
    gate: Option<LoginGate>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub media: Box<dyn MediaService>,
    pub exporter: Option<Box<dyn ImageExporter>>,
    pub gate: Option<LoginGate>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            media: services.media,
            exporter: services.exporter,
            gate: services.gate,
        }
    }

    /// Build an app from configuration. When `output_root` is given, images
    /// are exported into a fresh `{date}_{uuid}` directory beneath it.
    pub fn new(config: &Config, output_root: Option<&Path>) -> Result<Self> {
        let media: Box<dyn MediaService> = Box::new(GeminiMediaClient::new(config));
        info!(
            "Media client ready (image: {}, text: {}, imagen: {})",
            config.image_model, config.text_model, config.imagen_model
        );

        let exporter: Option<Box<dyn ImageExporter>> = match output_root {
            Some(root) => {
                let date = Local::now().format("%Y-%m-%d").to_string();
                let session_dir = root.join(format!("{}_{}", date, Uuid::new_v4()));
                let exporter = PngExporter::new(&session_dir);
                info!("Exporting images to {}", exporter.output_dir().display());
                Some(Box::new(exporter))
            }
            None => None,
        };

        let gate = config
            .login
            .clone()
            .map(|expected| LoginGate::new(Box::new(StaticCredentialVerifier::new(expected))));

        Ok(Self::with_services(AppServices {
            media,
            exporter,
            gate,
        }))
    }

    /// Pass the login gate, if one is configured. Missing values are
    /// forwarded as empty strings.
    pub async fn login(&self, username: Option<&str>, password: Option<&str>) -> Result<()> {
        match &self.gate {
            Some(gate) => {
                gate.submit(username.unwrap_or_default(), password.unwrap_or_default())
                    .await
            }
            None => Ok(()),
        }
    }

    pub async fn run(&self, operation: Operation) -> Result<Outcome> {
        let export_name = operation.export_name();
        info!("Running {} operation", export_name);

        let mut outcome = match operation {
            Operation::Edit { image, prompt } => {
                let image = ImageAsset::from_file(&image).await?;
                Outcome::from(self.media.edit_image(&image, &prompt).await?)
            }
            Operation::EditWithMask {
                image,
                mask,
                prompt,
            } => {
                let image = ImageAsset::from_file(&image).await?;
                let mask = ImageAsset::from_file(&mask).await?;
                Outcome::from(
                    self.media
                        .edit_image_with_mask(&image, &mask, &prompt)
                        .await?,
                )
            }
            Operation::CreativeIdeas { image } => {
                let image = ImageAsset::from_file(&image).await?;
                Outcome {
                    ideas: Some(
                        self.media
                            .get_creative_ideas(&image)
                            .await?
                            .unwrap_or_default(),
                    ),
                    ..Default::default()
                }
            }
            Operation::Generate {
                prompt,
                count,
                aspect_ratio,
            } => Outcome {
                images: self
                    .media
                    .generate_images(&prompt, count, aspect_ratio)
                    .await?,
                ..Default::default()
            },
            Operation::Reference {
                images,
                prompt,
                aspect_ratio,
            } => {
                let references = load_all(&images).await?;
                Outcome {
                    images: self
                        .media
                        .generate_image_with_reference(&references, &prompt, &aspect_ratio)
                        .await?,
                    ..Default::default()
                }
            }
            Operation::PromptIdeas { form, images } => {
                let references = load_all(&images).await?;
                Outcome {
                    ideas: Some(self.media.generate_prompt_ideas(&form, &references).await?),
                    ..Default::default()
                }
            }
        };

        if let Some(exporter) = &self.exporter {
            for data_url in std::mem::take(&mut outcome.images) {
                let path = exporter.export_image(&data_url, export_name).await?;
                outcome.exported.push(path);
            }
        }

        Ok(outcome)
    }
}

async fn load_all(paths: &[PathBuf]) -> Result<Vec<ImageAsset>> {
    let mut assets = Vec::with_capacity(paths.len());
    for path in paths {
        assets.push(ImageAsset::from_file(path).await?);
    }
    Ok(assets)
}
