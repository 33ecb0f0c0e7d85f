//! Data models and structures
//!
//! Request-scoped values passed to and returned from the media client, plus
//! the process configuration loaded from the environment.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const PNG_MIME: &str = "image/png";

/// Raw image content as the caller supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    /// MIME type reported by the source, if it had one.
    pub mime_type: Option<String>,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: Some(mime_type.into()),
        }
    }

    /// An in-memory blob with no declared type.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: None,
        }
    }

    /// Read an image from disk, inferring its MIME type from magic bytes.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let mime_type = crate::ai::mime::detect_image_mime(&bytes).to_string();
        tracing::debug!(
            "Loaded {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            mime_type
        );
        Ok(Self {
            bytes,
            mime_type: Some(mime_type),
        })
    }
}

/// Transport-safe image payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

/// One element of an ordered multi-modal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Image(EncodedImage),
    Text(String),
}

/// Ordered parts submitted together. Order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    pub parts: Vec<PromptPart>,
}

impl PromptRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(mut self, image: EncodedImage) -> Self {
        self.parts.push(PromptPart::Image(image));
        self
    }

    pub fn images(mut self, images: impl IntoIterator<Item = EncodedImage>) -> Self {
        self.parts.extend(images.into_iter().map(PromptPart::Image));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(PromptPart::Text(text.into()));
        self
    }
}

/// Normalized outcome of an image-producing call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// PNG data-URL of the first returned image.
    pub image: Option<String>,
    pub text: Option<String>,
}

/// Strict response schema body for idea requests: `{ "ideas": [..] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaList {
    pub ideas: Option<Vec<String>>,
}

/// Aspect ratios accepted for text-to-image generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Landscape => "4:3",
            Self::Tall => "9:16",
            Self::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "3:4" => Ok(Self::Portrait),
            "4:3" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Tall),
            "16:9" => Ok(Self::Wide),
            other => Err(Error::InvalidInput(format!(
                "Unsupported aspect ratio '{}'. Expected one of 1:1, 3:4, 4:3, 9:16, 16:9",
                other
            ))),
        }
    }
}

/// Structured fields used to steer prompt-idea generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptIdeaForm {
    pub subject: String,
    pub style: String,
    pub mood: String,
    pub details: String,
}

impl PromptIdeaForm {
    pub fn is_empty(&self) -> bool {
        [&self.subject, &self.style, &self.mood, &self.details]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

/// Username/password pair collected by the login gate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// Configuration
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGEN_MODEL: &str = "imagen-4.0-generate-001";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    /// Model used for image editing and reference-guided generation.
    pub image_model: String,
    /// Model used for JSON idea lists.
    pub text_model: String,
    /// Model used for text-to-image generation.
    pub imagen_model: String,
    pub request_timeout: Duration,
    /// Credentials the CLI login gate accepts, when configured.
    pub login: Option<Credentials>,
}

impl Config {
    /// Config with default endpoints and models for the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            imagen_model: DEFAULT_IMAGEN_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            login: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or_else(|| {
                Error::ConfigMissing("GEMINI_API_KEY (or API_KEY) not set".to_string())
            })?;

        let request_timeout = match non_empty("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                Error::InvalidInput(format!(
                    "REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let login = match (non_empty("STUDIO_USERNAME"), lookup("STUDIO_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Ok(Self {
            api_key,
            base_url: non_empty("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            image_model: non_empty("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            text_model: non_empty("TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            imagen_model: non_empty("IMAGEN_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGEN_MODEL.to_string()),
            request_timeout,
            login,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing(_)));
    }

    #[test]
    fn test_config_blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing(_)));
    }

    #[test]
    fn test_config_falls_back_to_api_key_var() {
        let config = Config::from_lookup(lookup_from(&[("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.api_key, "legacy");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(config.login.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("API_KEY", "ignored"),
            ("GEMINI_BASE_URL", "http://localhost:9000/"),
            ("TEXT_MODEL", "gemini-test"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("STUDIO_USERNAME", "ada"),
            ("STUDIO_PASSWORD", "hunter2"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.text_model, "gemini-test");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        let login = config.login.unwrap();
        assert_eq!(login.username, "ada");
        assert_eq!(login.password, "hunter2");
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_aspect_ratio_round_trip() {
        for ratio in ["1:1", "3:4", "4:3", "9:16", "16:9"] {
            let parsed: AspectRatio = ratio.parse().unwrap();
            assert_eq!(parsed.to_string(), ratio);
        }
        assert!("2:1".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::Wide).unwrap();
        assert_eq!(json, "\"16:9\"");
    }

    #[test]
    fn test_prompt_idea_form_emptiness() {
        assert!(PromptIdeaForm::default().is_empty());
        let form = PromptIdeaForm {
            mood: " ".to_string(),
            ..Default::default()
        };
        assert!(form.is_empty());
        let form = PromptIdeaForm {
            style: "watercolor".to_string(),
            ..Default::default()
        };
        assert!(!form.is_empty());
    }

    #[test]
    fn test_prompt_request_preserves_order() {
        let img = |d: &str| EncodedImage {
            data: d.to_string(),
            mime_type: PNG_MIME.to_string(),
        };
        let request = PromptRequest::new()
            .image(img("a"))
            .images(vec![img("b"), img("c")])
            .text("do it");

        assert_eq!(request.parts.len(), 4);
        assert_eq!(request.parts[0], PromptPart::Image(img("a")));
        assert_eq!(request.parts[2], PromptPart::Image(img("c")));
        assert_eq!(request.parts[3], PromptPart::Text("do it".to_string()));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            username: "ada".to_string(),
            password: "secret".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ada"));
        assert!(!debug.contains("secret"));
    }
}
