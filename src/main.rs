use anyhow::Result;
use clap::{Parser, Subcommand};
use image_studio::app::{App, Operation};
use image_studio::models::{AspectRatio, Config, PromptIdeaForm};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-studio")]
#[command(about = "Edit and generate images with Gemini")]
struct CliArgs {
    /// Username for the login gate (only checked when STUDIO_USERNAME is configured).
    #[arg(long, env = "STUDIO_LOGIN_USER", global = true)]
    username: Option<String>,

    /// Password for the login gate.
    #[arg(long, env = "STUDIO_LOGIN_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Export returned images as PNG files under this directory.
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Edit an image with a text instruction.
    Edit {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        prompt: String,
    },
    /// Edit only the white areas of a mask.
    EditMask {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        mask: PathBuf,
        #[arg(long)]
        prompt: String,
    },
    /// Suggest creative edits for an image.
    Ideas {
        #[arg(long)]
        image: PathBuf,
    },
    /// Generate images from a text prompt.
    Generate {
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, default_value = "1:1", value_parser = parse_aspect_ratio)]
        aspect_ratio: AspectRatio,
    },
    /// Generate one image guided by reference images.
    Reference {
        #[arg(long = "image", required = true)]
        images: Vec<PathBuf>,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "1:1")]
        aspect_ratio: String,
    },
    /// Suggest text-to-image prompts from a brief and/or reference images.
    PromptIdeas {
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        style: String,
        #[arg(long, default_value = "")]
        mood: String,
        #[arg(long, default_value = "")]
        details: String,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

fn parse_aspect_ratio(input: &str) -> std::result::Result<AspectRatio, String> {
    input.parse().map_err(|e: image_studio::Error| e.to_string())
}

impl From<Command> for Operation {
    fn from(command: Command) -> Self {
        match command {
            Command::Edit { image, prompt } => Operation::Edit { image, prompt },
            Command::EditMask {
                image,
                mask,
                prompt,
            } => Operation::EditWithMask {
                image,
                mask,
                prompt,
            },
            Command::Ideas { image } => Operation::CreativeIdeas { image },
            Command::Generate {
                prompt,
                count,
                aspect_ratio,
            } => Operation::Generate {
                prompt,
                count,
                aspect_ratio,
            },
            Command::Reference {
                images,
                prompt,
                aspect_ratio,
            } => Operation::Reference {
                images,
                prompt,
                aspect_ratio,
            },
            Command::PromptIdeas {
                subject,
                style,
                mood,
                details,
                images,
            } => Operation::PromptIdeas {
                form: PromptIdeaForm {
                    subject,
                    style,
                    mood,
                    details,
                },
                images,
            },
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = Config::from_env()?;
    let app = App::new(&config, args.output_dir.as_deref())?;

    app.login(args.username.as_deref(), args.password.as_deref())
        .await?;

    let outcome = app.run(args.command.into()).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => {
            info!("Done");
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aspect_ratio_valid() {
        assert_eq!(parse_aspect_ratio("16:9").unwrap(), AspectRatio::Wide);
    }

    #[test]
    fn test_parse_aspect_ratio_invalid() {
        let err = parse_aspect_ratio("2:1").unwrap_err();
        assert!(err.contains("1:1, 3:4"));
    }

    #[test]
    fn test_cli_parses_reference_images_in_order() {
        let args = CliArgs::try_parse_from([
            "image-studio",
            "reference",
            "--image",
            "a.png",
            "--image",
            "b.jpg",
            "--prompt",
            "both together",
            "--aspect-ratio",
            "4:3",
        ])
        .unwrap();

        match Operation::from(args.command) {
            Operation::Reference {
                images,
                aspect_ratio,
                ..
            } => {
                assert_eq!(images, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
                assert_eq!(aspect_ratio, "4:3");
            }
            other => panic!("unexpected operation {:?}", other),
        }
    }

    #[test]
    fn test_cli_prompt_ideas_defaults_to_empty_form() {
        let args = CliArgs::try_parse_from(["image-studio", "prompt-ideas", "--image", "a.png"])
            .unwrap();

        match Operation::from(args.command) {
            Operation::PromptIdeas { form, images } => {
                assert!(form.is_empty());
                assert_eq!(images.len(), 1);
            }
            other => panic!("unexpected operation {:?}", other),
        }
    }
}
