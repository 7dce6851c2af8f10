use std::path::{Path, PathBuf};

use aiplatform_client::api_client::assets::save_asset;
use aiplatform_client::errors::FeatureError;
use aiplatform_client::models::image::ImageStyle;
use aiplatform_client::models::resume::ResumeRequest;
use aiplatform_client::notifications::NotificationQueue;
use aiplatform_client::state::Platform;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;

#[derive(Parser)]
#[command(name = "aiplatform")]
#[command(about = "Resume, ATS and image generation client for the AI platform API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Overrides PLATFORM_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that the backend is up
    Health,
    /// Generate an ATS-optimized resume from a JSON request file
    Resume {
        request: PathBuf,
        /// Download the generated PDF into this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Score a resume against a job description
    Ats(AtsArgs),
    /// Ask for improvement suggestions for a resume
    AtsImprove(AtsArgs),
    /// Draft a cover letter for a resume and job description
    CoverLetter {
        #[command(flatten)]
        input: AtsArgs,
        /// Company the letter is addressed to
        #[arg(long)]
        company: String,
    },
    /// Generate an image from a text prompt
    Image {
        prompt: String,
        #[arg(long, default_value_t = ImageStyle::Realistic)]
        style: ImageStyle,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        steps: Option<u32>,
        #[arg(long)]
        guidance: Option<f32>,
        /// Download the image into this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Show what the backend services can do
    Info,
}

#[derive(Args)]
pub struct AtsArgs {
    /// Plain-text resume
    #[arg(long)]
    pub resume: PathBuf,
    /// Plain-text job description
    #[arg(long)]
    pub job: PathBuf,
}

pub async fn handle_command(platform: &Platform, command: Command) -> Result<()> {
    match command {
        Command::Health => {
            let health = platform.health.check().await?;
            print_json(&health)?;
        }

        Command::Resume { request, save } => {
            let raw = read_text(&request).await?;
            let form: ResumeRequest = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid resume request in {}", request.display()))?;

            let mut generator = platform.resume_generator();
            generator.form = form;
            let response = generator.submit().await.map_err(surface)?;
            print_json(&response)?;

            if let Some(dir) = save {
                flush_notifications(&platform.notifications);
                let path = save_asset(&platform.client, &response.pdf_url, &dir).await?;
                println!("PDF saved to {}", path.display());
            }
        }

        Command::Ats(args) => {
            let mut analyzer = platform.ats_analyzer();
            analyzer.form.resume_text = read_text(&args.resume).await?;
            analyzer.form.job_description = read_text(&args.job).await?;

            let response = analyzer.submit().await.map_err(surface)?;
            print_json(&response)?;
            println!(
                "Score: {:.1} ({})",
                response.score,
                response.score_band().label()
            );
            let missing = analyzer.missing_sections();
            if !missing.is_empty() {
                println!("Missing sections: {}", missing.join(", "));
            }
        }

        Command::AtsImprove(args) => {
            let mut analyzer = platform.ats_analyzer();
            analyzer.form.resume_text = read_text(&args.resume).await?;
            analyzer.form.job_description = read_text(&args.job).await?;

            let suggestions = analyzer.suggest_improvements().await.map_err(surface)?;
            print_json(&suggestions)?;
        }

        Command::CoverLetter { input, company } => {
            let mut analyzer = platform.ats_analyzer();
            analyzer.form.resume_text = read_text(&input.resume).await?;
            analyzer.form.job_description = read_text(&input.job).await?;

            let letter = analyzer.write_cover_letter(&company).await.map_err(surface)?;
            println!("{}", letter.cover_letter);
        }

        Command::Image {
            prompt,
            style,
            width,
            height,
            steps,
            guidance,
            save,
        } => {
            let mut generator = platform.image_generation();
            generator.form.prompt = prompt;
            generator.form.style = style;
            generator.form.width = width;
            generator.form.height = height;
            generator.form.num_inference_steps = steps;
            generator.form.guidance_scale = guidance;

            let response = generator.submit().await.map_err(surface)?;
            print_json(&response)?;

            if let Some(dir) = save {
                flush_notifications(&platform.notifications);
                let path = save_asset(&platform.client, &response.preferred_asset(), &dir).await?;
                println!("Image saved to {}", path.display());
            }
        }

        Command::Info => {
            let resume = platform.resume.service_info().await?;
            let ats = platform.ats.service_info().await?;
            let image = platform.image.model_info().await?;
            print_json(&serde_json::json!({
                "resume": resume,
                "ats": ats,
                "image": image,
            }))?;
        }
    }

    Ok(())
}

/// Prints every active notification to stderr and dismisses it.
///
/// Called before long steps so auto-dismiss timers cannot hide a notification
/// that was raised earlier in the command.
pub fn flush_notifications(queue: &NotificationQueue) -> usize {
    let active = queue.active();
    for notification in &active {
        eprintln!("[{}] {}", notification.kind.label(), notification.message);
        queue.dismiss(notification.id);
    }
    active.len()
}

/// Validation errors have no notification behind them, so they get a log line here.
fn surface(err: FeatureError) -> anyhow::Error {
    if let FeatureError::Validation(ref validation) = err {
        warn!("Rejected before sending: {validation}");
    }
    err.into()
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
