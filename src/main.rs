use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use image_fanout::{
    logger::{self, LogLevel, LoggerConfig},
    models::{extension_for_mime, supported_models, COUNT_OPTIONS, DEFAULT_MODEL, RATIO_OPTIONS},
    BatchSummary, GalleryReporter, GenerationError, GenerationRequest, InferenceConfig,
    RequestOrchestrator, SlotOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "image-fanout", version, about = "Generate several images from one prompt")]
struct Cli {
    /// Text prompt describing the image
    prompt: Option<String>,

    /// Model id on the inference router
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Number of images to generate
    #[arg(long, short = 'n', default_value_t = 1)]
    count: usize,

    /// Aspect ratio, e.g. 1/1, 16:9, 9/16
    #[arg(long, default_value = "1/1")]
    ratio: String,

    /// Directory generated images are written to
    #[arg(long, short = 'o', default_value = "gallery")]
    output: PathBuf,

    /// List known models and ratios, then exit
    #[arg(long)]
    list_models: bool,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// One JSON object per log line, no colors or emojis
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn logger_config(&self) -> LoggerConfig {
        let mut config = match (self.json_logs, self.verbose) {
            (true, true) => LoggerConfig::production().with_level(LogLevel::Debug),
            (true, false) => LoggerConfig::production(),
            (false, true) => LoggerConfig::development(),
            (false, false) => LoggerConfig::new().with_level(LogLevel::Info),
        };
        if let Some(path) = &self.log_file {
            config = config.with_file_output(path);
        }
        config
    }

    fn generation_request(&self) -> image_fanout::Result<GenerationRequest> {
        GenerationRequest::new(
            self.model.clone(),
            self.count,
            self.ratio.clone(),
            self.prompt.clone().unwrap_or_default(),
        )
    }
}

/// Writes each successful image to disk as soon as its slot settles.
struct DiskGallery {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DiskGallery {
    fn save(&self, index: usize, image: &image_fanout::ImageRef) -> image_fanout::Result<PathBuf> {
        let (mime, bytes) = image.decode()?;
        let path = self
            .dir
            .join(format!("image-{}.{}", index, extension_for_mime(&mime)));
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

impl GalleryReporter for DiskGallery {
    fn slot_settled(&mut self, outcome: SlotOutcome) {
        match outcome {
            SlotOutcome::Success { index, image } => match self.save(index, &image) {
                Ok(path) => {
                    log::info!("🖼️  Image {} saved to {}", index, path.display());
                    println!("{}", path.display());
                    self.saved.push(path);
                }
                Err(e) => log::error!("❌ Image {} could not be saved: {}", index, e),
            },
            SlotOutcome::Failure { index, reason } => {
                log::error!("❌ Image {}: Generation failed ({})", index, reason);
            }
        }
    }

    fn batch_finished(&mut self, summary: &BatchSummary) {
        log::info!(
            "🎉 {} of {} image(s) generated in {}ms",
            summary.succeeded,
            summary.requested,
            summary.elapsed.as_millis()
        );
    }
}

fn failure_message(err: &(dyn Error + 'static)) -> String {
    format!("❌ {}", err)
}

fn hint_for(err: &(dyn Error + 'static)) -> Option<&'static str> {
    match err.downcast_ref::<GenerationError>()? {
        GenerationError::Configuration(_) => {
            Some("💡 Set HF_API_KEY (or HF_TOKEN) in the environment or a .env file")
        }
        GenerationError::InvalidRequest(_) => {
            Some("💡 Pass a prompt, e.g. image-fanout \"a lighthouse at dusk\" -n 4 --ratio 16:9")
        }
        _ => None,
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::debug!("✅ .env file loaded"),
        Err(_) => log::debug!("No .env file found, using system environment variables"),
    }

    if cli.list_models {
        log::info!("🖼️  Available image generation models:");
        for model in supported_models() {
            log::info!(
                "  {} - {} ({}): {}",
                model.id,
                model.name,
                model.provider,
                model.description
            );
        }
        log::info!("📐 Ratios: {}", RATIO_OPTIONS.join(", "));
        log::info!(
            "🔢 Counts: {}",
            COUNT_OPTIONS.map(|n| n.to_string()).join(", ")
        );
        return Ok(());
    }

    let request = cli.generation_request()?;

    let config = InferenceConfig::from_env();
    logger::log_config_info(&config);
    let orchestrator = RequestOrchestrator::new(config)?;

    fs::create_dir_all(&cli.output)?;
    let mut gallery = DiskGallery {
        dir: cli.output,
        saved: Vec::new(),
    };

    let summary = orchestrator.generate_into(request, &mut gallery).await;
    if summary.all_failed() {
        return Err(format!("all {} image(s) failed", summary.requested).into());
    }
    log::debug!("Saved {} file(s)", gallery.saved.len());

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_config(cli.logger_config()) {
        eprintln!("❌ Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", failure_message(e.as_ref()));
            if let Some(hint) = hint_for(e.as_ref()) {
                log::warn!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
