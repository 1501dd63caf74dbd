use chrono::DateTime;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use photomark::config::Config;
use photomark::error::AppError;
use photomark::storage::{FsPhotoStore, PhotoStore, PhotoUpload};
use photomark::watermark::{
    compress_jpeg, AddressInfo, GeoPoint, LogoOutcome, OutputFormat, WatermarkContext,
};

/// Photomark - burn time, place and identity watermarks into photos
#[derive(Parser, Debug)]
#[command(name = "photomark")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watermark a photo
    Render(RenderArgs),
    /// List the available styles
    Styles,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Source photo
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the watermarked photo
    #[arg(short, long)]
    output: PathBuf,

    /// Style name; unknown names fall back to classic
    #[arg(short, long, default_value = "classic")]
    style: String,

    /// Username shown in the watermark
    #[arg(short, long)]
    user: Option<String>,

    /// Latitude of the capture location
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the capture location
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Reverse-geocoder JSON response describing the address
    #[arg(long)]
    address_json: Option<PathBuf>,

    /// Logo reference: URL, data: URI or file path
    #[arg(long)]
    logo: Option<String>,

    /// Capture time (RFC 3339); defaults to now
    #[arg(long)]
    timestamp: Option<String>,

    /// Output format; defaults to the output extension, then the config
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Also compress the result and save it to the photo store
    #[arg(long)]
    store: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;

    photomark::logging::init_subscriber(&config.logging)
        .map_err(|e| AppError::Logging(e.to_string()))?;

    if let Some(path) = &cli.config {
        tracing::info!(
            config_file = %path.display(),
            locale = ?config.locale,
            custom_styles = config.styles.len(),
            "Configuration loaded successfully"
        );
    }

    match cli.command {
        Command::Render(args) => render(&config, args).await,
        Command::Styles => {
            list_styles(&config);
            Ok(())
        }
    }
}

fn list_styles(config: &Config) {
    let catalog = config.style_catalog();
    for name in catalog.names() {
        let style = catalog.get(name);
        println!("{:<14} {:<14} {}", name, style.layout.as_str(), style.theme.as_str());
    }
}

async fn render(config: &Config, args: RenderArgs) -> Result<(), AppError> {
    let started = Instant::now();
    let engine = config.build_engine()?;

    let catalog = config.style_catalog();
    if !catalog.contains(&args.style) {
        tracing::warn!(style = %args.style, "Unknown style, falling back to classic");
    }
    let style = catalog.get(&args.style);

    let ctx = build_context(&args).await?;
    let format = args
        .format
        .or_else(|| OutputFormat::from_path(&args.output))
        .unwrap_or(config.output.format);

    let input = tokio::fs::read(&args.input).await?;
    let rendered = engine
        .render_bytes(&input, &ctx, &style, format, config.output.jpeg_quality)
        .await?;

    tokio::fs::write(&args.output, &rendered.encoded.data).await?;

    let logo = match &rendered.logo {
        LogoOutcome::Drawn(_) => "drawn",
        LogoOutcome::Skipped => "skipped",
        LogoOutcome::Failed(_) => "failed",
        LogoOutcome::TimedOut => "timed out",
    };
    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        width = rendered.encoded.width,
        height = rendered.encoded.height,
        bytes = rendered.encoded.len(),
        logo,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Photo watermarked"
    );

    if args.store {
        let compressed = compress_jpeg(&rendered.encoded.data, config.output.compress_quality)?;
        let user_id = ctx.user_name().unwrap_or("anonymous").to_string();

        let store = FsPhotoStore::open(&config.storage.directory).await?;
        let result = store.save(PhotoUpload::new(user_id, compressed.data)).await;
        store.close().await;

        let stored = result?;
        println!("{}", stored.metadata.file_url);
    }

    Ok(())
}

async fn build_context(args: &RenderArgs) -> Result<WatermarkContext, AppError> {
    let mut ctx = match &args.timestamp {
        Some(ts) => WatermarkContext::at(DateTime::parse_from_rfc3339(ts).map_err(|e| {
            AppError::InvalidInput(format!("timestamp '{}' is not RFC 3339: {}", ts, e))
        })?),
        None => WatermarkContext::now(),
    };

    if let Some(user) = &args.user {
        ctx = ctx.with_user_name(user.clone());
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        ctx = ctx.with_location(GeoPoint::new(lat, lon));
    }
    if let Some(path) = &args.address_json {
        ctx = ctx.with_address(read_address(path).await?);
    }
    if let Some(logo) = &args.logo {
        ctx = ctx.with_logo(logo.clone());
    }

    Ok(ctx)
}

async fn read_address(path: &Path) -> Result<AddressInfo, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
        AppError::InvalidInput(format!("{} is not valid JSON: {}", path.display(), e))
    })?;
    Ok(AddressInfo::from_geocoder_fields(&value))
}
