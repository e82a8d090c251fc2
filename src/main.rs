mod session;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;

use capture::bitmap::EncodeError;
use capture::raster::{BitmapRasterizer, CroppingRasterizer, RasterError, RegionRasterizer};
use clap::{Args, Parser, Subcommand};
use session::{Gesture, HeadlessSession, SessionError, raster_options};
use widget::config::{ConfigError, WidgetConfig};
use widget::net::api::{HttpSubmissionClient, SubmitError};
use widget::state::panel::{FeedbackError, FeedbackPanel};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("{message}")]
    Notice { message: String },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "bugreport", about = "Capture page screenshots and file bug reports")]
struct Cli {
    /// Overrides FEEDBACK_BASE_URL from the environment config.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cut a region out of a rendered page and save it as JPEG.
    Capture(CaptureArgs),
    /// File a report for a document, optionally with a screenshot.
    Submit(SubmitArgs),
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Full-page PNG/JPEG render to capture from.
    #[arg(long, requires = "drag")]
    page: Option<PathBuf>,

    /// Drag gesture in viewport pixels: X1,Y1:X2,Y2.
    #[arg(long, requires = "page")]
    drag: Option<String>,

    /// Page scroll at release: X,Y.
    #[arg(long)]
    scroll: Option<String>,

    /// Render from the page origin and crop afterwards, with this margin.
    #[arg(long)]
    crop_margin: Option<u32>,

    /// Device pixels per CSS pixel the page was rendered at.
    #[arg(long)]
    scale: Option<f64>,
}

#[derive(Args, Debug)]
struct CaptureArgs {
    #[command(flatten)]
    page: PageArgs,

    #[arg(long, short)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Page URL or path the report is about, e.g. /papers/1234.5678/.
    #[arg(long, env = "FEEDBACK_LOCATION")]
    location: String,

    /// Issue description.
    #[arg(long, default_value = "")]
    text: String,

    #[command(flatten)]
    page: PageArgs,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = WidgetConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.endpoint.base_url = base_url;
    }

    match cli.command {
        Command::Capture(args) => run_capture(&config, args).await,
        Command::Submit(args) => run_submit(&config, args).await,
    }
}

fn open_session(page: &PageArgs) -> Result<Option<(HeadlessSession<dyn RegionRasterizer>, Gesture)>, CliError> {
    let (Some(path), Some(drag)) = (&page.page, &page.drag) else {
        return Ok(None);
    };
    let gesture = Gesture::parse(drag, page.scroll.as_deref())?;
    let options = raster_options(page.scale)?;
    let bitmap = BitmapRasterizer::open(path)?;
    tracing::info!(path = %path.display(), dimensions = ?bitmap.page_dimensions(), "page loaded");
    let rasterizer: Box<dyn RegionRasterizer> = match page.crop_margin {
        Some(margin) => Box::new(CroppingRasterizer::new(bitmap).with_margin(margin)),
        None => Box::new(bitmap),
    };
    Ok(Some((HeadlessSession::with_options(rasterizer, options), gesture)))
}

async fn run_capture(config: &WidgetConfig, args: CaptureArgs) -> Result<(), CliError> {
    let Some((mut session, gesture)) = open_session(&args.page)? else {
        return Err(CliError::Notice { message: "capture needs --page and --drag".to_owned() });
    };
    let image = session.capture(gesture).await?;
    let jpeg = image.encode_jpeg(config.panel.jpeg_quality)?;
    std::fs::write(&args.out, jpeg).map_err(|source| CliError::Write { path: args.out.clone(), source })?;
    println!("{} ({}x{})", args.out.display(), image.width(), image.height());
    Ok(())
}

async fn run_submit(config: &WidgetConfig, args: SubmitArgs) -> Result<(), CliError> {
    let mut panel = FeedbackPanel::for_location(&args.location, config.panel)?;
    panel.open();
    panel.set_description(args.text);

    if let Some((mut session, gesture)) = open_session(&args.page)? {
        session.capture_for(&mut panel, gesture).await?;
        if let Some(notice) = panel.notice() {
            return Err(CliError::Notice { message: notice.message.clone() });
        }
    }

    let client = HttpSubmissionClient::new(&config.endpoint)?;
    tracing::info!(url = client.url(), document_id = panel.document_id(), "submitting report");
    let issue_url = panel.submit(&client).await?;
    println!("Issue has been reported! Follow it at {issue_url}");
    Ok(())
}
