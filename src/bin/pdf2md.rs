//! CLI binary for pdf2md-lite.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2md_lite::pipeline::input;
use pdf2md_lite::{
    convert_to_file, default_images_dir, default_output_path, inspect, ConversionConfig,
    ConversionProgressCallback, ImageFormat, PageSelection, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit code for a missing input file.
const EXIT_MISSING_INPUT: i32 = 2;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar on stderr plus one line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar length is set by `on_conversion_start` once pages are known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Extracting");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Writing");
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize, images: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>6} chars")),
            dim(&format!("{images} images")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, images_written: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages, {} images",
            green("✔"),
            bold(&total_pages.to_string()),
            bold(&images_written.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Writes document.md and document_images/ next to the PDF
  pdf2md document.pdf

  # Explicit output and images directory
  pdf2md document.pdf out/notes.md --images-dir out/figures

  # Text only, first five pages
  pdf2md --no-images --pages 1-5 paper.pdf

  # Inspect PDF metadata
  pdf2md --inspect-only document.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to the libpdfium shared library to load
  RUST_LOG          Log filter (overrides -v / -q)
"#;

/// Extract text and embedded images from a PDF into Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md",
    version,
    about = "Convert PDF to Markdown (text + images)",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file path.
    pdf: PathBuf,

    /// Output Markdown file path. Default: <input without extension>.md
    output: Option<PathBuf>,

    /// Directory to write extracted images. Default: <output without extension>_images
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Do not extract images.
    #[arg(long, conflicts_with = "images_dir")]
    no_images: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2MD_PAGES", default_value = "all")]
    pages: String,

    /// Encoding for saved images.
    #[arg(long, env = "PDF2MD_IMAGE_FORMAT", value_enum, default_value = "png")]
    image_format: ImageFormatArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2MD_PASSWORD")]
    password: Option<String>,

    /// Prepend YAML front-matter with document metadata.
    #[arg(long, env = "PDF2MD_METADATA")]
    metadata: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Print a JSON summary instead of the plain result lines.
    #[arg(long, env = "PDF2MD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ImageFormatArg {
    Png,
    Jpeg,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(v: ImageFormatArg) -> Self {
        match v {
            ImageFormatArg::Png => ImageFormat::Png,
            ImageFormatArg::Jpeg => ImageFormat::Jpeg,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides the feedback that matters; keep library logs
    // at warn unless asked.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Input check ──────────────────────────────────────────────────────
    if let Err(e) = input::resolve_local(&cli.pdf) {
        if e.is_missing_input() {
            eprintln!("ERROR: {e}");
            process::exit(EXIT_MISSING_INPUT);
        }
        return Err(e).context("Invalid input");
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.pdf, cli.password.as_deref()).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.pdf.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let md_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.pdf));
    let images_dir = if cli.no_images {
        None
    } else {
        Some(
            cli.images_dir
                .clone()
                .unwrap_or_else(|| default_images_dir(&md_path)),
        )
    };

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, images_dir.clone(), progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_to_file(&cli.pdf, &md_path, &config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        println!("Wrote Markdown to: {}", md_path.display());
        if let Some(dir) = images_dir {
            println!("Extracted images into: {} (if any)", dir.display());
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(
    cli: &Cli,
    images_dir: Option<PathBuf>,
    progress: Option<ProgressCallback>,
) -> Result<ConversionConfig> {
    let pages: PageSelection = cli
        .pages
        .parse()
        .with_context(|| format!("Invalid --pages value '{}'", cli.pages))?;

    let mut builder = ConversionConfig::builder()
        .pages(pages)
        .image_format(cli.image_format.into())
        .include_metadata(cli.metadata);

    if let Some(dir) = images_dir {
        builder = builder.images_dir(dir);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
