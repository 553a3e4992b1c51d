//! cinedeck - terminal movie browser for TMDB.

/// Application configuration (TOML).
mod config;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TmdbConfig, resolve_config_path, resolve_log_path};
use cinedeck_api::tmdb::TmdbClient;
use cinedeck_tui::browser::{BrowserConfig, run_browser};
use cinedeck_tui::view::{View, ViewContent, ViewKind};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "cinedeck", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse popular movies and search interactively.
    Browse,
    /// List popular movies.
    Popular(PopularArgs),
    /// Search for movies.
    Search(SearchArgs),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `popular` subcommand.
#[derive(clap::Args)]
struct PopularArgs {
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Response language (default: config `tmdb.language`).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "マトリックス"). A blank query does nothing.
    #[arg(long, required = true)]
    query: String,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Response language (default: config `tmdb.language`).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Loads the config file and applies environment overrides.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is
/// present but invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;
    config.tmdb.apply_env();
    Ok(config)
}

/// Builds a `TmdbClient` from the TMDB config.
///
/// Credentials are not checked here; a missing one surfaces as a view error.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(tmdb: &TmdbConfig) -> Result<TmdbClient> {
    TmdbClient::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(tmdb.timeout())
        .build()
        .context("failed to build TMDB client")
}

/// Prints a view's records, or fails with its inline error line.
///
/// # Errors
///
/// Returns the error line if the view's fetch failed.
fn print_content(content: &ViewContent) -> Result<()> {
    match content {
        ViewContent::Records(records) => {
            for record in records {
                tracing::info!("{}\t{}", record.id, record.title);
                tracing::info!("  {}", record.poster_url);
                tracing::info!("  {}", record.synopsis);
            }
            tracing::info!("Total: {} movies", records.len());
            Ok(())
        }
        ViewContent::Error(line) => bail!("{line}"),
        ViewContent::Idle | ViewContent::Loading => Ok(()),
    }
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the fetch fails.
#[instrument(skip_all)]
async fn run_popular(args: &PopularArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(&config.tmdb)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let mut view = View::new(ViewKind::PopularFeed, &config.tmdb.image_base_url)
        .with_language(language)
        .with_page(args.page);
    let Some(pending) = view.mount(&config.tmdb.api_settings()) else {
        return Ok(());
    };
    view.resolve(&client, pending).await;

    print_content(&view.content())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the fetch fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let mut view = View::new(ViewKind::Search, &config.tmdb.image_base_url)
        .with_language(language)
        .with_page(args.page);
    let Some(pending) = view.submit(&args.query, &config.tmdb.api_settings()) else {
        return Ok(());
    };
    let client = build_tmdb_client(&config.tmdb)?;
    view.resolve(&client, pending).await;

    print_content(&view.content())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(config: AppConfig) -> Result<()> {
    let client = build_tmdb_client(&config.tmdb)?;
    let browser_config = BrowserConfig {
        api_settings: config.tmdb.api_settings(),
        image_base_url: config.tmdb.image_base_url,
        language: config.tmdb.language,
        carousel: config.carousel.settings(),
        cell_width: config.carousel.cell_width,
    };

    tracing::info!("Launching browser");
    run_browser(&client, browser_config)
        .await
        .context("browser TUI failed")
}

/// Opens the browser log file, creating its directory if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
fn open_log_file(dir: Option<&PathBuf>) -> Result<File> {
    let path = resolve_log_path(dir).context("failed to resolve log path")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Installs the global subscriber. Logs go to `log_file` when given,
/// otherwise to stdout.
fn init_tracing(log_file: Option<File>) {
    let ansi = log_file.is_none();
    let writer = log_file.map_or_else(
        || BoxMakeWriter::new(io::stdout),
        |file| BoxMakeWriter::new(Mutex::new(file)),
    );

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(args.shell, &mut command, "cinedeck", &mut io::stdout());
        return Ok(());
    }

    let log_file = match cli.command {
        Commands::Browse => Some(open_log_file(cli.dir.as_ref())?),
        _ => None,
    };
    init_tracing(log_file);

    let config = load_config(cli.dir.as_ref())?;
    match cli.command {
        Commands::Browse => run_browse(config).await,
        Commands::Popular(args) => run_popular(&args, &config).await,
        Commands::Search(args) => run_search(&args, &config).await,
        Commands::Completions(_) => Ok(()),
    }
}
