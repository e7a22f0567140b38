use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use otter_sync::catalog::{PaginationConfig, Paginator, Source};
use otter_sync::config::expand_path;
use otter_sync::output::iso_timestamp;
use otter_sync::{authenticate, AuthOutcome, CatalogItem, Config, ExportFormat, Session, SyncRunner};
use std::time::Duration;
use tracing::{error, info, Level};

/// How many speeches `list` prints
const LIST_PREVIEW: usize = 20;

/// Download your Otter.ai transcripts into a local folder
#[derive(Debug, Parser)]
#[command(name = "otter-sync", version)]
struct Cli {
    /// Settings file, without extension
    #[arg(long, default_value = "config/otter-sync", global = true)]
    config: String,

    /// Otter.ai username/email
    #[arg(short, long, env = "OTTER_USERNAME", global = true)]
    username: Option<String>,

    /// Otter.ai password
    #[arg(short, long, env = "OTTER_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and list your speeches
    List {
        /// Only fetch the first N speeches
        #[arg(long)]
        limit: Option<usize>,

        /// Folder to list (0 = all)
        #[arg(long = "folder", value_name = "F")]
        folder_id: Option<i64>,

        #[arg(long, value_enum)]
        source: Option<Source>,
    },
    /// Download all your transcripts
    Download(DownloadArgs),
}

#[derive(Debug, Args)]
struct DownloadArgs {
    /// Download folder
    #[arg(short = 'f', long)]
    folder: Option<String>,

    /// File format to download
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Overwrite existing files
    #[arg(short, long)]
    overwrite: bool,

    /// Force full re-download, ignore existing files
    #[arg(long)]
    force: bool,

    /// Seconds to sleep between downloads
    #[arg(short, long)]
    sleep: Option<f64>,

    /// Minimum transcript length to download, in characters
    #[arg(short = 'l', long)]
    min_length: Option<usize>,

    /// Maximum number of files to download
    #[arg(short, long)]
    max_count: Option<usize>,

    /// Prepend a metadata header to text transcripts
    #[arg(long)]
    metadata: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let cfg = Config::load(&cli.config)?;
    info!("otter-sync v{}", env!("CARGO_PKG_VERSION"));

    let (Some(username), Some(password)) = (cli.username.as_deref(), cli.password.as_deref())
    else {
        bail!("Credentials required: pass --username/--password or set OTTER_USERNAME/OTTER_PASSWORD");
    };

    let session = match authenticate(&cfg.service, username, password)
        .await
        .context("Failed to connect to Otter.ai")?
    {
        AuthOutcome::Authenticated(session) => session,
        AuthOutcome::Rejected { reason } => {
            error!("Authentication failed: {}", reason);
            bail!("Authentication failed, please check your username and password");
        }
    };

    match cli.command {
        Command::List {
            limit,
            folder_id,
            source,
        } => {
            let mut pagination = match limit {
                Some(limit) => PaginationConfig::prefix(limit),
                None => cfg.pagination(),
            };
            if let Some(folder_id) = folder_id {
                pagination.folder_id = folder_id;
            }
            if let Some(source) = source {
                pagination.source = source;
            }
            list(&session, pagination).await
        }
        Command::Download(args) => download(&session, &cfg, args).await,
    }
}

async fn list(session: &Session, pagination: PaginationConfig) -> Result<()> {
    let speeches = Paginator::new(session, pagination)
        .collect_items()
        .await
        .context("Failed to fetch speeches")?;

    if speeches.is_empty() {
        println!("No speeches found in your account.");
        return Ok(());
    }

    println!("{:<40}  {:<10}  {:>8}  {}", "Title", "Date", "Duration", "ID");
    for speech in speeches.iter().take(LIST_PREVIEW) {
        println!("{}", list_row(speech));
    }
    if speeches.len() > LIST_PREVIEW {
        println!("... and {} more speeches", speeches.len() - LIST_PREVIEW);
    }
    println!("Found {} total speeches in your account", speeches.len());

    Ok(())
}

fn list_row(speech: &CatalogItem) -> String {
    let title = speech.display_title();
    let title = if title.chars().count() > 40 {
        format!("{}...", title.chars().take(37).collect::<String>())
    } else {
        title.to_string()
    };
    let date = speech
        .creation_time()
        .and_then(iso_timestamp)
        .map(|iso| iso.chars().take(10).collect())
        .unwrap_or_else(|| "N/A".to_string());
    let duration = speech
        .duration_secs
        .map(|d| format!("{}m", (d / 60.0).round()))
        .unwrap_or_else(|| "N/A".to_string());

    format!("{:<40}  {:<10}  {:>8}  {}", title, date, duration, speech.speech_id)
}

async fn download(session: &Session, cfg: &Config, args: DownloadArgs) -> Result<()> {
    let mut sync = cfg.sync_config()?;

    if let Some(folder) = &args.folder {
        sync.destination = expand_path(folder);
    }
    if let Some(format) = args.format {
        sync.format = format;
    }
    if args.overwrite || args.force {
        sync.overwrite = true;
    }
    if let Some(sleep) = args.sleep {
        sync.delay = Duration::try_from_secs_f64(sleep)
            .context("--sleep must be a non-negative number of seconds")?;
    }
    if let Some(min_length) = args.min_length {
        sync.min_length = min_length;
    }
    if args.max_count.is_some() {
        sync.max_downloads = args.max_count;
    }
    if args.metadata {
        sync.include_metadata = true;
    }

    info!("Download plan:");
    info!("  Format: {}", sync.format.extension().to_uppercase());
    info!("  Folder: {}", sync.destination.display());
    info!("  Overwrite existing: {}", if sync.overwrite { "Yes" } else { "No" });
    info!("  Min transcript length: {} chars", sync.min_length);
    info!("  Sleep between downloads: {:.1}s", sync.delay.as_secs_f64());
    match sync.max_downloads {
        Some(max) => info!("  Max downloads: {}", max),
        None => info!("  Max downloads: All speeches"),
    }

    let stats = SyncRunner::new(session, cfg.pagination(), sync).run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Download complete");
        println!("  Total speeches: {}", stats.total);
        println!("  Downloaded:     {}", stats.downloaded);
        println!("  Skipped:        {}", stats.skipped);
        println!("  Filtered:       {}", stats.filtered);
        println!("  Errors:         {}", stats.errors);
    }

    Ok(())
}
