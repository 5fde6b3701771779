//! Karachi CLI binary.
//!
//! Provides a command-line interface over the PSX data portal adapter.

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use karachi::{AdapterConfig, CompanyFilter, DpsAdapter, SortBy};
use karachi_data::IndexCode;
use karachi_output::{ExportFormat, Exporter, SectorBreakdownResponse, TextReport};
use std::process;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "karachi")]
#[command(about = "Karachi: typed sector and company views of the PSX data portal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Portal base URL (overrides KARACHI_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Retries after the first attempt
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Fixed-width table
    Text,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values
    Csv,
    /// Markdown table
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// List companies, paged
    Companies {
        /// Filter by sector label
        #[arg(long)]
        sector: Option<String>,

        /// Filter by index (e.g. KSE100, KMI30)
        #[arg(long)]
        index: Option<IndexCode>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Page size
        #[arg(long)]
        limit: Option<usize>,

        /// Skip company detail pages
        #[arg(long)]
        no_fundamentals: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Sector breakdown of an index
    Sectors {
        /// Index to break down (default KSE100)
        #[arg(long)]
        index: Option<IndexCode>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Analytics for one company
    Company {
        /// Company symbol
        symbol: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Top companies of a sector
    Sector {
        /// Sector label
        name: String,

        /// Restrict to an index
        #[arg(long)]
        index: Option<IndexCode>,

        /// Number of companies to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Sort key: marketCap, change, pe or symbol
        #[arg(long, default_value = "marketCap")]
        sort: SortBy,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare sectors side by side
    Compare {
        /// Sector labels
        #[arg(required = true)]
        names: Vec<String>,

        /// Index to compare within (default KSE100)
        #[arg(long)]
        index: Option<IndexCode>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Top gainers, losers and volume leaders of an index
    Performers {
        /// Index to draw from (default KSE100)
        #[arg(long)]
        index: Option<IndexCode>,

        /// Entries per list
        #[arg(long, default_value = "10")]
        count: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Advance/decline activity per sector
    Activity {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn adapter_config(cli: &Cli) -> AdapterConfig {
    let mut config = AdapterConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(secs) = cli.timeout {
        config.fetch = config.fetch.with_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = cli.retries {
        config.fetch = config.fetch.with_max_retries(retries);
    }
    config
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let adapter = DpsAdapter::new(adapter_config(&cli))?;

    match cli.command {
        Commands::Companies {
            sector,
            index,
            page,
            limit,
            no_fundamentals,
            format,
        } => {
            let filter = CompanyFilter {
                sector,
                index,
                page: Some(page),
                limit,
                with_fundamentals: !no_fundamentals,
            };
            let pb = spinner("Loading listings...");
            let response = adapter.get_companies(&filter).await;
            pb.finish_and_clear();
            emit(&response?, format)?;
        }
        Commands::Sectors { index, format } => {
            let pb = spinner("Loading index constituents and fundamentals...");
            let breakdown = adapter.get_sector_breakdown(index).await;
            pb.finish_and_clear();
            emit(&breakdown?, format)?;
        }
        Commands::Company { symbol, format } => {
            let pb = spinner(&format!("Loading {}...", symbol.to_uppercase()));
            let analytics = adapter.get_company_analytics(&symbol).await;
            pb.finish_and_clear();
            match analytics? {
                Some(analytics) => emit(&analytics, format)?,
                None => return Err(format!("{} is not a listed symbol", symbol).into()),
            }
        }
        Commands::Sector {
            name,
            index,
            limit,
            sort,
            format,
        } => {
            let pb = spinner(&format!("Ranking {}...", name));
            let response = adapter.get_sector_companies(&name, index, limit, sort).await;
            pb.finish_and_clear();
            let response = response?;
            if response.total == 0 {
                eprintln!("No companies found in sector '{}'", name);
            }
            emit(&response, format)?;
        }
        Commands::Compare {
            names,
            index,
            format,
        } => {
            let pb = spinner("Loading sector breakdown...");
            let rollups = adapter.compare_sectors(&names, index).await;
            pb.finish_and_clear();
            let rollups = rollups?;
            if rollups.len() < names.len() {
                eprintln!("Matched {} of {} sectors", rollups.len(), names.len());
            }
            let comparison = SectorBreakdownResponse::new(rollups, Utc::now());
            emit(&comparison, format)?;
        }
        Commands::Performers {
            index,
            count,
            format,
        } => {
            let pb = spinner("Loading index constituents...");
            let performers = adapter.get_performers(index, count).await;
            pb.finish_and_clear();
            let performers = performers?;
            if performers.is_empty() {
                eprintln!("No movers found for {}", performers.index);
            }
            emit(&performers, format)?;
        }
        Commands::Activity { format } => {
            let activity = adapter.get_sector_activity().await?;
            emit(&activity, format)?;
        }
    }

    tracing::debug!(stats = ?adapter.cache_stats().await, "session cache");
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn emit<T>(value: &T, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>>
where
    T: Exporter + TextReport,
{
    let output = match format {
        OutputFormat::Text => value.to_ascii_table(),
        OutputFormat::Markdown => value.to_markdown(),
        OutputFormat::Json => value.export_to_string(ExportFormat::PrettyJson)?,
        OutputFormat::Csv => value.export_to_string(ExportFormat::Csv)?,
    };
    println!("{}", output);
    Ok(())
}
