//! topcharts CLI
//!
//! Polls the top-app charts and answers chart-position lookups from the
//! local data directory.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use topcharts::{
    error::{AppError, Result},
    lookup::{ChartIndex, PositionFilter},
    models::{Config, Pricing},
    pipeline,
    services::FeedClient,
    storage::LocalStorage,
};

/// topcharts - Top App Charts Poller
#[derive(Parser, Debug)]
#[command(name = "topcharts", version, about = "Top App Charts Poller")]
struct Cli {
    /// Path to the data directory holding snapshots and config.toml
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll every configured chart and rebuild the apps index
    Update,

    /// Print an app's current chart position(s)
    Positions {
        /// Bundle identifier (e.g. fr.lemonde.matin)
        bundle_id: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Check whether an app holds any matching top position
    IsTop {
        /// Bundle identifier
        bundle_id: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Validate configuration
    Validate,

    /// Show data directory info
    Info,
}

/// Optional position filter flags shared by the query commands.
#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Restrict to one country code (e.g. fr)
    #[arg(long)]
    country: Option<String>,

    /// Restrict to one pricing tier (paid or free)
    #[arg(long)]
    pricing: Option<String>,

    /// Restrict to one genre name (e.g. games)
    #[arg(long)]
    genre: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> Result<PositionFilter> {
        let pricing = self
            .pricing
            .map(|p| {
                Pricing::parse(&p)
                    .ok_or_else(|| AppError::validation(format!("Unknown pricing '{}'", p)))
            })
            .transpose()?;

        Ok(PositionFilter {
            country_code: self.country,
            pricing,
            genre: self.genre,
        })
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.data_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    match cli.command {
        Command::Update => {
            config.validate()?;

            log::info!(
                "topcharts update starting: {} store fronts, {} genres, {} pricings",
                config.store_fronts.len(),
                config.genres.len(),
                config.pricings.len()
            );

            let config = Arc::new(config);
            let client = FeedClient::new(Arc::clone(&config))?;
            let storage = LocalStorage::new(&cli.data_dir);

            let summary = pipeline::run_update(&config, &client, &storage).await?;

            // Status line consumed by scheduled-run tooling.
            println!("status={}", summary.status);
        }

        Command::Positions { bundle_id, filter } => {
            let index = ChartIndex::load(&cli.data_dir)?;
            match index.positions(&bundle_id, &filter.into_filter()?) {
                Some(positions) => {
                    println!("{}", serde_json::to_string_pretty(&positions)?);
                }
                None => {
                    println!("null");
                }
            }
        }

        Command::IsTop { bundle_id, filter } => {
            let index = ChartIndex::load(&cli.data_dir)?;
            println!("{}", index.is_top(&bundle_id, &filter.into_filter()?));
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "Config OK: {} charts per update run",
                config.chart_count()
            );
        }

        Command::Info => {
            log::info!("Data directory: {}", cli.data_dir.display());

            match ChartIndex::load(&cli.data_dir) {
                Ok(index) => log::info!("Apps index: {} bundle ids", index.len()),
                Err(_) => log::info!("Apps index: not found (run 'update' first)"),
            }

            let stats_path = cli.data_dir.join("stats.json");
            if let Ok(content) = std::fs::read_to_string(&stats_path) {
                if let Ok(summary) = serde_json::from_str::<serde_json::Value>(&content) {
                    if let Some(finished) = summary.get("finished_at") {
                        log::info!("Last update: {}", finished);
                    }
                    if let Some(status) = summary.get("status") {
                        log::info!("Last status: {}", status);
                    }
                }
            } else {
                log::info!("No update run recorded yet.");
            }
        }
    }

    Ok(())
}
