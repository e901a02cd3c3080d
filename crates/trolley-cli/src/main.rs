mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "trolley")]
#[command(about = "Grocery price comparison operations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run migrations and seed stores and the category taxonomy.
    Seed {
        /// Path to the stores YAML file.
        #[arg(long, default_value = "./config/stores.yaml")]
        stores: PathBuf,
    },
    /// Import a specials feed JSON document.
    Ingest {
        /// Path to the feed file.
        feed: PathBuf,
    },
    /// Backfill categories for specials the ingest couldn't place.
    Categorize {
        /// Classify and report without writing anything.
        #[arg(long)]
        dry_run: bool,
        /// Maximum number of specials to process.
        #[arg(long, default_value_t = 1000)]
        limit: i64,
    },
    /// Evaluate active alerts against each product's current cheapest price.
    CheckAlerts,
    /// Print the cross-store price comparison for a product.
    Compare {
        product_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let pool = trolley_db::connect_pool_from_env().await?;

    match cli.command {
        Commands::Seed { stores } => commands::seed(&pool, &stores).await,
        Commands::Ingest { feed } => commands::ingest(&pool, &feed).await,
        Commands::Categorize { dry_run, limit } => {
            commands::categorize(&pool, dry_run, limit).await
        }
        Commands::CheckAlerts => commands::check_alerts(&pool).await,
        Commands::Compare { product_id } => commands::compare(&pool, product_id).await,
    }
}
