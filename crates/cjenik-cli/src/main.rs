mod chains;
mod search;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cjenik")]
#[command(about = "Find the cheapest product across Croatian retailer price lists")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every configured chain by name pattern or barcode
    Search {
        /// Name pattern; `*` matches any run, `?` one character (up to 6)
        #[arg(short = 't', long = "term")]
        terms: Vec<String>,
        /// Exact barcode; takes precedence over terms
        #[arg(short, long)]
        barcode: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Hide products without a price
        #[arg(long)]
        priced_only: bool,
    },
    /// List the configured chains and their column mappings
    Chains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads `.env` before the process environment.
    let config = cjenik_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let chains = chains::load_configured_chains(&config)?;

    match cli.command {
        Commands::Search {
            terms,
            barcode,
            format,
            priced_only,
        } => {
            search::run_search(
                &config,
                chains,
                &terms,
                barcode.as_deref(),
                format,
                priced_only,
            )
            .await?;
        }
        Commands::Chains => chains::run_chains(&chains),
    }

    Ok(())
}
