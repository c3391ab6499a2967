mod content;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cosmo_cms::CmsClient;
use cosmo_core::ImageResolver;

#[derive(Debug, Parser)]
#[command(name = "cosmo-cli")]
#[command(about = "Inspect cosmetology site content in the CMS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List services as shown on service cards
    Services {
        /// Print full descriptions instead of the card excerpt
        #[arg(long)]
        full: bool,
    },
    /// Show the detail page content of one service
    Service {
        /// Service slug (e.g. chistka-lica)
        slug: String,
    },
    /// Print the alphabetical service catalog
    Catalog,
    /// Search services by title or description
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },
    /// List portfolio works and how each is displayed
    Works,
    /// List all service slugs
    Slugs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = cosmo_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cms = CmsClient::new(&config)?;
    let resolver = ImageResolver::new(config.cms_base_url.clone());

    match cli.command {
        Commands::Services { full } => content::run_services(&cms, full).await,
        Commands::Service { slug } => content::run_service(&cms, &resolver, &slug).await,
        Commands::Catalog => content::run_catalog(&cms).await,
        Commands::Search { query } => content::run_search(&cms, &query).await,
        Commands::Works => content::run_works(&cms, &resolver).await,
        Commands::Slugs => content::run_slugs(&cms).await,
    }
}

#[cfg(test)]
mod tests;
