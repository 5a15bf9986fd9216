use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::ArtworkClient;
use crate::catalog::CatalogController;
use crate::config::Config;
use crate::tui;
use super::{LogsCommand, PageCommand, SchemaCommand, SelectCommand};

/// artgrid - browse and select artworks from a paginated collection API
#[derive(Parser)]
#[command(
    name = "artgrid",
    version,
    about = "Browse and select artworks from a paginated collection API",
    long_about = r#"artgrid pages through a remote artwork collection, shows each page as a table,
and lets you mark rows as selected across pages.

Examples:
  artgrid                           # Start interactive mode
  artgrid --page 5                  # Start interactive mode on page 5
  artgrid page 3                    # Print page 3 as a table
  artgrid select 40 --from 2        # Select the first 40 rows starting at page 2"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Collection endpoint, overriding configuration
    #[arg(short = 'e', long = "endpoint", global = true)]
    pub endpoint: Option<String>,

    /// Page to open in interactive mode
    #[arg(short = 'p', long = "page", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one page and print it
    Page(PageCommand),

    /// Select the first N rows starting at a page and print their ids
    Select(SelectCommand),

    /// Show the log file written in interactive mode
    Logs(LogsCommand),

    /// Print the configuration JSON schema
    Schema(SchemaCommand),
}

impl Cli {
    /// Whether this invocation runs the full-screen interface
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    /// Load configuration and apply command-line overrides
    pub async fn load_config(&self) -> Result<Config> {
        let mut config = Config::init().await?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        Ok(config)
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }
        debug!("Configuration initialized: {:?}", config);

        match self.command {
            Some(Commands::Page(cmd)) => cmd.execute(&config).await,
            Some(Commands::Select(cmd)) => cmd.execute(&config).await,
            Some(Commands::Logs(cmd)) => cmd.execute(&config).await,
            Some(Commands::Schema(cmd)) => cmd.execute().await,
            None => Self::start_interactive_mode(&config, self.page).await,
        }
    }

    async fn start_interactive_mode(config: &Config, page: u32) -> Result<()> {
        info!("Starting interactive mode against {}", config.endpoint);

        // Validate the configuration
        config.validate()?;

        let client = ArtworkClient::new(config)?;
        let controller = CatalogController::starting_at(Arc::new(client), page);
        tui::run(controller).await?;

        info!("Application finished");
        Ok(())
    }
}
