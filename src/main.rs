use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dealscout::{
    configuration::get_configuration,
    startup::{run_advisory_scrape, run_deal_scrape, DealMode},
};
use env_logger::Env;

#[derive(Parser)]
#[command(
    name = "dealscout",
    about = "Scrape private-equity deal listings and advisory-firm directories into spreadsheets",
    version
)]
struct Cli {
    /// Configuration file (defaults to ./configuration.yaml if present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search each firm, open its deals page and extract listings
    Search {
        /// CSV export URL or path of the firm sheet
        #[arg(long)]
        sheet: Option<String>,
        /// Output spreadsheet (.xlsx or .csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Open each firm's listing link from the sheet and extract listings
    Links {
        /// CSV export URL or path of the firm sheet
        #[arg(long)]
        sheet: Option<String>,
        /// Output spreadsheet (.xlsx or .csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Scrape the advisory-firm directory, repeating on the configured interval
    Advisory {
        /// Scrape once and exit
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let mut configuration = get_configuration(cli.config.as_deref())?;

    match cli.command {
        Commands::Search { sheet, output } => {
            if let Some(sheet) = sheet {
                configuration.sheet.source = sheet;
            }
            let output =
                output.unwrap_or_else(|| PathBuf::from(&configuration.deals.search_output));
            run_deal_scrape(&configuration, DealMode::Search, output).await?;
        }
        Commands::Links { sheet, output } => {
            if let Some(sheet) = sheet {
                configuration.sheet.source = sheet;
            }
            let output = output.unwrap_or_else(|| PathBuf::from(&configuration.deals.links_output));
            run_deal_scrape(&configuration, DealMode::Links, output).await?;
        }
        Commands::Advisory { once } => {
            run_advisory_scrape(configuration.advisory, once).await?;
        }
    }

    Ok(())
}
