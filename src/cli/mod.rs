pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Parser)]
#[command(name = "murojaat")]
#[command(about = "Murojaat CLI - Admin command line for the e-Murojaat backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout and session information")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Admin accounts, region scope and permissions (owner only)")]
    Admins {
        #[command(subcommand)]
        cmd: commands::admins::AdminCommands,
    },

    #[command(about = "Region directory management (owner only)")]
    Regions {
        #[command(subcommand)]
        cmd: commands::regions::RegionCommands,
    },

    #[command(about = "Citizen requests")]
    Requests {
        #[command(subcommand)]
        cmd: commands::submissions::RequestCommands,
    },

    #[command(about = "Service availability reports")]
    Reports {
        #[command(subcommand)]
        cmd: commands::submissions::ReportCommands,
    },

    #[command(about = "MSK household-service orders")]
    Msk {
        #[command(subcommand)]
        cmd: commands::submissions::MskCommands,
    },

    #[command(about = "Request types, services and MSK categories (owner only)")]
    Catalog {
        #[command(subcommand)]
        cmd: commands::catalog::CatalogCommands,
    },

    #[command(about = "Statistics and regional drill-down")]
    Stats {
        #[command(subcommand)]
        cmd: commands::stats::StatsCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format.clone()).await,
        Commands::Admins { cmd } => commands::admins::handle(cmd, output_format.clone()).await,
        Commands::Regions { cmd } => commands::regions::handle(cmd, output_format.clone()).await,
        Commands::Requests { cmd } => commands::submissions::handle_requests(cmd, output_format.clone()).await,
        Commands::Reports { cmd } => commands::submissions::handle_reports(cmd, output_format.clone()).await,
        Commands::Msk { cmd } => commands::submissions::handle_msk(cmd, output_format.clone()).await,
        Commands::Catalog { cmd } => commands::catalog::handle(cmd, output_format.clone()).await,
        Commands::Stats { cmd } => commands::stats::handle(cmd, output_format.clone()).await,
    };

    // JSON callers get a machine-readable failure on stdout as well
    if let (Err(e), OutputFormat::Json) = (&result, &output_format) {
        let code = e.downcast_ref::<ClientError>().map(ClientError::error_code);
        utils::output_error(&output_format, &e.to_string(), code)?;
    }

    result
}
