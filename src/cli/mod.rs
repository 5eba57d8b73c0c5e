pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tlms")]
#[command(about = "Traditional leadership records - appointments, records and documents")]
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
    #[command(about = "Login, logout and account recovery")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and edit chiefs, headmen and village heads")]
    Leaders {
        #[command(subcommand)]
        cmd: commands::leaders::LeaderCommands,
    },

    #[command(about = "Appoint a new leader (admin only)")]
    Appoint(commands::appoint::AppointArgs),

    #[command(about = "Chieftainships, headmanships and villageships")]
    Areas {
        #[command(subcommand)]
        cmd: commands::areas::AreaCommands,
    },

    #[command(about = "Appointment reports")]
    Report {
        #[command(subcommand)]
        cmd: commands::report::ReportCommands,
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

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Leaders { cmd } => commands::leaders::handle(cmd, output_format).await,
        Commands::Appoint(args) => commands::appoint::handle(args, output_format).await,
        Commands::Areas { cmd } => commands::areas::handle(cmd, output_format).await,
        Commands::Report { cmd } => commands::report::handle(cmd, output_format).await,
    }
}
