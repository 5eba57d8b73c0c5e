use chrono::Local;
use clap::Subcommand;

use crate::cli::utils::{api_client, print_table, require_session};
use crate::cli::OutputFormat;
use crate::models::{LeaderField, LeaderRole};

#[derive(Subcommand)]
pub enum ReportCommands {
    #[command(about = "Appointments made this calendar month")]
    Monthly,
}

pub async fn handle(cmd: ReportCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = require_session(&[])?;

    match cmd {
        ReportCommands::Monthly => {
            let api = api_client(Some(session))?;
            let report = api.monthly_appointments(Local::now().date_naive()).await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    println!(
                        "Appointments {} to {}: {}",
                        report.start,
                        report.end,
                        report.total()
                    );
                    let groups = [
                        (LeaderRole::Chief, &report.chiefs),
                        (LeaderRole::Headman, &report.headmen),
                        (LeaderRole::VillageHead, &report.village_heads),
                    ];
                    let rows: Vec<Vec<String>> = groups
                        .iter()
                        .flat_map(|(role, leaders)| {
                            leaders.iter().map(move |leader| {
                                vec![
                                    role.label().to_string(),
                                    leader.incumbent.clone(),
                                    leader.jurisdiction(*role).unwrap_or("-").to_string(),
                                    leader.get(LeaderField::DateOfAppointment).unwrap_or("-").to_string(),
                                ]
                            })
                        })
                        .collect();
                    print_table(&["ROLE", "INCUMBENT", "JURISDICTION", "APPOINTED"], &rows);
                }
            }
            Ok(())
        }
    }
}
