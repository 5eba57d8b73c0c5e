use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{api_client, output_empty_collection, print_table, require_session};
use crate::cli::OutputFormat;
use crate::models::AreaKind;
use crate::views::{AreaListView, DEFAULT_PAGE_SIZE};

#[derive(Subcommand)]
pub enum AreaCommands {
    #[command(about = "List chieftainships, headmanships or villageships")]
    List {
        #[arg(help = "chieftainships, headmanships or villageships")]
        kind: AreaKind,
        #[arg(long, help = "Fetch a single area by id")]
        id: Option<String>,
        #[arg(long, help = "Province filter")]
        province: Option<String>,
        #[arg(long, help = "Search by name")]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
}

pub async fn handle(cmd: AreaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = require_session(&[])?;

    match cmd {
        AreaCommands::List {
            kind,
            id,
            province,
            search,
            page,
            page_size,
        } => {
            let api = api_client(Some(session))?;
            let areas = api.list_areas(kind, id.as_deref(), None).await?;
            let mut view = AreaListView::new(kind, areas).with_page_size(page_size);
            if let Some(province) = province {
                view.set_province(province);
            }
            if let Some(search) = search {
                view.set_search(search);
            }
            view.set_page(page);

            let items = view.page_items();
            if items.is_empty() {
                return output_empty_collection(
                    &output_format,
                    kind.collection(),
                    &format!("No {} found", kind.collection()),
                );
            }

            let stats = view.stats();
            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "page": view.page(),
                        "total_pages": view.total_pages(),
                        "stats": {
                            "total": stats.total,
                            "active": stats.active,
                            "inactive": stats.inactive,
                            "households": stats.households,
                        },
                        kind.collection(): items,
                    }))?
                ),
                OutputFormat::Text => {
                    println!(
                        "{}s: {} total, {} active, {} households",
                        kind.label(),
                        stats.total,
                        stats.active,
                        stats.households
                    );
                    let rows: Vec<Vec<String>> = items
                        .iter()
                        .map(|area| {
                            vec![
                                area.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                                area.display_name(kind).to_string(),
                                area.province.clone().unwrap_or_default(),
                                area.district.clone().unwrap_or_default(),
                                area.status.clone().unwrap_or_default(),
                            ]
                        })
                        .collect();
                    print_table(&["ID", "NAME", "PROVINCE", "DISTRICT", "STATUS"], &rows);
                    println!("Page {} of {}", view.page(), view.total_pages());
                }
            }
            Ok(())
        }
    }
}
