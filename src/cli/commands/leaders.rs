use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{api_client, output_empty_collection, output_success, print_table, relay_client, require_session};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, Attachment, ListQuery, RelayClient};
use crate::models::{DocumentKind, LeaderField, LeaderRole};
use crate::views::{build_hierarchy, DetailView, EditModal, EditValue, LeaderListView, NoticeKind, DEFAULT_PAGE_SIZE};

#[derive(Subcommand)]
pub enum LeaderCommands {
    #[command(about = "List leaders of one role")]
    List {
        #[arg(help = "chiefs, headmen or villageheads")]
        role: LeaderRole,
        #[arg(long, help = "Province filter ('all' for every province)")]
        province: Option<String>,
        #[arg(long, help = "Search text")]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    #[command(about = "Show one leader record")]
    Show {
        role: LeaderRole,
        id: String,
    },

    #[command(about = "Change one field of a leader record")]
    Update {
        role: LeaderRole,
        id: String,
        #[arg(help = "Wire field name, e.g. incumbent or contactnumber")]
        field: LeaderField,
        value: String,
    },

    #[command(about = "Replace a document (picture, chief, headman or ddc)")]
    Document {
        role: LeaderRole,
        id: String,
        kind: DocumentKind,
        #[arg(help = "Local file to upload")]
        path: PathBuf,
    },

    #[command(about = "Show the chief / headman / village head tree")]
    Tree {
        #[arg(long, help = "Only chieftainships starting with this name")]
        chieftainship: Option<String>,
    },
}

pub async fn handle(cmd: LeaderCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = require_session(&[])?;

    match cmd {
        LeaderCommands::List {
            role,
            province,
            search,
            page,
            page_size,
        } => {
            let api = api_client(Some(session))?;
            let records = api.list_leaders(role, &ListQuery::default()).await?;
            let mut view = LeaderListView::new(role, records).with_page_size(page_size);
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
                    role.collection(),
                    &format!("No {} found", role.plural_label().to_lowercase()),
                );
            }

            let stats = view.stats();
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "page": view.page(),
                            "total_pages": view.total_pages(),
                            "stats": {
                                "total": stats.total,
                                "active": stats.active,
                                "inactive": stats.inactive,
                                "provinces": stats.provinces,
                            },
                            role.collection(): items,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}: {} total, {} active, {} inactive, {} provinces",
                        role.plural_label(),
                        stats.total,
                        stats.active,
                        stats.inactive,
                        stats.provinces.len()
                    );
                    let rows: Vec<Vec<String>> = items
                        .iter()
                        .map(|leader| {
                            vec![
                                leader.record_id(role).unwrap_or("-").to_string(),
                                leader.incumbent.clone(),
                                leader.jurisdiction(role).unwrap_or("-").to_string(),
                                leader.province.clone(),
                                leader.get(LeaderField::Status).unwrap_or("-").to_string(),
                            ]
                        })
                        .collect();
                    print_table(&["ID", "INCUMBENT", "JURISDICTION", "PROVINCE", "STATUS"], &rows);
                    println!("Page {} of {}", view.page(), view.total_pages());
                }
            }
            Ok(())
        }
        LeaderCommands::Show { role, id } => {
            let leader = api_client(Some(session))?.get_leader(role, &id).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&leader)?),
                OutputFormat::Text => {
                    let detail = DetailView::new(role, &leader);
                    println!("{}", detail.heading);
                    for section in &detail.sections {
                        println!("\n[{}]", section.title);
                        for (label, value) in &section.rows {
                            println!("  {:<40} {}", label, value);
                        }
                    }
                }
            }
            Ok(())
        }
        LeaderCommands::Update { role, id, field, value } => {
            if let Some(kind) = field.document_kind() {
                return Err(anyhow::anyhow!(
                    "{} is a document; use `tlms leaders document {} {} {} <file>`",
                    field,
                    role.collection(),
                    id,
                    kind.relay_prefix().unwrap_or(kind.wire_name())
                ));
            }
            let relay = relay_client(&session)?;
            let api = api_client(Some(session))?;
            save_field(&api, &relay, role, &id, field, EditValue::Text(value), &output_format).await
        }
        LeaderCommands::Document { role, id, kind, path } => {
            let file = Attachment::from_path(&path).await?;
            let relay = relay_client(&session)?;
            let api = api_client(Some(session))?;
            save_field(&api, &relay, role, &id, kind.field(), EditValue::File(file), &output_format).await
        }
        LeaderCommands::Tree { chieftainship } => {
            let api = api_client(Some(session))?;
            let (chiefs, headmen, village_heads) = futures::try_join!(
                api.get_chiefs(None),
                api.get_headmen(None),
                api.get_village_heads(None),
            )?;
            let tree = build_hierarchy(chiefs, headmen, village_heads, chieftainship.as_deref());

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
                OutputFormat::Text => {
                    for node in &tree.chiefs {
                        println!(
                            "{} - {}",
                            node.chief.get(LeaderField::Chieftainship).unwrap_or("-"),
                            node.chief.incumbent
                        );
                        for headman in &node.headmen {
                            println!(
                                "  {} - {}",
                                headman.headman.get(LeaderField::Headmanship).unwrap_or("-"),
                                headman.headman.incumbent
                            );
                            for village_head in &headman.village_heads {
                                println!(
                                    "    {} - {}",
                                    village_head.jurisdiction(LeaderRole::VillageHead).unwrap_or("-"),
                                    village_head.incumbent
                                );
                            }
                        }
                    }
                    if !tree.unassigned_headmen.is_empty() || !tree.unassigned_village_heads.is_empty() {
                        println!(
                            "\n{} headmen and {} village heads not linked to a chief",
                            tree.unassigned_headmen.len(),
                            tree.unassigned_village_heads.len()
                        );
                    }
                }
            }
            Ok(())
        }
    }
}

async fn save_field(
    api: &ApiClient,
    relay: &RelayClient,
    role: LeaderRole,
    id: &str,
    field: LeaderField,
    value: EditValue,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let record = api.get_leader(role, id).await?;
    let mut modal = EditModal::open(role, record)
        .ok_or_else(|| anyhow::anyhow!("{} record has no {}", role, role.id_field()))?;
    modal.begin(field);

    let notice = modal.save(api, relay, value).await;
    match notice.kind {
        NoticeKind::Success => output_success(
            output_format,
            &notice.message,
            Some(json!({ field.as_str(): modal.record().get(field) })),
        ),
        NoticeKind::Error => Err(anyhow::anyhow!(notice.message)),
    }
}
