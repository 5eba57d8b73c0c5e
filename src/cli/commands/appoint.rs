use anyhow::Context;
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::cli::utils::{api_client, output_success, relay_client, require_session};
use crate::cli::OutputFormat;
use crate::client::Attachment;
use crate::models::{DocumentKind, LeaderDraft, LeaderRole};
use crate::workflow::{AppointmentWizard, Step};

#[derive(Args)]
pub struct AppointArgs {
    #[arg(help = "chief, headman or villagehead")]
    pub role: LeaderRole,

    #[arg(long, help = "JSON file with the appointment fields, keyed by wire name")]
    pub data: PathBuf,

    #[arg(long = "doc", value_parser = parse_doc, help = "Document as <slot>=<path>, e.g. ddc=./form.pdf")]
    pub docs: Vec<(DocumentKind, PathBuf)>,
}

fn parse_doc(raw: &str) -> Result<(DocumentKind, PathBuf), String> {
    let (kind, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <slot>=<path>, got '{}'", raw))?;
    Ok((kind.parse()?, PathBuf::from(path)))
}

pub async fn handle(args: AppointArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = require_session(&["admin"])?;

    let raw = std::fs::read_to_string(&args.data).with_context(|| format!("reading {}", args.data.display()))?;
    let data: Value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", args.data.display()))?;
    let draft = LeaderDraft::from_json(&data).map_err(|e| anyhow::anyhow!(e))?;

    let mut wizard = AppointmentWizard::new(args.role);
    for (field, value) in draft.iter() {
        wizard.set(field, value);
    }
    for (kind, path) in &args.docs {
        let file = Attachment::from_path(path).await?;
        wizard.attach(*kind, file)?;
    }

    // Walk the form the way a clerk would, stopping at the first incomplete step
    while wizard.step() != Step::Documents {
        let step = wizard.step();
        wizard
            .next()
            .with_context(|| format!("step {} ({})", step.number(), step.title()))?;
    }

    let relay = relay_client(&session)?;
    let api = api_client(Some(session))?;
    let created = wizard.submit(&relay, &api).await.map_err(|e| {
        let orphaned = e.orphaned_documents();
        if orphaned.is_empty() {
            anyhow::anyhow!(e.to_string())
        } else {
            let paths: Vec<&str> = orphaned.iter().map(|p| p.as_str()).collect();
            anyhow::anyhow!("{} (uploaded but unused: {})", e, paths.join(", "))
        }
    })?;

    output_success(
        &output_format,
        &format!("{} appointed", args.role),
        Some(json!({ "record": created })),
    )
}
