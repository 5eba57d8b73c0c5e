use serde_json::{json, Value};
use std::time::Duration;

use crate::auth::{Access, RouteGuard, Session, SessionStore};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, RelayClient};
use crate::config;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print rows as aligned columns
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers.to_vec()));
    println!("{}", line(widths.iter().map(|_| "").collect()).replace(' ', "-"));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

/// Run the route guard and turn a refusal into a command error.
pub fn require_session(allowed_roles: &[&str]) -> anyhow::Result<Session> {
    let store = SessionStore::open_default()?;
    match RouteGuard::new(&store).check(allowed_roles)? {
        Access::Granted(session) => Ok(session),
        Access::Login => Err(anyhow::anyhow!(
            "Not logged in or session expired. Run `tlms auth login <username>`"
        )),
        Access::Home => Err(anyhow::anyhow!(
            "This command requires one of the roles: {}",
            allowed_roles.join(", ")
        )),
    }
}

pub fn api_client(session: Option<Session>) -> anyhow::Result<ApiClient> {
    let client = ApiClient::from_config(&config::config().client)?;
    Ok(match session {
        Some(session) => client.with_session(session),
        None => client,
    })
}

pub fn relay_client(session: &Session) -> anyhow::Result<RelayClient> {
    let client_config = &config::config().client;
    let relay = RelayClient::new(
        &client_config.relay_url,
        Duration::from_secs(client_config.request_timeout_secs),
    )?;
    Ok(relay.with_token(session.token()))
}

/// Use the given secret, or prompt for it on the terminal without echo.
pub fn secret_or_prompt(provided: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = provided {
        return Ok(value);
    }

    let value = rpassword::prompt_password(format!("{}: ", prompt))?;
    let value = value.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        return Err(anyhow::anyhow!("{} is required", prompt));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provided_secret_skips_prompt() {
        let secret = secret_or_prompt(Some("hunter2".into()), "Password").unwrap();
        assert_eq!(secret, "hunter2");
    }
}
