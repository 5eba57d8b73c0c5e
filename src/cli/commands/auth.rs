use chrono::{Duration, Utc};
use clap::Subcommand;
use serde_json::json;
use tracing::info;

use crate::auth::{Session, SessionStore};
use crate::cli::utils::{api_client, output_success, secret_or_prompt};
use crate::cli::OutputFormat;
use crate::config;
use crate::models::SignupRequest;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and store the session")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Register a new user account")]
    Signup {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Phone number")]
        phone_number: String,
        #[arg(long, help = "Province")]
        province: String,
        #[arg(long, help = "District")]
        district: String,
        #[arg(long, help = "Role", default_value = "user")]
        role: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Request a password reset email")]
    ForgotPassword {
        #[arg(help = "Account email")]
        email: String,
    },

    #[command(about = "Set a new password using a reset token")]
    ResetPassword {
        #[arg(help = "Reset token from the email link")]
        token: String,
        #[arg(help = "New password (will prompt if not provided)")]
        new_password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = secret_or_prompt(password, "Password")?;
            let login = api_client(None)?.login(&username, &password).await?;

            let ttl = Duration::minutes(config::config().session.ttl_minutes);
            let session = Session::from_login(&login, ttl, Utc::now());
            SessionStore::open_default()?.save(&session)?;
            info!("Logged in as {} ({})", session.user().username, session.role());

            output_success(
                &output_format,
                &format!("Logged in as {}", username),
                Some(json!({
                    "user": session.user(),
                    "expires_at": session.expires_at(),
                })),
            )
        }
        AuthCommands::Logout => {
            SessionStore::open_default()?.clear()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let store = SessionStore::open_default()?;
            match store.load()? {
                Some(session) if !session.is_expired() => output_success(
                    &output_format,
                    &format!(
                        "Logged in as {} ({}), expires {}",
                        session.user().username,
                        session.role(),
                        session.expires_at().format("%Y-%m-%d %H:%M UTC")
                    ),
                    Some(json!({
                        "authenticated": true,
                        "user": session.user(),
                        "expires_at": session.expires_at(),
                    })),
                ),
                Some(_) => {
                    store.clear()?;
                    output_success(
                        &output_format,
                        "Session expired",
                        Some(json!({ "authenticated": false, "expired": true })),
                    )
                }
                None => output_success(&output_format, "Not logged in", Some(json!({ "authenticated": false }))),
            }
        }
        AuthCommands::Signup {
            username,
            email,
            phone_number,
            province,
            district,
            role,
            password,
        } => {
            let password = secret_or_prompt(password, "Password")?;
            let request = SignupRequest {
                username,
                email,
                phone_number,
                province,
                district,
                role,
                password,
            };
            let response = api_client(None)?.signup(&request).await?;
            output_success(&output_format, &response.message, None)
        }
        AuthCommands::ForgotPassword { email } => {
            let response = api_client(None)?.forgot_password(&email).await?;
            output_success(&output_format, &response.message, None)
        }
        AuthCommands::ResetPassword { token, new_password } => {
            let new_password = secret_or_prompt(new_password, "New password")?;
            let response = api_client(None)?.reset_password(&token, &new_password).await?;
            output_success(&output_format, &response.message, None)
        }
    }
}
