use clap::Subcommand;
use serde_json::json;
use tracing::info;

use crate::api::auth::LOGIN_FAILED;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::models::Admin;
use crate::permission::{is_managed, stats_tabs, visible_modules, StatsTab};
use crate::types::Module;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with phone and password")]
    Login {
        #[arg(help = "Phone number, any formatting (e.g. +998 90 123 45 67)")]
        phone: String,
        #[arg(long, env = "MUROJAAT_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Clear the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current admin and the modules they can open")]
    Whoami {
        #[arg(long, help = "Reload the profile from the backend first")]
        refresh: bool,
    },
}

fn tab_name(tab: StatsTab) -> &'static str {
    match tab {
        StatsTab::Requests => "requests",
        StatsTab::Services => "services",
        StatsTab::Msk => "msk",
        StatsTab::Regional => "regional",
    }
}

fn print_profile(output_format: &OutputFormat, admin: &Admin) -> anyhow::Result<()> {
    let modules = visible_modules(admin);
    let tabs: Vec<&str> = stats_tabs(admin).into_iter().map(tab_name).collect();

    match output_format {
        OutputFormat::Json => {
            let access: Vec<_> = modules
                .iter()
                .map(|m| json!({ "module": m, "manage": is_managed(admin, *m) }))
                .collect();
            output_json(
                "admin",
                &json!({
                    "profile": admin,
                    "modules": access,
                    "stats_tabs": tabs,
                }),
            )?;
        }
        OutputFormat::Text => {
            println!("Admin: {} ({})", admin.display_name(), admin.phone);
            println!("Role: {:?}", admin.role);
            match &admin.assigned_region {
                Some(assigned) => println!(
                    "Region scope: {} {}",
                    assigned.region_type.label(),
                    or_dash(assigned.region.as_ref().map(|r| r.name().unwrap_or(r.id())))
                ),
                None => println!("Region scope: all"),
            }
            println!("Modules:");
            for m in Module::ALL {
                let state = if !modules.contains(&m) {
                    "hidden"
                } else if is_managed(admin, m) {
                    "manage"
                } else {
                    "read"
                };
                println!("  {:<20} {}", m.title(), state);
            }
            println!("Statistics tabs: {}", tabs.join(", "));
        }
    }
    Ok(())
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { phone, password } => {
            let client = anonymous_client()?;
            let session = match client.login(&phone, &password).await {
                Ok(session) => session,
                Err(e @ ClientError::Validation { .. }) => return Err(e.into()),
                Err(e) => return Err(anyhow::anyhow!(e.user_message_or(LOGIN_FAILED))),
            };
            session_store()?.save(&session)?;
            info!(base_url = client.base_url(), "login stored");

            output_success(
                &output_format,
                &format!("Logged in as {}", session.user.display_name()),
                Some(json!({ "user": session.user })),
            )
        }
        AuthCommands::Logout => {
            session_store()?.clear()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let session = session_store()?.load()?;
            match output_format {
                OutputFormat::Json => output_json(
                    "session",
                    &json!({
                        "authenticated": session.is_some(),
                        "admin": session.as_ref().map(|s| &s.user.id),
                        "role": session.as_ref().map(|s| s.user.role),
                    }),
                ),
                OutputFormat::Text => {
                    match session {
                        Some(s) => println!("Logged in as {} ({:?})", s.user.display_name(), s.user.role),
                        None => println!("Not logged in"),
                    }
                    Ok(())
                }
            }
        }
        AuthCommands::Whoami { refresh } => {
            let (client, session) = authenticated_client()?;
            let session = if refresh {
                let fresh = client.refresh_session(&session).await?;
                session_store()?.save(&fresh)?;
                fresh
            } else {
                session
            };
            print_profile(&output_format, &session.user)
        }
    }
}
