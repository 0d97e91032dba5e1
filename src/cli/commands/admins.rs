use clap::Subcommand;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{item_ids, Admin, AdminInput, AdminUpdate, Catalog};
use crate::permission::{ModulePermission, Permissions, Section};
use crate::region::{resolve_chain_cancellable, RegionChain};
use crate::types::{Module, RegionLevel};
use crate::ApiClient;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "List admin accounts")]
    List,

    #[command(about = "Show one admin")]
    Show {
        #[arg(help = "Admin ID")]
        id: String,
    },

    #[command(about = "Create an admin account")]
    Create {
        #[arg(long, help = "Phone number with country code")]
        phone: String,
        #[arg(long, help = "Initial password")]
        password: String,
        #[arg(long, help = "Alias shown in the dashboard")]
        alias: String,
        #[arg(long, default_value = "", help = "First name")]
        first_name: String,
        #[arg(long, default_value = "", help = "Last name")]
        last_name: String,
    },

    #[command(about = "Update profile fields; the password changes only when given")]
    Update {
        #[arg(help = "Admin ID")]
        id: String,
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long, help = "Activate or deactivate the account")]
        active: Option<bool>,
        #[arg(long, default_value = "", help = "New password")]
        password: String,
    },

    #[command(about = "Delete an admin account")]
    Delete {
        #[arg(help = "Admin ID")]
        id: String,
    },

    #[command(about = "Show the resolved region scope of an admin")]
    Region {
        #[arg(help = "Admin ID")]
        id: String,
    },

    #[command(about = "Restrict an admin to a region subtree, picking levels top-down")]
    Assign {
        #[arg(help = "Admin ID")]
        id: String,
        #[arg(long, help = "Region (viloyat) ID")]
        region: Option<String>,
        #[arg(long, help = "District (tuman) ID")]
        district: Option<String>,
        #[arg(long, help = "Neighborhood (mahalla) ID")]
        neighborhood: Option<String>,
        #[arg(long, help = "Street (ko'cha) ID")]
        street: Option<String>,
        #[arg(long, conflicts_with_all = ["region", "district", "neighborhood", "street"], help = "Remove the restriction")]
        clear: bool,
    },

    #[command(about = "Show module permissions of an admin")]
    Permissions {
        #[arg(help = "Admin ID")]
        id: String,
    },

    #[command(about = "Edit one module's permission and save it")]
    Permit {
        #[arg(help = "Admin ID")]
        id: String,
        #[arg(long, help = "Module: requests, services or msk")]
        module: Module,
        #[arg(long, help = "Module on/off switch")]
        enable: Option<bool>,
        #[arg(long, help = "Edit-rights switch (false = read only)")]
        manage: Option<bool>,
        #[arg(long = "toggle", help = "Flip one allowed item (repeatable)")]
        toggle: Vec<String>,
        #[arg(long, help = "Allow every item again")]
        select_all: bool,
    },
}

fn print_admin(admin: &Admin) {
    println!("ID: {}", admin.id);
    println!("Phone: {}", admin.phone);
    println!("Alias: {}", or_dash(admin.alias.as_deref()));
    println!(
        "Name: {} {}",
        or_dash(admin.first_name.as_deref()),
        admin.last_name.as_deref().unwrap_or("")
    );
    println!("Role: {:?}", admin.role);
    println!("Active: {}", if admin.is_active { "yes" } else { "no" });
}

fn describe_permission(p: &ModulePermission) -> String {
    let items = if p.allowed.is_unrestricted() {
        "all items".to_string()
    } else {
        format!("{} selected", p.allowed.to_ids().len())
    };
    format!("{:<18} {}", p.access.label(), items)
}

fn print_permissions(output_format: &OutputFormat, permissions: &Permissions) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json("permissions", permissions),
        OutputFormat::Text => {
            for m in Module::ALL {
                println!("{:<20} {}", m.title(), describe_permission(permissions.get(m)));
            }
            Ok(())
        }
    }
}

/// Build the picker chain top-down, accepting only ids offered at each level
async fn pick_chain(client: &ApiClient, picks: [Option<String>; 4]) -> anyhow::Result<RegionChain> {
    let mut chain = RegionChain::default();
    for (level, pick) in RegionLevel::ALL.into_iter().zip(picks) {
        let Some(id) = pick else { continue };
        if let Some(parent_level) = level.parent() {
            if chain.get(parent_level).is_none() {
                return Err(anyhow::anyhow!(
                    "Select a {} before choosing a {}",
                    parent_level.label(),
                    level.label()
                ));
            }
        }
        let options = client.region_options(level, chain.parent_for(level)).await?;
        if !options.iter().any(|r| r.id == id) {
            return Err(anyhow::anyhow!("'{}' is not a {} under the selected parent", id, level.label()));
        }
        chain.select(level, Some(&id));
    }
    Ok(chain)
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (client, session) = authenticated_client()?;
    require_section(&session.user, Section::Admins)?;

    match cmd {
        AdminCommands::List => {
            let admins = client.list_admins().await?;
            if admins.is_empty() {
                return output_empty_collection(&output_format, "admins", "No admins found");
            }
            match output_format {
                OutputFormat::Json => output_json("admins", &admins)?,
                OutputFormat::Text => {
                    println!("{:<26} {:<16} {:<20} {:<8} {:<7} {}", "ID", "PHONE", "ALIAS", "ROLE", "ACTIVE", "SCOPE");
                    println!("{}", "-".repeat(95));
                    for a in &admins {
                        let scope = a
                            .assigned_region
                            .as_ref()
                            .map(|r| r.region_type.label())
                            .unwrap_or("all");
                        println!(
                            "{:<26} {:<16} {:<20} {:<8} {:<7} {}",
                            a.id,
                            a.phone,
                            truncate(or_dash(a.alias.as_deref()), 20),
                            format!("{:?}", a.role).to_lowercase(),
                            if a.is_active { "yes" } else { "no" },
                            scope
                        );
                    }
                }
            }
            Ok(())
        }
        AdminCommands::Show { id } => {
            let admin = client.get_admin(&id).await?;
            match output_format {
                OutputFormat::Json => output_json("admin", &admin),
                OutputFormat::Text => {
                    print_admin(&admin);
                    print_permissions(&output_format, &admin.permissions)
                }
            }
        }
        AdminCommands::Create {
            phone,
            password,
            alias,
            first_name,
            last_name,
        } => {
            let input = AdminInput {
                phone,
                password,
                alias,
                first_name,
                last_name,
            };
            let admin = client.create_admin(&input).await?;
            output_success(
                &output_format,
                &format!("Admin '{}' created", admin.display_name()),
                Some(json!({ "admin": admin })),
            )
        }
        AdminCommands::Update {
            id,
            alias,
            first_name,
            last_name,
            active,
            password,
        } => {
            let update = AdminUpdate {
                alias,
                first_name,
                last_name,
                is_active: active,
                password: None,
            }
            .with_password(&password);
            client.update_admin(&id, &update).await?;
            output_success(&output_format, &format!("Admin '{}' updated", id), None)
        }
        AdminCommands::Delete { id } => {
            client.delete_admin(&id).await?;
            output_success(&output_format, &format!("Admin '{}' deleted", id), None)
        }
        AdminCommands::Region { id } => {
            let admin = client.get_admin(&id).await?;
            // Ctrl-C abandons the walk
            let cancel = CancellationToken::new();
            let watcher = tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                }
            });
            let chain = resolve_chain_cancellable(&client, admin.assigned_region.as_ref(), &cancel).await;
            watcher.abort();
            let chain = chain?;
            match output_format {
                OutputFormat::Json => output_json("region_chain", &chain),
                OutputFormat::Text => {
                    if chain.is_empty() {
                        println!("No region restriction");
                    }
                    for level in RegionLevel::ALL {
                        println!("{:<10} {}", level.label(), or_dash(chain.get(level)));
                    }
                    Ok(())
                }
            }
        }
        AdminCommands::Assign {
            id,
            region,
            district,
            neighborhood,
            street,
            clear,
        } => {
            let chain = if clear {
                RegionChain::default()
            } else {
                pick_chain(&client, [region, district, neighborhood, street]).await?
            };
            let assigned = chain.selected();
            client.set_admin_region(&id, assigned.as_ref()).await?;

            let message = match &assigned {
                Some(a) => format!("Admin '{}' restricted to {} {}", id, a.region_type.label(), or_dash(a.region_id())),
                None => format!("Admin '{}' has no region restriction", id),
            };
            output_success(&output_format, &message, Some(json!({ "assignedRegion": assigned })))
        }
        AdminCommands::Permissions { id } => {
            let admin = client.get_admin(&id).await?;
            print_permissions(&output_format, &admin.permissions)
        }
        AdminCommands::Permit {
            id,
            module,
            enable,
            manage,
            toggle,
            select_all,
        } => {
            let admin = client.get_admin(&id).await?;
            let mut permissions = admin.permissions.clone();
            {
                let permission = permissions.get_mut(module);
                if let Some(enable) = enable {
                    permission.set_enabled(enable);
                }
                if let Some(manage) = manage {
                    permission.set_manage(manage);
                }
                if select_all {
                    permission.select_all();
                }
                if !toggle.is_empty() {
                    let items = client.list_catalog(Catalog::for_module(module)).await?;
                    let all = item_ids(&items);
                    for item in &toggle {
                        permission.toggle_item(item, &all)?;
                    }
                }
            }

            client.set_admin_permissions(&id, &permissions).await?;
            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Permissions saved",
                    Some(json!({ "permissions": permissions })),
                ),
                OutputFormat::Text => {
                    println!("✓ Permissions saved");
                    print_permissions(&output_format, &permissions)
                }
            }
        }
    }
}
