use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{Catalog, CatalogInput};
use crate::permission::Section;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CatalogKind {
    RequestTypes,
    Services,
    MskCategories,
}

impl From<CatalogKind> for Catalog {
    fn from(kind: CatalogKind) -> Self {
        match kind {
            CatalogKind::RequestTypes => Catalog::RequestTypes,
            CatalogKind::Services => Catalog::Services,
            CatalogKind::MskCategories => Catalog::MskCategories,
        }
    }
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    #[command(about = "List catalog entries")]
    List {
        #[arg(value_enum)]
        kind: CatalogKind,
    },

    #[command(about = "Create a catalog entry")]
    Create {
        #[arg(value_enum)]
        kind: CatalogKind,
        #[arg(long)]
        name: String,
        #[arg(long, help = "Icon name (services and MSK categories)")]
        icon: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Update a catalog entry")]
    Update {
        #[arg(value_enum)]
        kind: CatalogKind,
        #[arg(help = "Entry ID")]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Delete a catalog entry")]
    Delete {
        #[arg(value_enum)]
        kind: CatalogKind,
        #[arg(help = "Entry ID")]
        id: String,
    },
}

fn section(catalog: Catalog) -> Section {
    match catalog {
        Catalog::RequestTypes => Section::RequestTypes,
        Catalog::Services => Section::Services,
        Catalog::MskCategories => Section::MskCategories,
    }
}

pub async fn handle(cmd: CatalogCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (client, session) = authenticated_client()?;

    match cmd {
        CatalogCommands::List { kind } => {
            let catalog = Catalog::from(kind);
            require_section(&session.user, section(catalog))?;
            let items = client.list_catalog(catalog).await?;
            if items.is_empty() {
                return output_empty_collection(&output_format, "items", &format!("{}: empty", catalog.title()));
            }
            match output_format {
                OutputFormat::Json => output_json("items", &items),
                OutputFormat::Text => {
                    println!("{}", catalog.title());
                    println!("{:<26} {:<30} {:<14} {}", "ID", "NAME", "ICON", "DESCRIPTION");
                    println!("{}", "-".repeat(96));
                    for item in &items {
                        println!(
                            "{:<26} {:<30} {:<14} {}",
                            item.id,
                            truncate(&item.name, 30),
                            or_dash(item.icon.as_deref()),
                            truncate(or_dash(item.description.as_deref()), 40)
                        );
                    }
                    Ok(())
                }
            }
        }
        CatalogCommands::Create {
            kind,
            name,
            icon,
            description,
        } => {
            let catalog = Catalog::from(kind);
            require_section(&session.user, section(catalog))?;
            let input = CatalogInput { name, icon, description };
            client.create_catalog_item(catalog, &input).await?;
            output_success(
                &output_format,
                &format!("'{}' added to {}", input.name.trim(), catalog.title()),
                Some(json!({ "name": input.name.trim() })),
            )
        }
        CatalogCommands::Update {
            kind,
            id,
            name,
            icon,
            description,
        } => {
            let catalog = Catalog::from(kind);
            require_section(&session.user, section(catalog))?;
            let input = CatalogInput { name, icon, description };
            client.update_catalog_item(catalog, &id, &input).await?;
            output_success(&output_format, &format!("Entry '{}' updated", id), None)
        }
        CatalogCommands::Delete { kind, id } => {
            let catalog = Catalog::from(kind);
            require_section(&session.user, section(catalog))?;
            client.delete_catalog_item(catalog, &id).await?;
            output_success(&output_format, &format!("Entry '{}' deleted", id), None)
        }
    }
}
