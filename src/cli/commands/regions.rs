use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{Region, RegionInput};
use crate::permission::Section;
use crate::types::RegionLevel;

#[derive(Subcommand)]
pub enum RegionCommands {
    #[command(about = "List regions of one level, optionally under a parent")]
    List {
        #[arg(long = "type", help = "Level: region, district, neighborhood or street")]
        level: Option<RegionLevel>,
        #[arg(long, help = "Parent region ID")]
        parent: Option<String>,
    },

    #[command(about = "Picker options for a level given the selected parent")]
    Options {
        #[arg(help = "Level: region, district, neighborhood or street")]
        level: RegionLevel,
        #[arg(long, help = "Selected parent ID")]
        parent: Option<String>,
    },

    #[command(about = "Show one region")]
    Show {
        #[arg(help = "Region ID")]
        id: String,
    },

    #[command(about = "Create a region under a parent of the level above")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type", help = "Level of the new region")]
        level: RegionLevel,
        #[arg(long, help = "Parent region ID (required below the top level)")]
        parent: Option<String>,
    },

    #[command(about = "Rename a region")]
    Rename {
        #[arg(help = "Region ID")]
        id: String,
        #[arg(help = "New name")]
        name: String,
    },

    #[command(about = "Delete a region (children are not checked)")]
    Delete {
        #[arg(help = "Region ID")]
        id: String,
    },
}

fn print_regions(output_format: &OutputFormat, regions: &[Region]) -> anyhow::Result<()> {
    if regions.is_empty() {
        return output_empty_collection(output_format, "regions", "No regions found");
    }
    match output_format {
        OutputFormat::Json => output_json("regions", &regions),
        OutputFormat::Text => {
            println!("{:<26} {:<14} {:<30} {}", "ID", "TYPE", "NAME", "PARENT");
            println!("{}", "-".repeat(96));
            for r in regions {
                println!(
                    "{:<26} {:<14} {:<30} {}",
                    r.id,
                    r.level.label(),
                    truncate(&r.name, 30),
                    or_dash(r.parent.as_ref().map(|p| p.name().unwrap_or(p.id())))
                );
            }
            Ok(())
        }
    }
}

pub async fn handle(cmd: RegionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (client, session) = authenticated_client()?;

    // Picker options serve admin scope editing
    let section = match cmd {
        RegionCommands::Options { .. } => Section::Admins,
        _ => Section::Regions,
    };
    require_section(&session.user, section)?;

    match cmd {
        RegionCommands::List { level, parent } => {
            let regions = client.list_regions(level, parent.as_deref()).await?;
            print_regions(&output_format, &regions)
        }
        RegionCommands::Options { level, parent } => {
            let regions = client.region_options(level, parent.as_deref()).await?;
            print_regions(&output_format, &regions)
        }
        RegionCommands::Show { id } => {
            let region = client.get_region(&id).await?;
            match output_format {
                OutputFormat::Json => output_json("region", &region),
                OutputFormat::Text => {
                    println!("ID: {}", region.id);
                    println!("Name: {}", region.name);
                    println!("Type: {}", region.level.label());
                    println!("Parent: {}", or_dash(region.parent_id()));
                    Ok(())
                }
            }
        }
        RegionCommands::Create { name, level, parent } => {
            let region = client.create_region(&RegionInput::new(name, level, parent)).await?;
            output_success(
                &output_format,
                &format!("{} '{}' created", level.label(), region.name),
                Some(json!({ "region": region })),
            )
        }
        RegionCommands::Rename { id, name } => {
            client.rename_region(&id, &name).await?;
            output_success(&output_format, &format!("Region '{}' renamed", id), None)
        }
        RegionCommands::Delete { id } => {
            client.delete_region(&id).await?;
            output_success(&output_format, &format!("Region '{}' deleted", id), None)
        }
    }
}
