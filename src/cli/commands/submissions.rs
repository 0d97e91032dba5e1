use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::json;

use crate::api::submissions::{MskOrderFilter, RequestFilter, ServiceReportFilter};
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{Address, Page};
use crate::permission::{is_entity_allowed, Section};
use crate::types::Module;
use crate::workflow::{MskOrderStatus, RequestStatus, ServiceReportStatus, StatusUpdate, SubmissionStatus};

macro_rules! status_args {
    ($name:ident, $status:ty) => {
        /// Arguments of a status change
        #[derive(Args)]
        pub struct $name {
            #[arg(help = "Submission ID")]
            pub id: String,
            #[arg(long, help = "Current status")]
            pub from: $status,
            #[arg(long, help = "New status")]
            pub to: $status,
            #[arg(long, help = "Rejection reason (required when rejecting)")]
            pub reason: Option<String>,
        }
    };
}

status_args!(RequestStatusArgs, RequestStatus);
status_args!(ReportStatusArgs, ServiceReportStatus);
status_args!(MskStatusArgs, MskOrderStatus);

#[derive(Subcommand)]
pub enum RequestCommands {
    #[command(about = "List citizen requests")]
    List {
        #[arg(long)]
        status: Option<RequestStatus>,
        #[arg(long, help = "Category filter")]
        category: Option<String>,
        #[arg(long = "type", help = "Request type ID")]
        request_type: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    #[command(about = "Statuses a request can move to")]
    Transitions {
        #[arg(help = "Current status")]
        from: RequestStatus,
    },

    #[command(about = "Change the status of a request")]
    Status {
        #[command(flatten)]
        change: RequestStatusArgs,
        #[arg(long, help = "Closing note kept when resolving")]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    #[command(about = "List service reports")]
    List {
        #[arg(long, help = "Service ID")]
        service: Option<String>,
        #[arg(long)]
        status: Option<ServiceReportStatus>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    #[command(about = "Statuses a report can move to")]
    Transitions {
        #[arg(help = "Current status")]
        from: ServiceReportStatus,
    },

    #[command(about = "Change the status of a service report")]
    Status {
        #[command(flatten)]
        change: ReportStatusArgs,
    },
}

#[derive(Subcommand)]
pub enum MskCommands {
    #[command(about = "List MSK orders")]
    List {
        #[arg(long)]
        status: Option<MskOrderStatus>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    #[command(about = "Statuses an order can move to")]
    Transitions {
        #[arg(help = "Current status")]
        from: MskOrderStatus,
    },

    #[command(about = "Change the status of an MSK order")]
    Status {
        #[command(flatten)]
        change: MskStatusArgs,
    },
}

/// One printable row of a submission list
struct Row<S> {
    id: String,
    status: S,
    subject: String,
    address: String,
    created: String,
}

fn row<S>(id: &str, status: S, subject: Option<&str>, address: &Address, created: Option<chrono::DateTime<chrono::Utc>>) -> Row<S> {
    Row {
        id: id.to_string(),
        status,
        subject: or_dash(subject).to_string(),
        address: address.label(),
        created: created
            .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "—".to_string()),
    }
}

fn print_page<T: Serialize, S: SubmissionStatus>(
    output_format: &OutputFormat,
    collection: &str,
    page: &Page<T>,
    rows: Vec<Row<S>>,
    current_page: u32,
) -> anyhow::Result<()> {
    if page.data.is_empty() {
        return output_empty_collection(output_format, collection, "Nothing found");
    }
    match output_format {
        OutputFormat::Json => output_json(collection, page),
        OutputFormat::Text => {
            println!("{:<26} {:<22} {:<24} {:<17} {}", "ID", "STATUS", "SUBJECT", "CREATED", "ADDRESS");
            println!("{}", "-".repeat(120));
            for r in rows {
                println!(
                    "{:<26} {:<22} {:<24} {:<17} {}",
                    r.id,
                    r.status.label(),
                    truncate(&r.subject, 24),
                    r.created,
                    truncate(&r.address, 60)
                );
            }
            let total = page.total.map(|t| format!(" ({} total)", t)).unwrap_or_default();
            println!("Page {} of {}{}", page.page.unwrap_or(current_page), page.pages.max(1), total);
            Ok(())
        }
    }
}

fn print_transitions<S: SubmissionStatus>(output_format: &OutputFormat, from: S) -> anyhow::Result<()> {
    let targets = from.targets();
    match output_format {
        OutputFormat::Json => output_json(
            "transitions",
            &json!({ "from": from, "to": targets, "editable": from.is_editable() }),
        ),
        OutputFormat::Text => {
            if targets.is_empty() {
                println!("{} is final, no further changes", from.label());
            }
            for t in targets {
                let extra = if t.is_rejected() { " (reason required)" } else { "" };
                println!("{} -> {}{}", from.as_str(), t.as_str(), extra);
            }
            Ok(())
        }
    }
}

fn status_changed<S: SubmissionStatus>(output_format: &OutputFormat, id: &str, update: &StatusUpdate<S>) -> anyhow::Result<()> {
    output_success(
        output_format,
        &format!("Status of '{}' set to {}", id, update.status().label()),
        Some(json!({ "id": id, "update": update })),
    )
}

pub async fn handle_requests(cmd: RequestCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RequestCommands::Transitions { from } => print_transitions(&output_format, from),
        RequestCommands::List {
            status,
            category,
            request_type,
            page,
        } => {
            let (client, session) = authenticated_client()?;
            require_section(&session.user, Section::Requests)?;
            if let Some(t) = &request_type {
                if !is_entity_allowed(&session.user, Module::Requests, t) {
                    return Err(anyhow::anyhow!("Request type '{}' is not allowed for this admin", t));
                }
            }

            let filter = RequestFilter {
                status,
                category,
                request_type,
                page: Some(page),
            };
            let result = client.list_requests(&filter).await?;
            let rows = result
                .data
                .iter()
                .map(|r| {
                    let subject = r
                        .request_type
                        .as_ref()
                        .and_then(|t| t.name())
                        .or(r.category.as_deref());
                    row(&r.id, r.status, subject, &r.address, r.created_at)
                })
                .collect();
            print_page(&output_format, "requests", &result, rows, page)
        }
        RequestCommands::Status { change, note } => {
            // Validated before any network call
            let update = StatusUpdate::validate(change.from, change.to, change.reason.as_deref(), note.as_deref())?;
            let (client, session) = authenticated_client()?;
            require_section(&session.user, Section::Requests)?;
            require_managed(&session.user, Module::Requests)?;
            client.update_request_status(&change.id, &update).await?;
            status_changed(&output_format, &change.id, &update)
        }
    }
}

pub async fn handle_reports(cmd: ReportCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ReportCommands::Transitions { from } => print_transitions(&output_format, from),
        ReportCommands::List { service, status, page } => {
            let (client, session) = authenticated_client()?;
            require_section(&session.user, Section::ServiceReports)?;
            if let Some(s) = &service {
                if !is_entity_allowed(&session.user, Module::Services, s) {
                    return Err(anyhow::anyhow!("Service '{}' is not allowed for this admin", s));
                }
            }

            let filter = ServiceReportFilter {
                service_id: service,
                status,
                page: Some(page),
            };
            let result = client.list_service_reports(&filter).await?;
            let rows = result
                .data
                .iter()
                .map(|r| {
                    let subject = r.service.as_ref().and_then(|s| s.name());
                    row(&r.id, r.status, subject, &r.address, r.created_at)
                })
                .collect();
            print_page(&output_format, "service_reports", &result, rows, page)
        }
        ReportCommands::Status { change } => {
            let update = StatusUpdate::validate(change.from, change.to, change.reason.as_deref(), None)?;
            let (client, session) = authenticated_client()?;
            require_section(&session.user, Section::ServiceReports)?;
            require_managed(&session.user, Module::Services)?;
            client.update_service_report_status(&change.id, &update).await?;
            status_changed(&output_format, &change.id, &update)
        }
    }
}

pub async fn handle_msk(cmd: MskCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MskCommands::Transitions { from } => print_transitions(&output_format, from),
        MskCommands::List { status, page } => {
            let (client, session) = authenticated_client()?;
            require_section(&session.user, Section::MskOrders)?;

            let filter = MskOrderFilter {
                status,
                page: Some(page),
            };
            let result = client.list_msk_orders(&filter).await?;
            let rows = result
                .data
                .iter()
                .map(|o| {
                    let subject = o.category.as_ref().and_then(|c| c.name());
                    row(&o.id, o.status, subject, &o.address, o.created_at)
                })
                .collect();
            print_page(&output_format, "msk_orders", &result, rows, page)
        }
        MskCommands::Status { change } => {
            let update = StatusUpdate::validate(change.from, change.to, change.reason.as_deref(), None)?;
            let (client, session) = authenticated_client()?;
            require_section(&session.user, Section::MskOrders)?;
            require_managed(&session.user, Module::Msk)?;
            client.update_msk_order_status(&change.id, &update).await?;
            status_changed(&output_format, &change.id, &update)
        }
    }
}
