use std::time::Duration;

use clap::Subcommand;
use futures::join;
use serde_json::json;

use crate::api::stats::DashboardOverview;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::drilldown::DrillDown;
use crate::error::ClientResult;
use crate::models::{CountItem, DashboardStats, Heatmap, Period, RegionStatsItem, Trends};
use crate::permission::{has_module_access, Section};
use crate::types::Module;
use crate::ApiClient;

const WEEKDAYS: [&str; 7] = ["Du", "Se", "Ch", "Pa", "Ju", "Sh", "Ya"];

#[derive(Subcommand)]
pub enum StatsCommands {
    #[command(about = "Dashboard counters and widgets")]
    Dashboard {
        #[arg(long, default_value = "30d", help = "7d, 30d, 90d or 1y")]
        period: Period,
        #[arg(long, help = "Redraw on the configured refresh interval until Ctrl-C")]
        watch: bool,
    },

    #[command(about = "Submission trends over a period")]
    Trends {
        #[arg(long, default_value = "30d", help = "7d, 30d, 90d or 1y")]
        period: Period,
        #[arg(long, help = "Limit to one module")]
        module: Option<Module>,
    },

    #[command(about = "Regional statistics, drilling down through the given IDs")]
    Regional {
        #[arg(long = "path", help = "Region IDs to drill into, top-down (repeatable)")]
        path: Vec<String>,
    },

    #[command(about = "Totals per top-level region")]
    ByRegion {
        #[arg(long, help = "Days back (defaults to STATS_DEFAULT_DAYS)")]
        days: Option<u32>,
    },

    #[command(about = "Day-by-hour activity heatmap")]
    Heatmap {
        #[arg(long, default_value = "requests")]
        module: Module,
        #[arg(long, help = "Days back (defaults to STATS_DEFAULT_DAYS)")]
        days: Option<u32>,
    },

    #[command(about = "Breakdown by request category, service and MSK category")]
    Breakdown {
        #[arg(long, help = "Days back (defaults to STATS_DEFAULT_DAYS)")]
        days: Option<u32>,
    },
}

fn print_counters(stats: &DashboardStats) {
    println!(
        "Requests: {}   Service reports: {}   MSK orders: {}",
        stats.requests.total, stats.service_reports.total, stats.msk_orders.total
    );
    println!(
        "Today: {}   Yesterday: {}",
        stats.requests.today + stats.service_reports.today + stats.msk_orders.today,
        stats.requests.yesterday + stats.service_reports.yesterday + stats.msk_orders.yesterday
    );
    println!(
        "Pending: {}   In review: {}   Rejected: {}   Resolved: {}",
        stats.total_pending(),
        stats.total_in_review(),
        stats.total_rejected(),
        stats.resolved_percent()
    );
}

fn print_trends(trends: &Trends) {
    println!("{:<12} {:>9} {:>9} {:>9}", "DATE", "REQUESTS", "REPORTS", "MSK");
    for (label, requests, reports, msk) in trends.rows() {
        println!("{:<12} {:>9} {:>9} {:>9}", label, requests, reports, msk);
    }
}

fn print_counts(title: &str, items: &[CountItem]) {
    println!("{}", title);
    if items.is_empty() {
        println!("  —");
    }
    for item in items {
        println!("  {:<30} {:>6}", truncate(item.label(), 30), item.total);
    }
}

fn print_regions(items: &[RegionStatsItem]) {
    println!("{:<30} {:>9} {:>9} {:>9} {:>7}", "NAME", "REQUESTS", "REPORTS", "MSK", "TOTAL");
    for item in items {
        println!(
            "{:<30} {:>9} {:>9} {:>9} {:>7}",
            truncate(&item.name, 30),
            item.requests,
            item.service_reports,
            item.msk_orders,
            item.total
        );
    }
}

fn print_heatmap(heatmap: &Heatmap) {
    let grid = heatmap.grid();
    print!("    ");
    for hour in 0..24 {
        print!("{:>4}", hour);
    }
    println!();
    for (day, row) in grid.iter().enumerate() {
        print!("{:<4}", WEEKDAYS[day]);
        for count in row {
            print!("{:>4}", count);
        }
        println!();
    }
}

/// Print one widget or note why it is missing; widgets never fail the command
fn widget<T>(title: &str, result: &ClientResult<T>, render: impl FnOnce(&T)) {
    match result {
        Ok(value) => render(value),
        Err(e) => println!("{}: unavailable ({})", title, e.user_message()),
    }
}

fn widget_json<T: serde::Serialize>(result: &ClientResult<T>) -> serde_json::Value {
    match result {
        Ok(value) => json!(value),
        Err(e) => json!({ "error": e.user_message(), "error_code": e.error_code() }),
    }
}

fn render_overview(output_format: &OutputFormat, overview: &DashboardOverview) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(
            "dashboard",
            &json!({
                "counters": widget_json(&overview.counters),
                "derived": overview.counters.as_ref().ok().map(|c| json!({
                    "pending": c.total_pending(),
                    "in_review": c.total_in_review(),
                    "rejected": c.total_rejected(),
                    "resolved_percent": c.resolved_percent(),
                })),
                "trends": widget_json(&overview.trends),
                "regions": widget_json(&overview.regions),
                "categories": widget_json(&overview.categories),
                "services": widget_json(&overview.services),
                "msk_categories": widget_json(&overview.msk_categories),
                "heatmap": widget_json(&overview.heatmap),
            }),
        ),
        OutputFormat::Text => {
            widget("Counters", &overview.counters, print_counters);
            println!();
            widget("Trends", &overview.trends, print_trends);
            println!();
            widget("Districts", &overview.regions, |r| print_regions(r.entries()));
            println!();
            widget("Categories", &overview.categories, |c| print_counts("Request categories", &c.by_category));
            widget("Services", &overview.services, |s| print_counts("Services", &s.services));
            widget("MSK categories", &overview.msk_categories, |m| {
                print_counts("MSK categories", &m.categories)
            });
            println!();
            widget("Heatmap", &overview.heatmap, print_heatmap);
            Ok(())
        }
    }
}

async fn regional(client: &ApiClient, admin: &crate::models::Admin, path: Vec<String>) -> anyhow::Result<DrillDown> {
    let mut drill = DrillDown::for_admin(admin);
    let ticket = drill.refresh();
    drill.load(client, ticket).await?;

    for id in path {
        let item = drill
            .latest()
            .and_then(|s| s.entries().iter().find(|i| i.id.as_deref() == Some(id.as_str())))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("'{}' is not listed at the {} level", id, drill.items_level().label()))?;
        let ticket = drill.drill_down(&item)?;
        drill.load(client, ticket).await?;
    }
    Ok(drill)
}

fn require_module(admin: &crate::models::Admin, module: Module) -> anyhow::Result<()> {
    if has_module_access(admin, module) {
        Ok(())
    } else {
        Err(anyhow::anyhow!("No access to {}", module.title()))
    }
}

pub async fn handle(cmd: StatsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (client, session) = authenticated_client()?;
    require_section(&session.user, Section::Statistics)?;
    let default_days = config().stats.default_days;

    match cmd {
        StatsCommands::Dashboard { period, watch } => {
            if !watch {
                let overview = client.dashboard_overview(period).await;
                return render_overview(&output_format, &overview);
            }

            let every = Duration::from_secs(config().stats.refresh_interval_secs.max(1));
            let mut ticker = tokio::time::interval(every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let overview = client.dashboard_overview(period).await;
                        if overview.counters.as_ref().is_err_and(|e| e.is_session_expired()) {
                            return Err(anyhow::anyhow!("Session expired, please log in again"));
                        }
                        render_overview(&output_format, &overview)?;
                        if let OutputFormat::Text = output_format {
                            println!("{}", "=".repeat(40));
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            Ok(())
        }
        StatsCommands::Trends { period, module } => {
            if let Some(m) = module {
                require_module(&session.user, m)?;
            }
            let trends = client.trends(period, module).await?;
            match output_format {
                OutputFormat::Json => output_json("trends", &trends),
                OutputFormat::Text => {
                    print_trends(&trends);
                    Ok(())
                }
            }
        }
        StatsCommands::Regional { path } => {
            let drill = regional(&client, &session.user, path).await?;
            let entries = drill.latest().map(|s| s.entries()).unwrap_or(&[]);
            match output_format {
                OutputFormat::Json => output_json(
                    "regional",
                    &json!({
                        "breadcrumbs": drill.breadcrumbs(),
                        "level": drill.items_level(),
                        "terminal": drill.is_terminal(),
                        "items": entries,
                    }),
                ),
                OutputFormat::Text => {
                    let mut trail: Vec<String> = Vec::new();
                    if drill.offers_root() {
                        trail.push("Barcha hududlar".to_string());
                    }
                    trail.extend(drill.breadcrumbs().iter().map(|c| c.name.clone()));
                    println!("{}", trail.join(" > "));
                    println!("Level: {}", drill.items_level().label());
                    if entries.is_empty() {
                        println!("No data at this level");
                        return Ok(());
                    }
                    print_regions(entries);
                    if drill.is_terminal() {
                        println!("(street level, nothing further to drill into)");
                    }
                    Ok(())
                }
            }
        }
        StatsCommands::ByRegion { days } => {
            let stats = client.stats_by_region(days.unwrap_or(default_days)).await?;
            match output_format {
                OutputFormat::Json => output_json("by_region", &stats),
                OutputFormat::Text => {
                    if stats.entries().is_empty() {
                        println!("No regional data");
                    } else {
                        print_regions(stats.entries());
                    }
                    Ok(())
                }
            }
        }
        StatsCommands::Heatmap { module, days } => {
            require_module(&session.user, module)?;
            let heatmap = client.heatmap(module, days.unwrap_or(default_days)).await?;
            match output_format {
                OutputFormat::Json => output_json("heatmap", &heatmap),
                OutputFormat::Text => {
                    print_heatmap(&heatmap);
                    Ok(())
                }
            }
        }
        StatsCommands::Breakdown { days } => {
            let days = days.unwrap_or(default_days);
            let (categories, services, msk) = join!(
                client.stats_by_category(days),
                client.stats_by_service(days),
                client.stats_by_msk_category(days),
            );
            match output_format {
                OutputFormat::Json => output_json(
                    "breakdown",
                    &json!({
                        "categories": widget_json(&categories),
                        "services": widget_json(&services),
                        "msk_categories": widget_json(&msk),
                    }),
                ),
                OutputFormat::Text => {
                    widget("Categories", &categories, |c| print_counts("Request categories", &c.by_category));
                    widget("Services", &services, |s| print_counts("Services", &s.services));
                    widget("MSK categories", &msk, |m| print_counts("MSK categories", &m.categories));
                    Ok(())
                }
            }
        }
    }
}
