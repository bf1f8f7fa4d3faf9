use std::sync::Arc;

use anyhow::{bail, Context};
use expense_tracker::domain::aggregation::AggregateTable;
use expense_tracker::domain::{LedgerView, ViewStatus};
use expense_tracker::services::init_logging;
use expense_tracker::state::NotificationLevel;
use expense_tracker::{ApiClient, ClientConfig, LedgerApp};
use shared::{month_name, Period};
use tracing::info;

/// Period from the optional `MONTH YEAR` arguments, else the current month
fn parse_period_args() -> anyhow::Result<Period> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(Period::current()),
        [month, year] => {
            let month = month.parse::<u32>().with_context(|| format!("Invalid month '{}'", month))?;
            let year = year.parse::<i32>().with_context(|| format!("Invalid year '{}'", year))?;
            Period::new(month, year).with_context(|| format!("Month must be between 1 and 12, got {}", month))
        }
        _ => bail!("Usage: expense-tracker [MONTH YEAR]"),
    }
}

fn print_table(title: &str, table: &AggregateTable) {
    println!("\n{}", title);
    for row in table.rows() {
        println!("  {:<24} {:>12.2}", row.key, row.total);
    }
}

fn print_view(view: &LedgerView) {
    if let Some(period) = view.period {
        println!("Expenses for {} {}", month_name(period.month()), period.year());
    }

    match &view.status {
        ViewStatus::Loading => println!("Loading..."),
        ViewStatus::Empty { message } => println!("{}", message),
        ViewStatus::Ready => {
            println!("{:<16} {:<16} {:<24} {:>10}  {}", "User", "Category", "Name", "Amount", "Month");
            for row in &view.rows {
                println!(
                    "{:<16} {:<16} {:<24} {:>10.2}  {} {}",
                    row.user, row.category, row.name, row.amount, row.month_label, row.year
                );
            }
            print_table("Total by user", &view.summary.by_user);
            print_table("Total by category", &view.summary.by_category);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::load()?;
    init_logging(&config.log_filter);
    match ClientConfig::source() {
        Some(path) => info!("⚙️ Loaded configuration from {}", path),
        None => info!("⚙️ Using default configuration"),
    }

    let period = parse_period_args()?;
    info!("🔌 Using remote store at {}", config.base_url);

    let client = ApiClient::from_config(&config)?;
    let app = LedgerApp::with_period(Arc::new(client), period);

    // Failures are reported through the notification queue below
    let _ = app.initialize().await;

    print_view(&app.view());

    for notification in app.drain_notifications() {
        if notification.level == NotificationLevel::Error {
            eprintln!("❌ {}", notification.message);
        }
    }

    Ok(())
}
