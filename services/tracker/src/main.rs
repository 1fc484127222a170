use anyhow::Result;
use std::env;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use tracker::stats::{BudgetStatus, ExpenseSummary, daily_budget};
use tracker::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    info!("Starting money manager tracker");

    let config = AppConfig::load()?;
    let state = AppState::connect(&config).await?;

    if state.session.access_token().await?.is_none() {
        let (Ok(email), Ok(password)) = (
            env::var("MONEY_MANAGER_EMAIL"),
            env::var("MONEY_MANAGER_PASSWORD"),
        ) else {
            anyhow::bail!("No stored session; set MONEY_MANAGER_EMAIL and MONEY_MANAGER_PASSWORD");
        };

        if let Err(e) = state.expenses.login(&email, &password).await {
            error!("Login failed: {}", e.user_message());
            return Err(e.into());
        }
    }

    match state.expenses.list_all_expenses().await {
        Ok(expenses) => {
            let summary = ExpenseSummary::from_expenses(&expenses);
            info!(
                "{} expenses, total ${:.2}, average ${:.2}",
                summary.count, summary.total, summary.average
            );
            for category in &summary.by_category {
                info!("  {}: ${:.2}", category.category, category.total);
            }

            if let Some(profile) = state.expenses.current_profile().await? {
                match BudgetStatus::evaluate(summary.total, daily_budget(&profile)) {
                    BudgetStatus::NoBudget => info!("No budget configured"),
                    BudgetStatus::Exceeded { over } => warn!("Budget exceeded by ${:.2}", over),
                    BudgetStatus::NearLimit { percent_used } => {
                        warn!("{}% of the daily budget used", percent_used)
                    }
                    BudgetStatus::WithinBudget { remaining } => {
                        info!("${:.2} left in the daily budget", remaining)
                    }
                }
            }
        }
        Err(e) => error!("Could not load expenses: {}", e.user_message()),
    }

    info!(
        "{} unread notifications",
        state.notifications.unread_count()
    );

    Ok(())
}
