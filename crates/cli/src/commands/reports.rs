//! Read-only reporting commands: dashboard, transactions, users,
//! revenue and profit analytics.

use std::path::Path;

use chrono::NaiveDate;

use agrolink_core::ProfitSource;

use agrolink_admin_client::list::ListQuery;

use super::{CliError, bootstrap_admin};

/// Show the dashboard KPIs and the action queue.
#[allow(clippy::print_stdout)]
pub async fn dashboard() -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let stats = context.api.dashboard_stats().await?;

    println!("KPIs (last 30 days)");
    println!("  Revenue:          Rp{}", stats.kpis.total_revenue_monthly);
    println!("  Pending payouts:  Rp{}", stats.kpis.pending_payouts_total);
    println!("  New users:        {}", stats.kpis.new_users_monthly);
    println!("  Active projects:  {}", stats.kpis.active_projects);
    println!("Action queue");
    println!(
        "  Payouts awaiting transfer:        {}",
        stats.action_queue.pending_payouts
    );
    println!(
        "  Verifications awaiting review:    {}",
        stats.action_queue.pending_verifications
    );
    Ok(())
}

/// List one page of the transaction history.
#[allow(clippy::print_stdout)]
pub async fn transactions(page: u32, limit: u32) -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let result = context
        .api
        .transactions(&ListQuery::new(page, limit))
        .await?;

    println!(
        "Page {} ({} transaction(s) total)",
        result.current_page, result.total_items
    );
    for row in &result.items {
        println!(
            "  {}  {}  {}  Rp{}  {}  [{}]",
            row.transaction_id,
            row.transaction_date.format("%Y-%m-%d %H:%M"),
            row.payer_name,
            row.amount_paid,
            row.payment_method.as_deref().unwrap_or("-"),
            row.status.as_deref().unwrap_or("unknown"),
        );
    }
    Ok(())
}

/// Download the transaction history spreadsheet to `output`.
#[allow(clippy::print_stdout)]
pub async fn export_transactions(output: &Path) -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let bytes = context.api.export_transactions().await?;
    std::fs::write(output, &bytes)?;
    println!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

/// List one page of registered users.
#[allow(clippy::print_stdout)]
pub async fn users(
    page: u32,
    limit: u32,
    search: Option<&str>,
    role: Option<&str>,
) -> Result<(), CliError> {
    let context = bootstrap_admin()?;

    let mut query = ListQuery::new(page, limit);
    if let Some(search) = search {
        query = query.with_filter("search", search);
    }
    if let Some(role) = role {
        query = query.with_filter("role", role);
    }

    let result = context.api.users(&query).await?;
    println!(
        "Page {} ({} user(s) total)",
        result.current_page, result.total_items
    );
    for user in &result.items {
        println!(
            "  {}  {}  <{}>  {}  {}",
            user.id,
            user.name,
            user.email,
            user.role,
            if user.is_active { "active" } else { "inactive" },
        );
    }
    Ok(())
}

/// Show per-role user counts.
#[allow(clippy::print_stdout)]
pub async fn user_stats() -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let stats = context.api.user_role_stats().await?;

    println!("{} user(s) registered", stats.total_users);
    for (role, count) in &stats.by_role {
        println!("  {role}: {count}");
    }
    Ok(())
}

/// Show revenue analytics for the given range.
#[allow(clippy::print_stdout)]
pub async fn revenue(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let data = context.api.revenue_analytics(start, end).await?;

    println!("Total revenue:       Rp{}", data.total_revenue);
    println!("  from services:     Rp{}", data.revenue_by_service);
    println!("  from products:     Rp{}", data.revenue_by_product);
    for point in &data.daily_trend {
        println!("  {}  Rp{}", point.date, point.value);
    }
    Ok(())
}

/// Show profit analytics for the given range and optional source filter.
#[allow(clippy::print_stdout)]
pub async fn profit(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    source: Option<&str>,
) -> Result<(), CliError> {
    let context = bootstrap_admin()?;

    let source = source
        .map(str::parse::<ProfitSource>)
        .transpose()
        .map_err(CliError::InvalidInput)?;

    let data = context.api.profit_analytics(start, end, source).await?;
    println!(
        "Gross Rp{}  Fees Rp{}  Net Rp{}",
        data.total_summary.total_gross_profit,
        data.total_summary.total_gateway_fee,
        data.total_summary.total_net_profit,
    );
    for day in &data.daily_summary {
        println!(
            "  {}  {}  gross Rp{}  net Rp{}",
            day.date,
            day.source_type.as_str(),
            day.total_gross_profit,
            day.total_net_profit,
        );
    }
    Ok(())
}
