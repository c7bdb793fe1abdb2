//! Wire payloads for the admin endpoints.
//!
//! Field names mirror the backend's JSON exactly. Verification rows come
//! out of the backend's ORM with PascalCase relation fields, so those are
//! renamed explicitly rather than with a container attribute.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use agrolink_core::{PayoutId, ProfitSource, Role, TransactionId, UserId, VerificationId};

/// Paginated list body nested inside the standard `{data: ...}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    /// Rows for the requested page.
    pub data: Vec<T>,
    /// Page the backend actually served (authoritative).
    pub current_page: u32,
    /// Total rows across all pages (authoritative).
    pub total_items: u64,
}

/// A payout awaiting manual bank transfer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PendingPayout {
    pub payout_id: PayoutId,
    pub payee_name: String,
    /// What kind of account receives the money (farmer, worker, driver).
    pub payee_type: String,
    pub amount: Decimal,
    /// Title of the project or order the payout settles.
    pub context_title: String,
    pub bank_name: String,
    pub bank_account_number: String,
    pub bank_account_holder: String,
}

/// An identity document awaiting review.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PendingVerification {
    pub id: VerificationId,
    #[serde(rename = "DocumentType")]
    pub document_type: String,
    /// URL of the uploaded document image.
    #[serde(rename = "FilePath")]
    pub file_path: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "User")]
    pub user: VerificationUser,
}

/// Owner of a verification document.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VerificationUser {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Role")]
    pub role: Role,
}

/// One settled or pending platform transaction.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TransactionRow {
    pub transaction_id: TransactionId,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: String,
    /// Human-readable description of what was paid for.
    pub context_info: String,
    pub payer_name: String,
    pub amount_paid: Decimal,
    pub payment_method: Option<String>,
    pub status: Option<String>,
}

/// One registered platform user.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-role user counts served by the dedicated stats endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserRoleStats {
    pub total_users: u64,
    /// Role name to count, as the backend aggregates it.
    #[serde(default)]
    pub by_role: std::collections::BTreeMap<String, u64>,
}

/// Everything the dashboard landing page renders.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub kpis: DashboardKpis,
    pub action_queue: ActionQueue,
    #[serde(default)]
    pub revenue_trend: Vec<TrendPoint>,
}

/// Headline numbers for the last 30 days.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DashboardKpis {
    pub total_revenue_monthly: Decimal,
    pub pending_payouts_total: Decimal,
    pub new_users_monthly: u64,
    pub active_projects: u64,
}

/// Counts of items waiting on an admin.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ActionQueue {
    pub pending_payouts: u64,
    pub pending_verifications: u64,
}

/// One point on a date/value chart.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Revenue analytics over a date range.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RevenueAnalytics {
    pub total_revenue: Decimal,
    pub revenue_by_service: Decimal,
    pub revenue_by_product: Decimal,
    #[serde(default)]
    pub daily_trend: Vec<TrendPoint>,
}

/// Profit analytics over a date range, optionally filtered by source.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProfitAnalytics {
    pub total_summary: ProfitSummary,
    #[serde(default)]
    pub daily_summary: Vec<DailyProfit>,
}

/// Aggregate profit numbers for the whole range.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProfitSummary {
    pub total_gross_profit: Decimal,
    pub total_gateway_fee: Decimal,
    pub total_net_profit: Decimal,
}

/// Per-day, per-source profit breakdown row.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub source_type: ProfitSource,
    pub total_gross_profit: Decimal,
    pub total_gateway_fee: Decimal,
    pub total_net_profit: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_verification_parses_orm_casing() {
        let json = serde_json::json!({
            "id": "ver-9",
            "DocumentType": "ktp",
            "FilePath": "https://cdn.example.com/docs/ver-9.jpg",
            "CreatedAt": "2026-08-01T09:30:00Z",
            "User": { "Name": "Budi Santoso", "Role": "farmer" }
        });

        let row: PendingVerification = serde_json::from_value(json).expect("deserialize");
        assert_eq!(row.id.as_str(), "ver-9");
        assert_eq!(row.document_type, "ktp");
        assert_eq!(row.user.role, Role::Farmer);
    }

    #[test]
    fn test_paginated_body_carries_backend_page_numbers() {
        let json = serde_json::json!({
            "data": [{
                "id": "u-1",
                "name": "Siti",
                "email": "siti@example.com",
                "role": "worker",
                "phone_number": null,
                "is_active": true,
                "created_at": "2026-07-15T00:00:00Z"
            }],
            "current_page": 3,
            "total_items": 41
        });

        let page: Paginated<UserRow> = serde_json::from_value(json).expect("deserialize");
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_items, 41);
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn test_profit_analytics_parses_source_breakdown() {
        let json = serde_json::json!({
            "total_summary": {
                "total_gross_profit": "1500000",
                "total_gateway_fee": "45000",
                "total_net_profit": "1455000"
            },
            "daily_summary": [{
                "date": "2026-08-20",
                "source_type": "ecommerce",
                "total_gross_profit": "500000",
                "total_gateway_fee": "15000",
                "total_net_profit": "485000"
            }]
        });

        let analytics: ProfitAnalytics = serde_json::from_value(json).expect("deserialize");
        assert_eq!(analytics.daily_summary[0].source_type, ProfitSource::Ecommerce);
        assert_eq!(
            analytics.total_summary.total_net_profit,
            Decimal::new(1_455_000, 0)
        );
    }
}
