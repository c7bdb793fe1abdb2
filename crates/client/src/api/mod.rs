//! Typed surface over the admin endpoints.
//!
//! [`AdminApi`] owns no state beyond the gateway; it maps each endpoint
//! to typed request/response payloads and adapts list endpoints into
//! [`ListFetcher`]s so every list view runs through the same controller.

mod types;

pub use types::{
    ActionQueue, DailyProfit, DashboardKpis, DashboardStats, Paginated, PendingPayout,
    PendingVerification, ProfitAnalytics, ProfitSummary, RevenueAnalytics, TransactionRow,
    TrendPoint, UserRoleStats, UserRow, VerificationUser,
};

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use agrolink_core::{PayoutId, ProfitSource, ReviewDecision, VerificationId};

use crate::gateway::{GatewayError, HttpGateway};
use crate::list::{ListFetcher, ListQuery, ListResult};
use crate::workflow::EvidenceFile;

const DASHBOARD_STATS_PATH: &str = "/admin/dashboard-stats";
const PENDING_PAYOUTS_PATH: &str = "/admin/payouts/pending";
const PENDING_VERIFICATIONS_PATH: &str = "/admin/verifications/pending";
const TRANSACTIONS_PATH: &str = "/admin/transactions";
const TRANSACTIONS_EXPORT_PATH: &str = "/admin/transactions/export";
const USERS_PATH: &str = "/admin/users";
const USER_STATS_PATH: &str = "/admin/users/stats";
const REVENUE_ANALYTICS_PATH: &str = "/admin/revenue/analytics";
const PROFIT_ANALYTICS_PATH: &str = "/admin/profit/analytics";

/// Multipart field name the payout-completion endpoint expects.
const TRANSFER_PROOF_FIELD: &str = "transfer_proof_file";

/// Body of the verification review request.
#[derive(Debug, Serialize)]
struct ReviewRequest<'a> {
    status: ReviewDecision,
    notes: &'a str,
}

/// Typed client for the protected admin endpoints.
///
/// Cheap to clone; clones share the gateway's connection pool and
/// credential cell.
#[derive(Debug, Clone)]
pub struct AdminApi {
    gateway: HttpGateway,
}

impl AdminApi {
    /// Wrap a gateway.
    #[must_use]
    pub const fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    /// Fetch the dashboard landing-page payload.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, GatewayError> {
        self.gateway.get(DASHBOARD_STATS_PATH, &[]).await
    }

    /// Fetch all payouts awaiting transfer.
    ///
    /// The backend serves this list unpaginated; it is wrapped as a
    /// single page so it runs through the shared list controller.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self))]
    pub async fn pending_payouts(&self) -> Result<ListResult<PendingPayout>, GatewayError> {
        let items: Vec<PendingPayout> = self.gateway.get(PENDING_PAYOUTS_PATH, &[]).await?;
        Ok(ListResult::single_page(items))
    }

    /// Mark a payout as completed, attaching the transfer proof file.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the upload fails or the backend rejects
    /// the completion.
    #[instrument(skip(self, evidence), fields(payout = %payout_id))]
    pub async fn complete_payout(
        &self,
        payout_id: &PayoutId,
        evidence: &EvidenceFile,
    ) -> Result<(), GatewayError> {
        let part = reqwest::multipart::Part::bytes(evidence.bytes.clone())
            .file_name(evidence.file_name.clone())
            .mime_str(&evidence.content_type)
            .map_err(|e| GatewayError::Parse(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(TRANSFER_PROOF_FIELD, part);

        let path = format!("{PENDING_PAYOUTS_PATH_ROOT}/{}/complete", payout_id.as_str());
        let _: serde_json::Value = self.gateway.post_multipart(&path, form).await?;
        Ok(())
    }

    /// Fetch all verification requests awaiting review, as a single page.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self))]
    pub async fn pending_verifications(
        &self,
    ) -> Result<ListResult<PendingVerification>, GatewayError> {
        let items: Vec<PendingVerification> =
            self.gateway.get(PENDING_VERIFICATIONS_PATH, &[]).await?;
        Ok(ListResult::single_page(items))
    }

    /// Approve or reject a verification request.
    ///
    /// The notes requirement for rejections is enforced upstream by the
    /// review workflow; this method sends whatever it is given.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the backend rejects
    /// the review.
    #[instrument(skip(self, notes), fields(verification = %verification_id, status = %status.as_str()))]
    pub async fn review_verification(
        &self,
        verification_id: &VerificationId,
        status: ReviewDecision,
        notes: &str,
    ) -> Result<(), GatewayError> {
        let path = format!(
            "{VERIFICATIONS_PATH_ROOT}/{}/review",
            verification_id.as_str()
        );
        let body = ReviewRequest { status, notes };
        let _: serde_json::Value = self.gateway.post_json(&path, &body).await?;
        Ok(())
    }

    /// Fetch one page of the transaction history.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self, query), fields(page = query.page()))]
    pub async fn transactions(
        &self,
        query: &ListQuery,
    ) -> Result<ListResult<TransactionRow>, GatewayError> {
        let page: Paginated<TransactionRow> = self
            .gateway
            .get(TRANSACTIONS_PATH, &query.to_query_pairs())
            .await?;
        Ok(paginated_to_result(page))
    }

    /// Download the transaction history as a spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self))]
    pub async fn export_transactions(&self) -> Result<Vec<u8>, GatewayError> {
        self.gateway.get_bytes(TRANSACTIONS_EXPORT_PATH, &[]).await
    }

    /// Fetch one page of registered users.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self, query), fields(page = query.page()))]
    pub async fn users(&self, query: &ListQuery) -> Result<ListResult<UserRow>, GatewayError> {
        let page: Paginated<UserRow> =
            self.gateway.get(USERS_PATH, &query.to_query_pairs()).await?;
        Ok(paginated_to_result(page))
    }

    /// Fetch per-role user counts from the dedicated stats endpoint.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self))]
    pub async fn user_role_stats(&self) -> Result<UserRoleStats, GatewayError> {
        self.gateway.get(USER_STATS_PATH, &[]).await
    }

    /// Fetch revenue analytics. With no range the backend defaults to the
    /// last 30 days.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self))]
    pub async fn revenue_analytics(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<RevenueAnalytics, GatewayError> {
        let query = date_range_query(start_date, end_date);
        self.gateway.get(REVENUE_ANALYTICS_PATH, &query).await
    }

    /// Fetch profit analytics, optionally narrowed to one revenue source.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the body does not
    /// parse.
    #[instrument(skip(self))]
    pub async fn profit_analytics(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        source: Option<ProfitSource>,
    ) -> Result<ProfitAnalytics, GatewayError> {
        let mut query = date_range_query(start_date, end_date);
        if let Some(source) = source {
            query.push(("source_type".to_string(), source.as_str().to_string()));
        }
        self.gateway.get(PROFIT_ANALYTICS_PATH, &query).await
    }

    /// Fetcher for the transaction history list.
    #[must_use]
    pub fn transactions_fetcher(&self) -> ListFetcher<TransactionRow> {
        let api = self.clone();
        Arc::new(move |query: ListQuery| {
            let api = api.clone();
            Box::pin(async move { api.transactions(&query).await })
        })
    }

    /// Fetcher for the user list.
    #[must_use]
    pub fn users_fetcher(&self) -> ListFetcher<UserRow> {
        let api = self.clone();
        Arc::new(move |query: ListQuery| {
            let api = api.clone();
            Box::pin(async move { api.users(&query).await })
        })
    }

    /// Fetcher for the pending-payout list. The query is ignored because
    /// the backend serves this list unpaginated.
    #[must_use]
    pub fn pending_payouts_fetcher(&self) -> ListFetcher<PendingPayout> {
        let api = self.clone();
        Arc::new(move |_query: ListQuery| {
            let api = api.clone();
            Box::pin(async move { api.pending_payouts().await })
        })
    }

    /// Fetcher for the pending-verification list. The query is ignored
    /// because the backend serves this list unpaginated.
    #[must_use]
    pub fn pending_verifications_fetcher(&self) -> ListFetcher<PendingVerification> {
        let api = self.clone();
        Arc::new(move |_query: ListQuery| {
            let api = api.clone();
            Box::pin(async move { api.pending_verifications().await })
        })
    }
}

const PENDING_PAYOUTS_PATH_ROOT: &str = "/admin/payouts";
const VERIFICATIONS_PATH_ROOT: &str = "/admin/verifications";

fn paginated_to_result<T>(page: Paginated<T>) -> ListResult<T> {
    ListResult {
        items: page.data,
        current_page: page.current_page,
        total_items: page.total_items,
    }
}

fn date_range_query(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(start) = start_date {
        query.push(("start_date".to_string(), start.to_string()));
    }
    if let Some(end) = end_date {
        query.push(("end_date".to_string(), end.to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_request_wire_shape() {
        let body = ReviewRequest {
            status: ReviewDecision::Rejected,
            notes: "photo is unreadable",
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"status": "rejected", "notes": "photo is unreadable"})
        );
    }

    #[test]
    fn test_date_range_query_omits_unset_bounds() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).expect("date");
        assert_eq!(
            date_range_query(Some(start), None),
            vec![("start_date".to_string(), "2026-08-01".to_string())]
        );
        assert!(date_range_query(None, None).is_empty());
    }

    #[test]
    fn test_paginated_adapts_to_list_result() {
        let page = Paginated {
            data: vec![1, 2, 3],
            current_page: 2,
            total_items: 9,
        };
        let result = paginated_to_result(page);
        assert_eq!(result.items, vec![1, 2, 3]);
        assert_eq!(result.current_page, 2);
        assert_eq!(result.total_items, 9);
    }
}
