//! In-process stub of the AgroLink backend for integration tests.
//!
//! The stub serves the same routes, the same `{data: ...}` envelope, and
//! the same auth behavior as the real API: one known admin account, one
//! known non-admin account, and bearer-token checks on every `/admin`
//! route. Per-route request counters and captured request bodies let
//! tests assert exactly how many calls were made and with what payloads.
//!
//! # Usage
//!
//! ```rust,ignore
//! let server = StubServer::spawn().await;
//! let gateway = HttpGateway::new(server.base_url(), CredentialCell::new());
//! // ... drive the client, then assert on server.counters() ...
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

/// Credentials the stub accepts.
pub const ADMIN_EMAIL: &str = "ops@agrolink.id";
pub const FARMER_EMAIL: &str = "petani@agrolink.id";
pub const PASSWORD: &str = "rahasia-kuat";

/// Token issued to the admin account.
pub const ADMIN_TOKEN: &str = "tok-admin";
/// Token issued to the farmer account. Valid for login, useless for
/// `/admin` routes.
pub const FARMER_TOKEN: &str = "tok-farmer";

/// Bytes served by the transaction export route.
pub const EXPORT_BYTES: &[u8] = b"PK\x03\x04agrolink-spreadsheet";

/// Per-route request counters.
#[derive(Debug, Default)]
pub struct Counters {
    pub login: AtomicUsize,
    pub users: AtomicUsize,
    pub transactions: AtomicUsize,
    pub pending_payouts: AtomicUsize,
    pub complete_payout: AtomicUsize,
    pub pending_verifications: AtomicUsize,
    pub review_verification: AtomicUsize,
    pub export: AtomicUsize,
}

/// Requests the stub has captured for later assertions.
#[derive(Debug, Default)]
pub struct Captured {
    /// Query pairs of each `/admin/users` request, in arrival order.
    pub user_queries: Vec<Vec<(String, String)>>,
    /// Bodies posted to the review route.
    pub review_bodies: Vec<Value>,
    /// Multipart uploads to the payout completion route:
    /// (field name, file name, byte length).
    pub proof_uploads: Vec<(String, String, usize)>,
}

#[derive(Clone)]
struct AppState {
    counters: Arc<Counters>,
    captured: Arc<Mutex<Captured>>,
}

/// A running stub backend bound to an ephemeral local port.
pub struct StubServer {
    addr: SocketAddr,
    counters: Arc<Counters>,
    captured: Arc<Mutex<Captured>>,
}

impl StubServer {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = AppState {
            counters: Arc::new(Counters::default()),
            captured: Arc::new(Mutex::new(Captured::default())),
        };
        let counters = Arc::clone(&state.counters);
        let captured = Arc::clone(&state.captured);

        let api = Router::new()
            .route("/public/auth/login", post(login))
            .route("/admin/dashboard-stats", get(dashboard_stats))
            .route("/admin/users", get(users))
            .route("/admin/users/stats", get(user_stats))
            .route("/admin/transactions", get(transactions))
            .route("/admin/transactions/export", get(export_transactions))
            .route("/admin/payouts/pending", get(pending_payouts))
            .route("/admin/payouts/{id}/complete", post(complete_payout))
            .route("/admin/verifications/pending", get(pending_verifications))
            .route("/admin/verifications/{id}/review", post(review_verification))
            .route("/admin/revenue/analytics", get(revenue_analytics))
            .route("/admin/profit/analytics", get(profit_analytics));
        let app = Router::new().nest("/api/v1", api).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            counters,
            captured,
        }
    }

    /// Base URL including the `/api/v1` prefix, as the client expects.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Per-route request counters.
    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Snapshot of captured request payloads.
    ///
    /// # Panics
    ///
    /// Panics if the capture lock is poisoned.
    #[must_use]
    pub fn captured_review_bodies(&self) -> Vec<Value> {
        self.captured.lock().expect("capture lock").review_bodies.clone()
    }

    /// Multipart uploads seen by the payout completion route.
    ///
    /// # Panics
    ///
    /// Panics if the capture lock is poisoned.
    #[must_use]
    pub fn captured_proof_uploads(&self) -> Vec<(String, String, usize)> {
        self.captured.lock().expect("capture lock").proof_uploads.clone()
    }

    /// Query pairs of every `/admin/users` request.
    ///
    /// # Panics
    ///
    /// Panics if the capture lock is poisoned.
    #[must_use]
    pub fn captured_user_queries(&self) -> Vec<Vec<(String, String)>> {
        self.captured.lock().expect("capture lock").user_queries.clone()
    }
}

fn enveloped(data: Value) -> Response {
    Json(json!({ "data": data })).into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

/// Extract and check the bearer token; only the admin token passes.
fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if token == Some(ADMIN_TOKEN) {
        Ok(())
    } else {
        Err(unauthorized())
    }
}

async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    state.counters.login.fetch_add(1, Ordering::SeqCst);

    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Email atau password salah" })),
        )
            .into_response();
    }

    let (token, id, name, role) = match email {
        ADMIN_EMAIL => (ADMIN_TOKEN, "u-admin-1", "Ops Admin", "admin"),
        FARMER_EMAIL => (FARMER_TOKEN, "u-farmer-1", "Pak Tani", "farmer"),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Email atau password salah" })),
            )
                .into_response();
        }
    };

    enveloped(json!({
        "token": token,
        "user": { "id": id, "name": name, "role": role }
    }))
}

async fn dashboard_stats(headers: HeaderMap) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    enveloped(json!({
        "kpis": {
            "total_revenue_monthly": 12_500_000,
            "pending_payouts_total": 3_200_000,
            "new_users_monthly": 18,
            "active_projects": 7
        },
        "action_queue": { "pending_payouts": 2, "pending_verifications": 1 },
        "revenue_trend": [
            { "date": "2026-08-27", "value": 400_000 },
            { "date": "2026-08-28", "value": 650_000 }
        ]
    }))
}

/// Fixed dataset: three farmers and one worker.
fn user_rows() -> Vec<Value> {
    vec![
        json!({ "id": "u-1", "name": "Budi Santoso", "email": "budi@example.com", "role": "farmer", "phone_number": "0811", "is_active": true, "created_at": "2026-05-01T00:00:00Z" }),
        json!({ "id": "u-2", "name": "Siti Aminah", "email": "siti@example.com", "role": "farmer", "phone_number": null, "is_active": true, "created_at": "2026-06-12T00:00:00Z" }),
        json!({ "id": "u-3", "name": "Joko Susilo", "email": "joko@example.com", "role": "worker", "phone_number": "0812", "is_active": false, "created_at": "2026-07-03T00:00:00Z" }),
        json!({ "id": "u-4", "name": "Tono Wijaya", "email": "tono@example.com", "role": "farmer", "phone_number": null, "is_active": true, "created_at": "2026-07-20T00:00:00Z" }),
    ]
}

async fn users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    state.counters.users.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut captured) = state.captured.lock() {
        captured.user_queries.push(query.clone());
    }

    let find = |name: &str| {
        query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    };
    let page: usize = find("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit: usize = find("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let role = find("role");
    let search = find("search");

    let rows: Vec<Value> = user_rows()
        .into_iter()
        .filter(|row| {
            role.as_deref().is_none_or(|r| {
                row.get("role").and_then(Value::as_str) == Some(r)
            })
        })
        .filter(|row| {
            search.as_deref().is_none_or(|s| {
                row.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| n.to_lowercase().contains(&s.to_lowercase()))
            })
        })
        .collect();

    let total = rows.len();
    let page_rows: Vec<Value> = rows
        .into_iter()
        .skip(page.saturating_sub(1) * limit)
        .take(limit)
        .collect();

    enveloped(json!({
        "data": page_rows,
        "current_page": page,
        "total_items": total
    }))
}

async fn user_stats(headers: HeaderMap) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    enveloped(json!({
        "total_users": 4,
        "by_role": { "farmer": 3, "worker": 1 }
    }))
}

fn transaction_rows() -> Vec<Value> {
    (1..=25)
        .map(|n| {
            json!({
                "transaction_id": format!("trx-{n:03}"),
                "transaction_date": "2026-08-15T10:00:00Z",
                "transaction_type": if n % 2 == 0 { "Jasa" } else { "Produk" },
                "context_info": format!("Order #{n}"),
                "payer_name": "Pembeli",
                "amount_paid": 150_000 + n,
                "payment_method": "qris",
                "status": "paid"
            })
        })
        .collect()
}

async fn transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    state.counters.transactions.fetch_add(1, Ordering::SeqCst);

    let find = |name: &str| {
        query
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.parse::<usize>().ok())
    };
    let page = find("page").unwrap_or(1);
    let limit = find("limit").unwrap_or(10);

    let rows = transaction_rows();
    let total = rows.len();
    let page_rows: Vec<Value> = rows
        .into_iter()
        .skip(page.saturating_sub(1) * limit)
        .take(limit)
        .collect();

    enveloped(json!({
        "data": page_rows,
        "current_page": page,
        "total_items": total
    }))
}

async fn export_transactions(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    state.counters.export.fetch_add(1, Ordering::SeqCst);
    (
        [(header::CONTENT_TYPE, "application/vnd.ms-excel")],
        EXPORT_BYTES.to_vec(),
    )
        .into_response()
}

async fn pending_payouts(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    state.counters.pending_payouts.fetch_add(1, Ordering::SeqCst);
    enveloped(json!([
        {
            "payout_id": "po-101",
            "payee_name": "Budi Santoso",
            "payee_type": "farmer",
            "amount": 750_000,
            "context_title": "Panen Padi Blok A",
            "bank_name": "BRI",
            "bank_account_number": "0012345678",
            "bank_account_holder": "Budi Santoso"
        },
        {
            "payout_id": "po-102",
            "payee_name": "Joko Susilo",
            "payee_type": "worker",
            "amount": 250_000,
            "context_title": "Upah Tanam Mingguan",
            "bank_name": "BCA",
            "bank_account_number": "8876543210",
            "bank_account_holder": "Joko Susilo"
        }
    ]))
}

async fn complete_payout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    state.counters.complete_payout.fetch_add(1, Ordering::SeqCst);

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        if let Ok(mut captured) = state.captured.lock() {
            captured.proof_uploads.push((field_name, file_name, len));
        }
    }

    enveloped(json!({ "message": format!("Payout {id} selesai") }))
}

async fn pending_verifications(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    state
        .counters
        .pending_verifications
        .fetch_add(1, Ordering::SeqCst);
    enveloped(json!([
        {
            "id": "ver-7",
            "DocumentType": "ktp",
            "FilePath": "https://cdn.agrolink.id/docs/ver-7.jpg",
            "CreatedAt": "2026-08-10T08:00:00Z",
            "User": { "Name": "Siti Aminah", "Role": "farmer" }
        }
    ]))
}

async fn review_verification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    state
        .counters
        .review_verification
        .fetch_add(1, Ordering::SeqCst);
    if let Ok(mut captured) = state.captured.lock() {
        captured.review_bodies.push(body);
    }
    enveloped(json!({ "message": format!("Verifikasi {id} ditinjau") }))
}

async fn revenue_analytics(headers: HeaderMap) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    enveloped(json!({
        "total_revenue": 9_800_000,
        "revenue_by_service": 6_300_000,
        "revenue_by_product": 3_500_000,
        "daily_trend": [{ "date": "2026-08-28", "value": 450_000 }]
    }))
}

async fn profit_analytics(headers: HeaderMap) -> Response {
    if let Err(resp) = require_admin(&headers) {
        return resp;
    }
    enveloped(json!({
        "total_summary": {
            "total_gross_profit": 1_200_000,
            "total_gateway_fee": 36_000,
            "total_net_profit": 1_164_000
        },
        "daily_summary": [{
            "date": "2026-08-28",
            "source_type": "utama",
            "total_gross_profit": 1_200_000,
            "total_gateway_fee": 36_000,
            "total_net_profit": 1_164_000
        }]
    }))
}
