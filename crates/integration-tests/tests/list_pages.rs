//! End-to-end list controller tests against the stub backend.

use std::sync::atomic::Ordering;

use secrecy::SecretString;

use agrolink_admin_client::api::AdminApi;
use agrolink_admin_client::credential::CredentialCell;
use agrolink_admin_client::gateway::HttpGateway;
use agrolink_admin_client::list::{ListQuery, ListState, ResourceListController};
use agrolink_admin_client::session::{MemorySessionStore, SessionManager};
use agrolink_integration_tests::{ADMIN_EMAIL, PASSWORD, StubServer};

async fn logged_in(server: &StubServer) -> (SessionManager, AdminApi) {
    let gateway = HttpGateway::new(server.base_url(), CredentialCell::new());
    let session = SessionManager::new(gateway.clone(), Box::new(MemorySessionStore::new()));
    session
        .login(ADMIN_EMAIL, &SecretString::from(PASSWORD))
        .await
        .expect("admin login");
    (session, AdminApi::new(gateway))
}

// ============================================================================
// Users: Pagination & Filters
// ============================================================================

#[tokio::test]
async fn test_users_filtered_by_role_loads_one_page() {
    let server = StubServer::spawn().await;
    let (session, api) = logged_in(&server).await;

    let controller = ResourceListController::new(
        &session,
        api.users_fetcher(),
        ListQuery::first_page().with_filter("role", "farmer"),
    )
    .expect("controller");

    controller.load().await;

    match controller.current_state() {
        ListState::Loaded(result) => {
            assert_eq!(result.items.len(), 3);
            assert_eq!(result.current_page, 1);
            assert_eq!(result.total_items, 3);
            assert!(
                result
                    .items
                    .iter()
                    .all(|u| u.role == agrolink_core::Role::Farmer)
            );
        }
        other => panic!("unexpected state: {other:?}"),
    }
    // Exactly one request, carrying page, limit, and the role filter
    assert_eq!(server.counters().users.load(Ordering::SeqCst), 1);
    let queries = server.captured_user_queries();
    assert_eq!(
        queries.first().expect("one query"),
        &vec![
            ("page".to_string(), "1".to_string()),
            ("limit".to_string(), "10".to_string()),
            ("role".to_string(), "farmer".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_changing_a_filter_resets_to_page_one_on_the_wire() {
    let server = StubServer::spawn().await;
    let (session, api) = logged_in(&server).await;

    let controller = ResourceListController::new(
        &session,
        api.users_fetcher(),
        ListQuery::first_page(),
    )
    .expect("controller");

    controller.load().await;
    controller.set_page(2).await;
    controller.set_filter("search", Some("budi")).await;

    let queries = server.captured_user_queries();
    assert_eq!(queries.len(), 3);
    let last = queries.last().expect("three queries");
    assert!(last.contains(&("page".to_string(), "1".to_string())));
    assert!(last.contains(&("search".to_string(), "budi".to_string())));
}

// ============================================================================
// Transactions: Backend-Authoritative Pagination
// ============================================================================

#[tokio::test]
async fn test_transactions_second_page_uses_backend_numbers() {
    let server = StubServer::spawn().await;
    let (session, api) = logged_in(&server).await;

    let controller = ResourceListController::new(
        &session,
        api.transactions_fetcher(),
        ListQuery::first_page(),
    )
    .expect("controller");

    controller.load().await;
    controller.set_page(3).await;

    match controller.current_state() {
        ListState::Loaded(result) => {
            // 25 rows at 10 per page leaves 5 on page 3
            assert_eq!(result.current_page, 3);
            assert_eq!(result.total_items, 25);
            assert_eq!(result.items.len(), 5);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(server.counters().transactions.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Single-Page Action Queues
// ============================================================================

#[tokio::test]
async fn test_pending_queues_load_as_single_pages() {
    let server = StubServer::spawn().await;
    let (session, api) = logged_in(&server).await;

    let payouts = ResourceListController::new(
        &session,
        api.pending_payouts_fetcher(),
        ListQuery::first_page(),
    )
    .expect("payout controller");
    let verifications = ResourceListController::new(
        &session,
        api.pending_verifications_fetcher(),
        ListQuery::first_page(),
    )
    .expect("verification controller");

    payouts.load().await;
    verifications.load().await;

    match payouts.current_state() {
        ListState::Loaded(result) => {
            assert_eq!(result.total_items, 2);
            assert_eq!(
                result.items.first().expect("first payout").payout_id.as_str(),
                "po-101"
            );
        }
        other => panic!("unexpected state: {other:?}"),
    }
    match verifications.current_state() {
        ListState::Loaded(result) => {
            assert_eq!(result.total_items, 1);
            let row = result.items.first().expect("one verification");
            assert_eq!(row.document_type, "ktp");
            assert_eq!(row.user.name, "Siti Aminah");
        }
        other => panic!("unexpected state: {other:?}"),
    }
}
