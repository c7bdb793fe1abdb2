//! End-to-end action workflow tests: payout completion with evidence
//! upload, verification review, and list refresh sequencing.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use secrecy::SecretString;

use agrolink_core::{PayoutId, ReviewDecision, VerificationId};

use agrolink_admin_client::api::AdminApi;
use agrolink_admin_client::credential::CredentialCell;
use agrolink_admin_client::gateway::HttpGateway;
use agrolink_admin_client::list::{ListQuery, ResourceListController};
use agrolink_admin_client::session::{MemorySessionStore, SessionManager};
use agrolink_admin_client::workflow::{
    ActionWorkflow, EvidenceFile, PayoutCompletion, PayoutDraft, ReviewDraft, VerificationReview,
    WorkflowError,
};
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

fn payout_workflow(api: &AdminApi) -> ActionWorkflow<PayoutCompletion> {
    let api = api.clone();
    ActionWorkflow::new(Arc::new(move |payout_id: PayoutId, draft: PayoutDraft| {
        let api = api.clone();
        Box::pin(async move {
            match draft.evidence {
                Some(file) => api.complete_payout(&payout_id, &file).await,
                None => Ok(()),
            }
        })
    }))
}

fn review_workflow(api: &AdminApi) -> ActionWorkflow<VerificationReview> {
    let api = api.clone();
    ActionWorkflow::new(Arc::new(
        move |verification_id: VerificationId, draft: ReviewDraft| {
            let api = api.clone();
            Box::pin(async move {
                api.review_verification(&verification_id, draft.decision, &draft.notes)
                    .await
            })
        },
    ))
}

// ============================================================================
// Payout Completion
// ============================================================================

#[tokio::test]
async fn test_payout_completion_uploads_exactly_one_proof() {
    let server = StubServer::spawn().await;
    let (_session, api) = logged_in(&server).await;

    let workflow = payout_workflow(&api);
    workflow.open(PayoutId::new("po-101"));
    workflow.update_draft(|draft| {
        draft.evidence = Some(EvidenceFile::new(
            "bukti_transfer.jpg",
            "image/jpeg",
            vec![0xFF, 0xD8, 0xFF, 0xE0],
        ));
    });

    workflow.submit().await.expect("submit");

    assert_eq!(server.counters().complete_payout.load(Ordering::SeqCst), 1);
    let uploads = server.captured_proof_uploads();
    assert_eq!(
        uploads,
        vec![(
            "transfer_proof_file".to_string(),
            "bukti_transfer.jpg".to_string(),
            4
        )]
    );
}

#[tokio::test]
async fn test_payout_completion_refreshes_owning_list_after_success() {
    let server = StubServer::spawn().await;
    let (session, api) = logged_in(&server).await;

    let controller = ResourceListController::new(
        &session,
        api.pending_payouts_fetcher(),
        ListQuery::first_page(),
    )
    .expect("controller");
    controller.load().await;
    assert_eq!(server.counters().pending_payouts.load(Ordering::SeqCst), 1);

    let workflow = payout_workflow(&api).with_refresh({
        let controller = controller.clone();
        Arc::new(move || {
            let controller = controller.clone();
            Box::pin(async move { controller.refresh().await })
        })
    });

    workflow.open(PayoutId::new("po-102"));
    workflow.update_draft(|draft| {
        draft.evidence = Some(EvidenceFile::new("proof.png", "image/png", vec![1]));
    });
    workflow.submit().await.expect("submit");

    // The list was re-fetched after the completion round-trip
    assert_eq!(server.counters().pending_payouts.load(Ordering::SeqCst), 2);
    assert_eq!(server.counters().complete_payout.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_payout_without_evidence_never_hits_the_backend() {
    let server = StubServer::spawn().await;
    let (_session, api) = logged_in(&server).await;

    let workflow = payout_workflow(&api);
    workflow.open(PayoutId::new("po-101"));

    let result = workflow.submit().await;
    assert!(matches!(result, Err(WorkflowError::Invalid(_))));
    assert_eq!(server.counters().complete_payout.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Verification Review
// ============================================================================

#[tokio::test]
async fn test_approval_posts_status_and_empty_notes() {
    let server = StubServer::spawn().await;
    let (_session, api) = logged_in(&server).await;

    let workflow = review_workflow(&api);
    workflow.open(VerificationId::new("ver-7"));
    workflow.submit().await.expect("submit");

    let bodies = server.captured_review_bodies();
    assert_eq!(
        bodies,
        vec![serde_json::json!({ "status": "approved", "notes": "" })]
    );
}

#[tokio::test]
async fn test_rejection_posts_notes() {
    let server = StubServer::spawn().await;
    let (_session, api) = logged_in(&server).await;

    let workflow = review_workflow(&api);
    workflow.open(VerificationId::new("ver-7"));
    workflow.update_draft(|draft| {
        draft.decision = ReviewDecision::Rejected;
        draft.notes = "Foto dokumen buram".to_string();
    });
    workflow.submit().await.expect("submit");

    let bodies = server.captured_review_bodies();
    assert_eq!(
        bodies,
        vec![serde_json::json!({ "status": "rejected", "notes": "Foto dokumen buram" })]
    );
}

#[tokio::test]
async fn test_rejection_without_notes_issues_zero_requests() {
    let server = StubServer::spawn().await;
    let (_session, api) = logged_in(&server).await;

    let workflow = review_workflow(&api);
    workflow.open(VerificationId::new("ver-7"));
    workflow.update_draft(|draft| draft.decision = ReviewDecision::Rejected);

    let result = workflow.submit().await;
    assert!(matches!(result, Err(WorkflowError::Invalid(_))));
    assert_eq!(
        server.counters().review_verification.load(Ordering::SeqCst),
        0
    );
}
