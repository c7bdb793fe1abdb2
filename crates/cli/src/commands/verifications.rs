//! Verification commands: list the review queue, approve or reject.

use std::sync::Arc;

use agrolink_core::{ReviewDecision, VerificationId};

use agrolink_admin_client::workflow::{ActionWorkflow, VerificationReview};

use super::{CliError, bootstrap_admin};

/// List all identity documents awaiting review.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let page = context.api.pending_verifications().await?;

    if page.items.is_empty() {
        println!("No verifications waiting for review");
        return Ok(());
    }

    println!("{} verification(s) waiting for review:", page.total_items);
    for verification in &page.items {
        println!(
            "  {}  {}  {} ({})  submitted {}",
            verification.id,
            verification.document_type,
            verification.user.name,
            verification.user.role,
            verification.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}

/// Approve or reject one verification request.
///
/// Rejections without notes are refused locally; the backend is never
/// contacted.
#[allow(clippy::print_stdout)]
pub async fn review(id: &str, reject: bool, notes: Option<&str>) -> Result<(), CliError> {
    let context = bootstrap_admin()?;

    let api = context.api.clone();
    let workflow =
        ActionWorkflow::<VerificationReview>::new(Arc::new(move |verification_id, draft| {
            let api = api.clone();
            Box::pin(async move {
                api.review_verification(&verification_id, draft.decision, &draft.notes)
                    .await
            })
        }));

    workflow.open(VerificationId::new(id));
    let decision = if reject {
        ReviewDecision::Rejected
    } else {
        ReviewDecision::Approved
    };
    let notes = notes.unwrap_or_default().to_string();
    workflow.update_draft(move |draft| {
        draft.decision = decision;
        draft.notes = notes;
    });
    workflow.submit().await?;

    println!("Verification {id} {}", decision.as_str());
    Ok(())
}
