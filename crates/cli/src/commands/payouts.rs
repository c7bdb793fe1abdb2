//! Payout commands: list the transfer queue, complete a payout.

use std::path::Path;
use std::sync::Arc;

use agrolink_core::PayoutId;

use agrolink_admin_client::workflow::{ActionWorkflow, EvidenceFile, PayoutCompletion};

use super::{CliError, bootstrap_admin};

/// List all payouts awaiting manual transfer.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let page = context.api.pending_payouts().await?;

    if page.items.is_empty() {
        println!("No payouts waiting for transfer");
        return Ok(());
    }

    println!("{} payout(s) waiting for transfer:", page.total_items);
    for payout in &page.items {
        println!(
            "  {}  Rp{}  {} ({}) - {} / {} a.n. {}",
            payout.payout_id,
            payout.amount,
            payout.payee_name,
            payout.payee_type,
            payout.bank_name,
            payout.bank_account_number,
            payout.bank_account_holder,
        );
    }
    Ok(())
}

/// Mark a payout as transferred, attaching the proof file at `proof`.
#[allow(clippy::print_stdout)]
pub async fn complete(id: &str, proof: &Path) -> Result<(), CliError> {
    let context = bootstrap_admin()?;
    let evidence = EvidenceFile::from_path(proof)?;

    let api = context.api.clone();
    let workflow = ActionWorkflow::<PayoutCompletion>::new(Arc::new(move |payout_id, draft| {
        let api = api.clone();
        Box::pin(async move {
            match draft.evidence {
                Some(file) => api.complete_payout(&payout_id, &file).await,
                // Unreachable: validation requires evidence before submit
                None => Ok(()),
            }
        })
    }));

    workflow.open(PayoutId::new(id));
    workflow.update_draft(move |draft| draft.evidence = Some(evidence));
    workflow.submit().await?;

    println!("Payout {id} completed");
    Ok(())
}
