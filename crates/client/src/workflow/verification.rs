//! Verification review: approve or reject a user's submitted identity
//! document. Rejections must carry an explanation for the user.

use agrolink_core::{ReviewDecision, VerificationId};

use super::ReviewAction;

/// Draft for a verification review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Approve or reject.
    pub decision: ReviewDecision,
    /// Reviewer notes. Required when rejecting, optional otherwise.
    pub notes: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            decision: ReviewDecision::Approved,
            notes: String::new(),
        }
    }
}

/// Action marker for reviewing a verification request.
#[derive(Debug, Clone, Copy)]
pub struct VerificationReview;

impl ReviewAction for VerificationReview {
    type Target = VerificationId;
    type Draft = ReviewDraft;

    fn validate(draft: &Self::Draft) -> Result<(), String> {
        if draft.decision == ReviewDecision::Rejected && draft.notes.trim().is_empty() {
            return Err("notes are required when rejecting a verification".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_needs_no_notes() {
        assert_eq!(VerificationReview::validate(&ReviewDraft::default()), Ok(()));
    }

    #[test]
    fn test_rejection_without_notes_is_invalid() {
        let draft = ReviewDraft {
            decision: ReviewDecision::Rejected,
            notes: String::new(),
        };
        assert!(VerificationReview::validate(&draft).is_err());
    }

    #[test]
    fn test_whitespace_only_notes_do_not_count() {
        let draft = ReviewDraft {
            decision: ReviewDecision::Rejected,
            notes: "   \n\t".to_string(),
        };
        assert!(VerificationReview::validate(&draft).is_err());
    }

    #[test]
    fn test_rejection_with_notes_is_valid() {
        let draft = ReviewDraft {
            decision: ReviewDecision::Rejected,
            notes: "document photo does not match the registered name".to_string(),
        };
        assert_eq!(VerificationReview::validate(&draft), Ok(()));
    }
}
