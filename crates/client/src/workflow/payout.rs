//! Payout completion: mark a pending payout as transferred, with a
//! proof-of-transfer file attached as evidence.

use std::io;
use std::path::Path;

use agrolink_core::PayoutId;

use super::ReviewAction;

/// A transfer proof file staged for upload.
///
/// Bytes are held in memory; payout proofs are single receipt images or
/// PDFs, not bulk data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceFile {
    /// Name reported to the backend.
    pub file_name: String,
    /// MIME type sent with the multipart part.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl EvidenceFile {
    /// Stage an in-memory file.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a proof file from disk, inferring the MIME type from the
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "proof".to_string(), |n| n.to_string_lossy().into_owned());
        let content_type = match path.extension().and_then(|e| e.to_str()) {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("pdf") => "application/pdf",
            _ => "application/octet-stream",
        };
        Ok(Self::new(file_name, content_type, bytes))
    }
}

/// Draft for a payout completion: nothing but the staged proof file.
#[derive(Debug, Clone, Default)]
pub struct PayoutDraft {
    /// Proof of transfer. Required before submission.
    pub evidence: Option<EvidenceFile>,
}

/// Action marker for completing a payout.
#[derive(Debug, Clone, Copy)]
pub struct PayoutCompletion;

impl ReviewAction for PayoutCompletion {
    type Target = PayoutId;
    type Draft = PayoutDraft;

    fn validate(draft: &Self::Draft) -> Result<(), String> {
        match &draft.evidence {
            Some(file) if !file.bytes.is_empty() => Ok(()),
            Some(_) => Err("the transfer proof file is empty".to_string()),
            None => Err("a transfer proof file is required".to_string()),
        }
    }
}
