use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ExtractionStatus, NormalizedRecord, Structure};

/// Result of the local field extractor. Extraction fails soft: a bad
/// document produces `NeedsReview` plus warnings, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub success: bool,
    pub status: ExtractionStatus,
    pub record: Option<NormalizedRecord>,
    pub warnings: Vec<String>,
}

impl ExtractionOutcome {
    pub fn needs_review(warning: impl Into<String>) -> Self {
        Self {
            success: false,
            status: ExtractionStatus::NeedsReview,
            record: None,
            warnings: vec![warning.into()],
        }
    }
}

/// Classifier verdict: structure code, the base template it implies and
/// the human-readable rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDecision {
    pub code: Structure,
    pub template_ref: &'static str,
    pub explanation: &'static str,
}

/// Traceability metadata attached to a generated pair of copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditMeta {
    /// SHA-256 over both copies, computed before PII masking.
    pub content_hash: String,
    pub masked_fields: Vec<String>,
    pub generation_time_ms: u64,
}

/// The generated concuerdo pair handed back to the caller. First and
/// second copy differ only in the copy-number token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcuerdoResult {
    pub first_copy: String,
    pub second_copy: String,
    pub structure: Structure,
    pub warnings: Vec<String>,
    pub audit_meta: AuditMeta,
}

/// Outcome of the best-effort audit persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub persisted: bool,
    pub audit_id: Option<Uuid>,
    pub error: Option<String>,
}
