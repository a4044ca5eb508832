//! Audit trail: content hashing, PII masking, rolling metrics and
//! best-effort persistence.

pub mod masking;
pub mod metrics;
pub mod recorder;

pub use masking::{mask_name, mask_pii};
pub use metrics::{Metrics, MetricsSnapshot};
pub use recorder::{
    content_hash, AuditContext, AuditRecord, AuditRecorder, AuditSink, SqliteAuditSink,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("audit database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("audit serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit storage unavailable")]
    Unavailable,
}
