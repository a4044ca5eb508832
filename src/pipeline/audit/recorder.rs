//! Audit record construction and best-effort persistence.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use super::masking;
use super::AuditError;
use crate::models::{AuditOutcome, ForceStructure, RenderMode, Structure};

/// SHA-256 over both rendered copies, computed before any masking so
/// integrity checks stay independent of masking changes.
pub fn content_hash(first_copy: &str, second_copy: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(first_copy.as_bytes());
    hasher.update(b"\n");
    hasher.update(second_copy.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Payload handed to the persistence collaborator. All person data is
/// already masked by the time this struct exists.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub audit_id: Uuid,
    pub doc_id: Option<String>,
    pub created_by: Option<String>,
    pub structure: Structure,
    pub template_mode: RenderMode,
    pub force: ForceStructure,
    pub content_hash: String,
    pub masked_grantors: Vec<String>,
    pub masked_beneficiaries: Vec<String>,
    pub warnings: Vec<String>,
    pub generation_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Storage backend for audit records. Implementations own schema and
/// engine; the recorder only hands over the payload.
pub trait AuditSink: Send + Sync {
    fn persist(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Local SQLite sink.
pub struct SqliteAuditSink {
    conn: Mutex<Connection>,
}

impl SqliteAuditSink {
    pub fn open(path: &Path) -> Result<Self, AuditError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, AuditError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, AuditError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS concuerdo_audit (
                audit_id TEXT PRIMARY KEY,
                doc_id TEXT,
                created_by TEXT,
                estructura TEXT NOT NULL,
                template_mode TEXT NOT NULL,
                force_template TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn count(&self) -> Result<u64, AuditError> {
        let conn = self.lock();
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM concuerdo_audit", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AuditSink for SqliteAuditSink {
    fn persist(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let payload = serde_json::to_string(record)?;
        let conn = self.lock();
        conn.execute(
            "INSERT INTO concuerdo_audit
                (audit_id, doc_id, created_by, estructura, template_mode,
                 force_template, content_hash, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                record.audit_id.to_string(),
                record.doc_id,
                record.created_by,
                record.structure.as_str(),
                record.template_mode.as_str(),
                record.force.as_str(),
                record.content_hash,
                payload,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

/// Context the pipeline hands to the recorder per generation.
pub struct AuditContext<'a> {
    pub doc_id: Option<&'a str>,
    pub created_by: Option<&'a str>,
    pub structure: Structure,
    pub template_mode: RenderMode,
    pub force: ForceStructure,
    pub first_copy: &'a str,
    pub second_copy: &'a str,
    pub grantor_names: &'a [String],
    pub beneficiary_names: &'a [String],
    pub warnings: &'a [String],
    pub generation_time_ms: u64,
}

pub struct AuditRecorder {
    sink: Box<dyn AuditSink>,
}

impl AuditRecorder {
    pub fn new(sink: Box<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Hash, mask, persist. Persistence failure degrades to a local log
    /// entry and `persisted: false`; generation never fails because
    /// auditing failed.
    pub fn record(&self, ctx: &AuditContext<'_>) -> (AuditOutcome, String) {
        let hash = content_hash(ctx.first_copy, ctx.second_copy);

        let record = AuditRecord {
            audit_id: Uuid::new_v4(),
            doc_id: ctx.doc_id.map(str::to_string),
            created_by: ctx.created_by.map(str::to_string),
            structure: ctx.structure,
            template_mode: ctx.template_mode,
            force: ctx.force,
            content_hash: hash.clone(),
            masked_grantors: ctx
                .grantor_names
                .iter()
                .map(|n| masking::mask_name(n))
                .collect(),
            masked_beneficiaries: ctx
                .beneficiary_names
                .iter()
                .map(|n| masking::mask_name(n))
                .collect(),
            warnings: ctx.warnings.iter().map(|w| masking::mask_pii(w)).collect(),
            generation_time_ms: ctx.generation_time_ms,
            created_at: Utc::now(),
        };

        let outcome = match self.sink.persist(&record) {
            Ok(()) => {
                info!(
                    audit_id = %record.audit_id,
                    structure = %record.structure,
                    hash_prefix = &hash[..16],
                    "audit record persisted"
                );
                AuditOutcome {
                    persisted: true,
                    audit_id: Some(record.audit_id),
                    error: None,
                }
            }
            Err(err) => {
                warn!(
                    structure = %record.structure,
                    template_mode = %record.template_mode,
                    force = %record.force,
                    doc_id = record.doc_id.as_deref().unwrap_or("-"),
                    error = %err,
                    "audit persistence failed, logging only"
                );
                AuditOutcome {
                    persisted: false,
                    audit_id: None,
                    error: Some(err.to_string()),
                }
            }
        };

        (outcome, hash)
    }
}
