//! Concuerdo generation pipeline.
//!
//! Raw text -> extraction (local, optionally enriched remotely) ->
//! structure classification -> template rendering -> audit. The
//! pipeline owns every piece of long-lived mutable state (template
//! cache, breaker, counters, metrics); construct one instance per
//! process, or one per test.

pub mod audit;
pub mod classify;
pub mod extraction;
pub mod remote;
pub mod templates;

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::config::{self, RemoteConfig};
use crate::models::{
    AuditMeta, AuditOutcome, ConcuerdoResult, CopyNumber, ExtractionStatus, ForceStructure,
    NormalizedRecord, RenderMode,
};
use audit::{AuditContext, AuditRecorder, AuditSink, Metrics, MetricsSnapshot, SqliteAuditSink};
use classify::{CounterSnapshot, StructureCounters};
use remote::{HttpRemoteExtractor, ResilientExtractionClient};
use templates::{Composer, TemplateStore};

/// Per-call input from the embedding layer.
pub struct GenerateRequest<'a> {
    pub raw_text: &'a str,
    pub source_file: Option<&'a str>,
    pub mode: RenderMode,
    pub force: ForceStructure,
    pub doc_id: Option<&'a str>,
    pub created_by: Option<&'a str>,
}

impl<'a> GenerateRequest<'a> {
    pub fn new(raw_text: &'a str) -> Self {
        Self {
            raw_text,
            source_file: None,
            mode: RenderMode::Structural,
            force: ForceStructure::Auto,
            doc_id: None,
            created_by: None,
        }
    }
}

/// Full outcome handed back to the caller. "Failure" is expressed via
/// `status` and `warnings`, never a missing response.
#[derive(Debug, Serialize)]
pub struct ConcuerdoReport {
    pub status: ExtractionStatus,
    pub warnings: Vec<String>,
    pub record: Option<NormalizedRecord>,
    pub concuerdo: Option<ConcuerdoResult>,
    pub audit: Option<AuditOutcome>,
}

pub struct ConcuerdoPipeline {
    composer: Composer,
    counters: StructureCounters,
    metrics: Metrics,
    recorder: AuditRecorder,
    remote: Option<ResilientExtractionClient<HttpRemoteExtractor>>,
}

impl ConcuerdoPipeline {
    pub fn new(store: TemplateStore, sink: Box<dyn AuditSink>, remote_config: RemoteConfig) -> Self {
        let remote = if remote_config.usable() {
            HttpRemoteExtractor::from_config(&remote_config)
                .map(|extractor| ResilientExtractionClient::new(remote_config.clone(), extractor))
        } else {
            None
        };
        Self {
            composer: Composer::new(store),
            counters: StructureCounters::new(),
            metrics: Metrics::new(),
            recorder: AuditRecorder::new(sink),
            remote,
        }
    }

    /// Standard wiring: templates under the app data directory, audit
    /// database next to them, remote settings from the environment.
    pub fn with_defaults() -> Result<Self, audit::AuditError> {
        let store = TemplateStore::new(config::templates_dir());
        let sink = SqliteAuditSink::open(&config::audit_dir().join("concuerdo_audit.db"))?;
        Ok(Self::new(store, Box::new(sink), RemoteConfig::from_env()))
    }

    /// Generate both certified copies for one document.
    pub async fn generate(&self, request: GenerateRequest<'_>) -> ConcuerdoReport {
        let started = Instant::now();

        let outcome = extraction::extract(request.raw_text, request.source_file);
        let mut warnings = outcome.warnings;
        let Some(mut record) = outcome.record else {
            return ConcuerdoReport {
                status: outcome.status,
                warnings,
                record: None,
                concuerdo: None,
                audit: None,
            };
        };
        let mut status = outcome.status;

        // Remote enrichment only when the local pass came up short.
        if status == ExtractionStatus::NeedsReview {
            if let Some(client) = &self.remote {
                if let Some(enriched) = client
                    .extract_via_remote(request.raw_text, request.source_file)
                    .await
                {
                    record = merge_records(record, enriched);
                    status = critical_status(&record);
                    warnings.push("Datos complementados por extracción remota".to_string());
                }
            }
        }

        let decision = classify::classify(&record, request.raw_text);
        let structure = request.force.resolve(decision.code);
        self.counters.explain(structure);

        let first_copy =
            self.composer
                .render(structure, &record, request.mode, CopyNumber::Primera);
        let second_copy =
            self.composer
                .render(structure, &record, request.mode, CopyNumber::Segunda);

        let generation_time_ms = started.elapsed().as_millis() as u64;
        self.metrics
            .record_generation(structure, request.mode, request.force, generation_time_ms);

        let grantor_names: Vec<String> =
            record.grantors.iter().map(|p| p.name.clone()).collect();
        let beneficiary_names: Vec<String> =
            record.beneficiaries.iter().map(|p| p.name.clone()).collect();
        let (audit_outcome, content_hash) = self.recorder.record(&AuditContext {
            doc_id: request.doc_id,
            created_by: request.created_by,
            structure,
            template_mode: request.mode,
            force: request.force,
            first_copy: &first_copy,
            second_copy: &second_copy,
            grantor_names: &grantor_names,
            beneficiary_names: &beneficiary_names,
            warnings: &warnings,
            generation_time_ms,
        });

        info!(
            structure = %structure,
            mode = %request.mode,
            status = %status,
            generation_time_ms,
            "concuerdo generated"
        );

        let concuerdo = ConcuerdoResult {
            first_copy,
            second_copy,
            structure,
            warnings: warnings.clone(),
            audit_meta: AuditMeta {
                content_hash,
                masked_fields: vec!["otorgantes".to_string(), "beneficiarios".to_string()],
                generation_time_ms,
            },
        };

        ConcuerdoReport {
            status,
            warnings,
            record: Some(record),
            concuerdo: Some(concuerdo),
            audit: Some(audit_outcome),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn structure_counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }
}

/// Fill gaps in the local record with remotely extracted data. Local
/// values win wherever both sides have one.
fn merge_records(mut local: NormalizedRecord, remote: NormalizedRecord) -> NormalizedRecord {
    if local.act_description.is_none() {
        local.act_description = remote.act_description;
    }
    if local.grantors.is_empty() {
        local.grantors = remote.grantors;
    }
    if local.beneficiaries.is_empty() {
        local.beneficiaries = remote.beneficiaries;
    }
    if local.notary_name.is_none() {
        local.notary_name = remote.notary_name;
    }
    local
}

fn critical_status(record: &NormalizedRecord) -> ExtractionStatus {
    let present = [
        record.act_description.is_some(),
        record.grant_date.is_some(),
        record.deed_number.is_some(),
    ]
    .iter()
    .filter(|p| **p)
    .count();
    if present >= 2 {
        ExtractionStatus::Active
    } else {
        ExtractionStatus::NeedsReview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Structure;

    const SAMPLE: &str = "\
EXTRACTO NOTARIAL\n\
ESCRITURA N°: 20251701018P02183\n\
ACTO O CONTRATO: PODER ESPECIAL\n\
FECHA DE OTORGAMIENTO: 12 DE MAYO DEL 2025, (10:30)\n\
OTORGADO POR:\n\
PEREZ LOPEZ JUAN CARLOS 1712345678\n\
A FAVOR DE:\n\
TORRES VACA MARIA ELENA\n\
CUANTÍA: INDETERMINADA\n\
NOTARIO (A): ABG. GLENDA ELIZABETH ZAPATA SILVA\n\
NOTARÍA: DÉCIMA OCTAVA DEL CANTÓN QUITO\n";

    fn test_pipeline() -> ConcuerdoPipeline {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path().to_path_buf());
        let sink = SqliteAuditSink::in_memory().unwrap();
        ConcuerdoPipeline::new(store, Box::new(sink), RemoteConfig::default())
    }

    #[tokio::test]
    async fn end_to_end_poder_especial() {
        let pipeline = test_pipeline();
        let report = pipeline.generate(GenerateRequest::new(SAMPLE)).await;

        assert_eq!(report.status, ExtractionStatus::Active);
        let concuerdo = report.concuerdo.unwrap();
        assert_eq!(concuerdo.structure, Structure::A);
        assert!(concuerdo.first_copy.contains("PRIMERA"));
        assert!(concuerdo.second_copy.contains("SEGUNDA"));
        assert!(concuerdo.first_copy.contains("que otorga "));
        assert!(!concuerdo.first_copy.contains("que otorgan"));
        assert_eq!(
            concuerdo.first_copy.replace("PRIMERA", "SEGUNDA"),
            concuerdo.second_copy
        );
        assert_eq!(concuerdo.audit_meta.content_hash.len(), 64);

        let audit = report.audit.unwrap();
        assert!(audit.persisted);

        let metrics = pipeline.metrics();
        assert_eq!(metrics.total_generations, 1);
        assert_eq!(metrics.structure_a, 1);
        assert_eq!(pipeline.structure_counters().a, 1);
    }

    #[tokio::test]
    async fn force_structure_overrides_classifier() {
        let pipeline = test_pipeline();
        let request = GenerateRequest {
            force: ForceStructure::C,
            ..GenerateRequest::new(SAMPLE)
        };
        let report = pipeline.generate(request).await;
        assert_eq!(report.concuerdo.unwrap().structure, Structure::C);
    }

    #[tokio::test]
    async fn family_mode_adds_modifier_text() {
        let pipeline = test_pipeline();
        let request = GenerateRequest {
            mode: RenderMode::Family,
            ..GenerateRequest::new(SAMPLE)
        };
        let report = pipeline.generate(request).await;
        let concuerdo = report.concuerdo.unwrap();
        assert!(concuerdo.first_copy.contains("El poder conferido faculta"));
    }

    #[tokio::test]
    async fn short_input_reports_needs_review_without_concuerdo() {
        let pipeline = test_pipeline();
        let report = pipeline.generate(GenerateRequest::new("texto corto")).await;
        assert_eq!(report.status, ExtractionStatus::NeedsReview);
        assert!(report.concuerdo.is_none());
        assert!(!report.warnings.is_empty());
        assert_eq!(pipeline.metrics().total_generations, 0);
    }
}
