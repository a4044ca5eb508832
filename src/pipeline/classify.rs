//! Structure classification (A/B/C).
//!
//! Pure rule cascade, first match wins:
//!   1. acto in the special-act list -> C
//!   2. beneficiaries present, or the source text says "a favor de" -> A
//!   3. otherwise -> B

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{NormalizedRecord, Structure, StructureDecision};

/// Acts that always take the special structure, regardless of parties.
pub const SPECIAL_ACTS: &[&str] = &[
    "AUTORIZACIÓN DE SALIDA",
    "AUTORIZACION DE SALIDA",
    "PROTOCOLIZACIÓN",
    "PROTOCOLIZACION",
    "POSESIÓN EFECTIVA",
    "POSESION EFECTIVA",
];

/// Marker phrase that forces structure A even without parsed beneficiaries.
const FAVOR_MARKER: &str = "a favor de";

const EXPLANATION_A: &str =
    "Estructura A: Otorgante → Beneficiario (beneficiarios presentes o frase \"a favor de\")";
const EXPLANATION_B: &str = "Estructura B: Solo otorgante (sin beneficiarios explícitos)";
const EXPLANATION_C: &str = "Estructura C: Especial (acto en lista de casos especiales)";

fn decision(code: Structure) -> StructureDecision {
    let (template_ref, explanation) = match code {
        Structure::A => ("estructura_a", EXPLANATION_A),
        Structure::B => ("estructura_b", EXPLANATION_B),
        Structure::C => ("estructura_c", EXPLANATION_C),
    };
    StructureDecision {
        code,
        template_ref,
        explanation,
    }
}

/// Classify a record. Deterministic in `(act_description, beneficiaries,
/// source_text)`; no other input participates.
pub fn classify(record: &NormalizedRecord, source_text: &str) -> StructureDecision {
    if let Some(act) = record.act_description.as_deref() {
        let act_upper = act.to_uppercase();
        if SPECIAL_ACTS.iter().any(|s| act_upper.contains(s)) {
            debug!(act, "special act, structure C");
            return decision(Structure::C);
        }
    }

    if !record.beneficiaries.is_empty() || source_text.to_lowercase().contains(FAVOR_MARKER) {
        return decision(Structure::A);
    }

    decision(Structure::B)
}

/// Per-structure counters kept by the pipeline instance for
/// observability. Advisory only; never feeds back into classification.
#[derive(Debug, Default)]
pub struct StructureCounters {
    a: AtomicU64,
    b: AtomicU64,
    c: AtomicU64,
    total: AtomicU64,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub total: u64,
}

/// Rationale handed to the audit layer.
#[derive(Debug, Clone, Serialize)]
pub struct StructureExplanation {
    pub structure: Structure,
    pub explanation: &'static str,
    pub counters: CounterSnapshot,
    pub timestamp: DateTime<Utc>,
}

impl StructureCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decision and return the human-readable rationale.
    pub fn explain(&self, code: Structure) -> StructureExplanation {
        match code {
            Structure::A => self.a.fetch_add(1, Ordering::Relaxed),
            Structure::B => self.b.fetch_add(1, Ordering::Relaxed),
            Structure::C => self.c.fetch_add(1, Ordering::Relaxed),
        };
        self.total.fetch_add(1, Ordering::Relaxed);

        StructureExplanation {
            structure: code,
            explanation: decision(code).explanation,
            counters: self.snapshot(),
            timestamp: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            a: self.a.load(Ordering::Relaxed),
            b: self.b.load(Ordering::Relaxed),
            c: self.c.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    fn record_with(act: Option<&str>, beneficiaries: usize) -> NormalizedRecord {
        let mut record = NormalizedRecord::empty();
        record.act_description = act.map(str::to_string);
        record.beneficiaries = (0..beneficiaries)
            .map(|i| Person::named(format!("BENEFICIARIO NUMERO {i}")))
            .collect();
        record
    }

    #[test]
    fn special_act_wins_even_with_beneficiaries() {
        let record = record_with(Some("AUTORIZACIÓN DE SALIDA DEL PAÍS"), 2);
        assert_eq!(classify(&record, "").code, Structure::C);
        let record = record_with(Some("POSESION EFECTIVA"), 1);
        assert_eq!(classify(&record, "").code, Structure::C);
    }

    #[test]
    fn beneficiaries_present_selects_a() {
        let record = record_with(Some("PODER ESPECIAL"), 1);
        assert_eq!(classify(&record, "").code, Structure::A);
    }

    #[test]
    fn marker_phrase_selects_a_without_beneficiaries() {
        let record = record_with(Some("PODER GENERAL"), 0);
        let decision = classify(&record, "otorgado A FAVOR DE tercero");
        assert_eq!(decision.code, Structure::A);
    }

    #[test]
    fn grantor_only_falls_back_to_b() {
        let record = record_with(Some("DECLARACIÓN JURAMENTADA"), 0);
        let decision = classify(&record, "texto sin frase marcadora");
        assert_eq!(decision.code, Structure::B);
        assert_eq!(decision.template_ref, "estructura_b");
    }

    #[test]
    fn classification_is_deterministic() {
        let record = record_with(Some("COMPRAVENTA"), 1);
        let first = classify(&record, "mismo texto");
        for _ in 0..10 {
            assert_eq!(classify(&record, "mismo texto"), first);
        }
    }

    #[test]
    fn explain_increments_counters_without_changing_decisions() {
        let counters = StructureCounters::new();
        let record = record_with(Some("PODER ESPECIAL"), 1);
        let code = classify(&record, "").code;

        let first = counters.explain(code);
        assert_eq!(first.counters.a, 1);
        assert_eq!(first.counters.total, 1);
        assert_eq!(first.explanation, EXPLANATION_A);

        counters.explain(Structure::B);
        counters.explain(Structure::C);
        let snap = counters.snapshot();
        assert_eq!(snap, CounterSnapshot { a: 1, b: 1, c: 1, total: 3 });

        assert_eq!(classify(&record, "").code, code);
    }
}
