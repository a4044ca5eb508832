//! Concuerdo: extraction, classification and generation pipeline for
//! Ecuadorian notarial concuerdo certifications.
//!
//! The crate takes the raw text of a notarial extract and produces the
//! first and second certified copies, with structure classification
//! (A/B/C), Spanish grammatical agreement, family-specific modifier
//! clauses, and a masked audit trail. An optional remote extraction
//! service can enrich documents the local patterns cannot read; it is
//! wrapped in timeouts, retries and a circuit breaker so the pipeline
//! degrades to local-only behavior when the service misbehaves.
//!
//! Entry point: [`pipeline::ConcuerdoPipeline`].

pub mod config;
pub mod models;
pub mod pipeline;

pub use models::{ConcuerdoResult, ExtractionStatus, NormalizedRecord, Structure};
pub use pipeline::{ConcuerdoPipeline, ConcuerdoReport, GenerateRequest};
