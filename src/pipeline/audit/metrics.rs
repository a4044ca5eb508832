//! In-memory rolling generation metrics.
//!
//! Owned by the pipeline instance, never a module global, so tests can
//! run against isolated instances. Counts are best-effort under
//! concurrency.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ForceStructure, RenderMode, Structure};

/// Latency samples kept for percentile queries; oldest evicted first.
pub const TIMING_CAP: usize = 1000;

#[derive(Debug)]
struct MetricsInner {
    total_generations: u64,
    structures: [u64; 3],
    structural_mode: u64,
    family_mode: u64,
    forces: [u64; 4],
    timings: VecDeque<u64>,
    last_updated: DateTime<Utc>,
}

impl MetricsInner {
    fn empty() -> Self {
        Self {
            total_generations: 0,
            structures: [0; 3],
            structural_mode: 0,
            family_mode: 0,
            forces: [0; 4],
            timings: VecDeque::with_capacity(TIMING_CAP),
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_generations: u64,
    pub structure_a: u64,
    pub structure_b: u64,
    pub structure_c: u64,
    pub structural_mode: u64,
    pub family_mode: u64,
    pub force_auto: u64,
    pub force_a: u64,
    pub force_b: u64,
    pub force_c: u64,
    pub sample_count: usize,
    pub p95_ms: u64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Metrics {
    inner: Mutex<MetricsInner>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsInner::empty()),
        }
    }

    pub fn record_generation(
        &self,
        structure: Structure,
        mode: RenderMode,
        force: ForceStructure,
        elapsed_ms: u64,
    ) {
        let mut inner = self.lock();
        inner.total_generations += 1;
        match structure {
            Structure::A => inner.structures[0] += 1,
            Structure::B => inner.structures[1] += 1,
            Structure::C => inner.structures[2] += 1,
        }
        match mode {
            RenderMode::Structural => inner.structural_mode += 1,
            RenderMode::Family => inner.family_mode += 1,
        }
        match force {
            ForceStructure::Auto => inner.forces[0] += 1,
            ForceStructure::A => inner.forces[1] += 1,
            ForceStructure::B => inner.forces[2] += 1,
            ForceStructure::C => inner.forces[3] += 1,
        }
        inner.timings.push_back(elapsed_ms);
        if inner.timings.len() > TIMING_CAP {
            inner.timings.pop_front();
        }
        inner.last_updated = Utc::now();
    }

    /// Percentile over the retained samples, computed by sorting on
    /// demand. Zero when no samples exist.
    pub fn percentile(&self, p: u8) -> u64 {
        let inner = self.lock();
        if inner.timings.is_empty() {
            return 0;
        }
        let mut sorted: Vec<u64> = inner.timings.iter().copied().collect();
        sorted.sort_unstable();
        let rank = (f64::from(p) / 100.0 * sorted.len() as f64).ceil() as usize;
        sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
    }

    pub fn reset(&self) {
        *self.lock() = MetricsInner::empty();
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let p95 = self.percentile(95);
        let inner = self.lock();
        MetricsSnapshot {
            total_generations: inner.total_generations,
            structure_a: inner.structures[0],
            structure_b: inner.structures[1],
            structure_c: inner.structures[2],
            structural_mode: inner.structural_mode,
            family_mode: inner.family_mode,
            force_auto: inner.forces[0],
            force_a: inner.forces[1],
            force_b: inner.forces[2],
            force_c: inner.forces[3],
            sample_count: inner.timings.len(),
            p95_ms: p95,
            last_updated: inner.last_updated,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MetricsInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
