//! Optional timing sinks for selection operations.
//!
//! Sinks receive `(label, elapsed)` after propagation and reconciliation.
//! They are for profiling only; nothing in the engine reads them back.

use std::time::Duration;

use tracing::debug;

/// Receives timings of significant selection operations
pub trait InstrumentationSink {
    fn record(&self, label: &str, elapsed: Duration);
}

/// Discards every timing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl InstrumentationSink for NoopSink {
    fn record(&self, _label: &str, _elapsed: Duration) {}
}

/// Emits timings as `tracing` debug events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl InstrumentationSink for TracingSink {
    fn record(&self, label: &str, elapsed: Duration) {
        #[allow(clippy::cast_possible_truncation)] // micros of a UI callback fit in u64
        let micros = elapsed.as_micros() as u64;
        debug!(label, elapsed_us = micros, "selection timing");
    }
}
