use crate::calendar::CalendarSource;
use crate::config::AppConfig;
use crate::errors::DeskError;
use crate::models::barrier::BarrierPricer;
use crate::models::binary::BinaryPricer;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Request counters (lock-free) ──

pub struct PerfCounters {
    pub prices_computed: AtomicU64,
    pub calendar_fetches: AtomicU64,
    pub exports_served: AtomicU64,
    pub requests_rejected: AtomicU64,
    pub provider_errors: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CounterSnapshot {
    pub prices_computed: u64,
    pub calendar_fetches: u64,
    pub exports_served: u64,
    pub requests_rejected: u64,
    pub provider_errors: u64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            prices_computed: AtomicU64::new(0),
            calendar_fetches: AtomicU64::new(0),
            exports_served: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            provider_errors: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            prices_computed: self.prices_computed.load(Ordering::Relaxed),
            calendar_fetches: self.calendar_fetches.load(Ordering::Relaxed),
            exports_served: self.exports_served.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            provider_errors: self.provider_errors.load(Ordering::Relaxed),
        }
    }

    /// Count a failed request under the right bucket.
    pub fn record_error(&self, err: &DeskError) {
        if err.is_user_error() {
            self.requests_rejected.fetch_add(1, Ordering::Relaxed);
        } else if matches!(
            err,
            DeskError::Provider { .. } | DeskError::Network(_) | DeskError::Parse(_)
        ) {
            self.provider_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for PerfCounters {
    fn default() -> Self {
        Self::new()
    }
}

// ── Application shared state ──
//
// Nothing here is mutated per request except the counters.

pub struct AppState {
    pub config: AppConfig,
    pub calendar: Arc<dyn CalendarSource>,
    pub barrier: BarrierPricer,
    pub binary: BinaryPricer,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig, calendar: Arc<dyn CalendarSource>) -> Arc<Self> {
        Arc::new(Self {
            config,
            calendar,
            barrier: BarrierPricer::new(),
            binary: BinaryPricer::new(),
            counters: PerfCounters::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_buckets() {
        let c = PerfCounters::new();
        c.record_error(&DeskError::Validation("x".into()));
        c.record_error(&DeskError::InvalidOptionType("Exotic".into()));
        c.record_error(&DeskError::Provider { status: 500, body: String::new() });
        c.record_error(&DeskError::Export("disk".into()));
        let s = c.snapshot();
        assert_eq!(s.requests_rejected, 2);
        assert_eq!(s.provider_errors, 1);
        assert_eq!(s.prices_computed, 0);
    }
}
