use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// openBIS API usage metrics
#[derive(Debug, Default)]
pub struct OpenbisApiMetrics {
    pub total_requests: AtomicU64,
    pub errors: AtomicU64,
    pub poll_attempts: AtomicU64,
}

impl OpenbisApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll(&self) {
        self.poll_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> OpenbisApiStats {
        OpenbisApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            poll_attempts: self.poll_attempts.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "openBIS API metrics: requests={}, errors={}, polls={}",
            stats.total_requests, stats.errors, stats.poll_attempts
        );
    }
}

#[derive(Debug, Clone)]
pub struct OpenbisApiStats {
    pub total_requests: u64,
    pub errors: u64,
    pub poll_attempts: u64,
}

/// Global metrics instance
static OPENBIS_METRICS: std::sync::LazyLock<OpenbisApiMetrics> =
    std::sync::LazyLock::new(OpenbisApiMetrics::new);

pub fn openbis_metrics() -> &'static OpenbisApiMetrics {
    &OPENBIS_METRICS
}

/// Time an operation and record metrics
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = OpenbisApiMetrics::new();
        metrics.record_request();
        metrics.record_request();
        metrics.record_error();
        metrics.record_poll();

        let stats = metrics.get_stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.poll_attempts, 1);
    }
}
