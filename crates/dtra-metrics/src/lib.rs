use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use lazy_static::lazy_static;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref DIAMETER_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("diameter_requests_total", "Diameter requests received by command"),
        &["command"]
    ).unwrap();

    pub static ref DIAMETER_ANSWERS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("diameter_answers_total", "Diameter answers sent by Result-Code"),
        &["result_code"]
    ).unwrap();

    pub static ref RADIUS_EXCHANGES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("radius_exchanges_total", "Completed RADIUS exchanges"),
        &["kind", "outcome"]
    ).unwrap();

    pub static ref EXCHANGE_TIMEOUTS_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("exchange_timeouts_total", "Exchanges that expired before a result arrived")
    ).unwrap();

    pub static ref LATE_RESULTS_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("late_results_total", "RADIUS results dropped because their exchange was gone")
    ).unwrap();

    pub static ref EXCHANGE_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("exchange_latency_seconds", "Time from submit to resolution")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0])
    ).unwrap();

    pub static ref EXCHANGES_IN_FLIGHT: IntGauge = IntGauge::with_opts(
        Opts::new("exchanges_in_flight", "Exchanges awaiting a RADIUS result")
    ).unwrap();

    pub static ref ACTIVE_CONNECTIONS: IntGauge = IntGauge::with_opts(
        Opts::new("active_connections", "Number of connected Diameter peers")
    ).unwrap();
}

/// Register all metrics with the global registry.
/// Calling it again is a no-op.
pub fn register_metrics() -> prometheus::Result<()> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(DIAMETER_REQUESTS_TOTAL.clone()),
        Box::new(DIAMETER_ANSWERS_TOTAL.clone()),
        Box::new(RADIUS_EXCHANGES_TOTAL.clone()),
        Box::new(EXCHANGE_TIMEOUTS_TOTAL.clone()),
        Box::new(LATE_RESULTS_TOTAL.clone()),
        Box::new(EXCHANGE_LATENCY_SECONDS.clone()),
        Box::new(EXCHANGES_IN_FLIGHT.clone()),
        Box::new(ACTIVE_CONNECTIONS.clone()),
    ];
    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Gather metrics in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_request(command: &str) {
    DIAMETER_REQUESTS_TOTAL.with_label_values(&[command]).inc();
}

pub fn record_answer(result_code: u32) {
    DIAMETER_ANSWERS_TOTAL
        .with_label_values(&[&result_code.to_string()])
        .inc();
}

pub fn record_radius_exchange(kind: &str, outcome: &str) {
    RADIUS_EXCHANGES_TOTAL.with_label_values(&[kind, outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        register_metrics().unwrap();
        // Second call must not fail
        register_metrics().unwrap();

        record_request("AIR");
        record_answer(2001);
        record_radius_exchange("access", "accept");
        EXCHANGES_IN_FLIGHT.set(3);
        EXCHANGE_LATENCY_SECONDS.observe(0.02);

        let metrics = gather_metrics();
        assert!(metrics.contains("diameter_requests_total{command=\"AIR\"}"));
        assert!(metrics.contains("diameter_answers_total{result_code=\"2001\"}"));
        assert!(metrics.contains("radius_exchanges_total"));
        assert!(metrics.contains("exchange_latency_seconds"));
    }
}
