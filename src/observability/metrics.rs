use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub booking_transitions_total: IntCounterVec,
    pub availability_checks_total: IntCounterVec,
    pub temporary_orders_swept_total: IntCounter,
    pub booking_latency_seconds: HistogramVec,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let booking_transitions_total = IntCounterVec::new(
            Opts::new(
                "booking_transitions_total",
                "Booking lifecycle transitions by stage and outcome",
            ),
            &["stage", "outcome"],
        )
        .expect("valid booking_transitions_total metric");

        let availability_checks_total = IntCounterVec::new(
            Opts::new(
                "availability_checks_total",
                "Availability checks by result",
            ),
            &["result"],
        )
        .expect("valid availability_checks_total metric");

        let temporary_orders_swept_total = IntCounter::new(
            "temporary_orders_swept_total",
            "Abandoned temporary orders removed by the sweeper",
        )
        .expect("valid temporary_orders_swept_total metric");

        let booking_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "booking_latency_seconds",
                "Latency of booking lifecycle operations in seconds",
            ),
            &["stage"],
        )
        .expect("valid booking_latency_seconds metric");

        registry
            .register(Box::new(booking_transitions_total.clone()))
            .expect("register booking_transitions_total");
        registry
            .register(Box::new(availability_checks_total.clone()))
            .expect("register availability_checks_total");
        registry
            .register(Box::new(temporary_orders_swept_total.clone()))
            .expect("register temporary_orders_swept_total");
        registry
            .register(Box::new(booking_latency_seconds.clone()))
            .expect("register booking_latency_seconds");

        Self {
            registry,
            booking_transitions_total,
            availability_checks_total,
            temporary_orders_swept_total,
            booking_latency_seconds,
        }
    }

    pub fn record_transition(&self, stage: &str, ok: bool, elapsed_secs: f64) {
        let outcome = if ok { "success" } else { "error" };
        self.booking_transitions_total
            .with_label_values(&[stage, outcome])
            .inc();
        self.booking_latency_seconds
            .with_label_values(&[stage])
            .observe(elapsed_secs);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
