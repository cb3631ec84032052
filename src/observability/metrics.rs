use prometheus::{
    Encoder, Histogram, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub suggestions_total: IntCounterVec,
    pub suggestion_latency_seconds: HistogramVec,
    pub eligible_candidates: Histogram,
    pub assignments_total: IntCounterVec,
    pub notifications_sent: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let suggestions_total = IntCounterVec::new(
            Opts::new("suggestions_total", "Total suggestion requests by outcome"),
            &["outcome"],
        )
        .expect("valid suggestions_total metric");

        let suggestion_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "suggestion_latency_seconds",
                "Latency of the suggestion pipeline in seconds",
            ),
            &["outcome"],
        )
        .expect("valid suggestion_latency_seconds metric");

        let eligible_candidates = Histogram::with_opts(prometheus::HistogramOpts::new(
            "eligible_candidates",
            "Eligible candidates per suggestion request",
        ))
        .expect("valid eligible_candidates metric");

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Assignment writes by status"),
            &["status"],
        )
        .expect("valid assignments_total metric");

        let notifications_sent =
            IntCounter::new("notifications_sent", "Notifications created for staff")
                .expect("valid notifications_sent metric");

        registry
            .register(Box::new(suggestions_total.clone()))
            .expect("register suggestions_total");
        registry
            .register(Box::new(suggestion_latency_seconds.clone()))
            .expect("register suggestion_latency_seconds");
        registry
            .register(Box::new(eligible_candidates.clone()))
            .expect("register eligible_candidates");
        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(notifications_sent.clone()))
            .expect("register notifications_sent");

        Self {
            registry,
            suggestions_total,
            suggestion_latency_seconds,
            eligible_candidates,
            assignments_total,
            notifications_sent,
        }
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
