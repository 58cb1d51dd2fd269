use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Counters for the export lifecycle:
// - exports created
// - state transitions (paid, delivered)
//
// All metrics are registered with Prometheus and scraped via /metrics.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub exports_created: IntCounter,
    pub state_transitions: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let exports_created = IntCounter::new(
            "exports_created_total",
            "Total exports created",
        )?;
        registry.register(Box::new(exports_created.clone()))?;

        let state_transitions = IntCounterVec::new(
            Opts::new(
                "export_state_transitions_total",
                "Export state transitions recorded",
            ),
            &["transition"],
        )?;
        registry.register(Box::new(state_transitions.clone()))?;

        Ok(Self {
            registry,
            exports_created,
            state_transitions,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_counted_per_label() {
        let metrics = Metrics::new().unwrap();

        metrics.state_transitions.with_label_values(&["paid"]).inc();
        metrics.state_transitions.with_label_values(&["paid"]).inc();
        metrics.state_transitions.with_label_values(&["delivered"]).inc();

        assert_eq!(metrics.state_transitions.with_label_values(&["paid"]).get(), 2);
        assert_eq!(metrics.state_transitions.with_label_values(&["delivered"]).get(), 1);

        let text = String::from_utf8(metrics.encode().unwrap()).unwrap();
        assert!(text.contains("export_state_transitions_total"));
    }
}
