//! Prometheus metrics registry for the arrival alarm.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and pass it
//! to the engine. `render()` produces the Prometheus text exposition
//! format; the binary dumps a snapshot at debug level on shutdown.

use prometheus::{Counter, Gauge, Opts, Registry};

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Total number of evaluation cycles attempted (success + skipped).
    pub evaluation_cycles_total: Counter,
    /// Total number of cycles skipped because the position query failed
    /// or timed out.
    pub position_errors_total: Counter,
    /// Total number of arrival alerts handed to the dispatcher.
    pub alerts_dispatched_total: Counter,
    /// Total number of dispatcher calls that reported a delivery failure.
    pub dispatch_errors_total: Counter,
    /// Current number of geofences held in the registry.
    pub geofences_active: Gauge,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated (should not happen in practice).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let evaluation_cycles_total = Counter::with_opts(Opts::new(
            "arrival_alarm_evaluation_cycles_total",
            "Total evaluation cycles attempted",
        ))?;

        let position_errors_total = Counter::with_opts(Opts::new(
            "arrival_alarm_position_errors_total",
            "Cycles skipped due to position query failures",
        ))?;

        let alerts_dispatched_total = Counter::with_opts(Opts::new(
            "arrival_alarm_alerts_dispatched_total",
            "Arrival alerts handed to the dispatcher",
        ))?;

        let dispatch_errors_total = Counter::with_opts(Opts::new(
            "arrival_alarm_dispatch_errors_total",
            "Dispatcher calls that reported a delivery failure",
        ))?;

        let geofences_active = Gauge::with_opts(Opts::new(
            "arrival_alarm_geofences_active",
            "Current number of registered geofences",
        ))?;

        registry.register(Box::new(evaluation_cycles_total.clone()))?;
        registry.register(Box::new(position_errors_total.clone()))?;
        registry.register(Box::new(alerts_dispatched_total.clone()))?;
        registry.register(Box::new(dispatch_errors_total.clone()))?;
        registry.register(Box::new(geofences_active.clone()))?;

        Ok(Self {
            evaluation_cycles_total,
            position_errors_total,
            alerts_dispatched_total,
            dispatch_errors_total,
            geofences_active,
            registry,
        })
    }

    /// Render all metrics as Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metrics_register_without_error() {
        let metrics = AppMetrics::new();
        assert!(metrics.is_ok(), "AppMetrics::new() failed: {:?}", metrics.err());
    }

    #[test]
    fn render_produces_non_empty_output_after_increment() {
        let metrics = AppMetrics::new().unwrap();
        metrics.evaluation_cycles_total.inc();
        let output = metrics.render().unwrap();
        assert!(output.contains("arrival_alarm_evaluation_cycles_total"));
    }

    #[test]
    fn counters_increment_correctly() {
        let metrics = AppMetrics::new().unwrap();
        metrics.evaluation_cycles_total.inc_by(3.0);
        metrics.position_errors_total.inc();
        assert!((metrics.evaluation_cycles_total.get() - 3.0).abs() < f64::EPSILON);
        assert!((metrics.position_errors_total.get() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gauge_set_and_get() {
        let metrics = AppMetrics::new().unwrap();
        metrics.geofences_active.set(2.0);
        assert!((metrics.geofences_active.get() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn incremented_counter_value_appears_in_rendered_output() {
        let metrics = AppMetrics::new().unwrap();
        metrics.alerts_dispatched_total.inc_by(5.0);
        let output = metrics.render().unwrap();
        assert!(output.contains("arrival_alarm_alerts_dispatched_total 5"));
    }
}
