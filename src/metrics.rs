//! Query instrumentation.
//!
//! With the `metrics` feature, query counts and durations are recorded through
//! OpenTelemetry and exported in Prometheus format. With the `tracing` feature,
//! every statement runs inside a `lifepress.query` span.

#[cfg(feature = "metrics")]
pub use self::prometheus_metrics::{LifepressMetrics, METRICS};

#[cfg(feature = "metrics")]
mod prometheus_metrics {
    use once_cell::sync::Lazy;
    use opentelemetry::metrics::{Counter, Histogram, MeterProvider};
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::{Registry, TextEncoder};

    pub static METRICS: Lazy<LifepressMetrics> = Lazy::new(LifepressMetrics::init);

    /// Query instruments backed by a Prometheus registry
    ///
    /// The registry is owned by lifepress; serve [`LifepressMetrics::encode`]
    /// (or gather [`LifepressMetrics::registry`]) from the application's
    /// scrape endpoint.
    pub struct LifepressMetrics {
        registry: Registry,
        provider: SdkMeterProvider,
        pub queries_total: Counter<u64>,
        pub query_errors_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
    }

    impl LifepressMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let exporter = opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build();

            let provider = match exporter {
                Ok(exporter) => SdkMeterProvider::builder().with_reader(exporter).build(),
                Err(e) => {
                    log::warn!("prometheus exporter unavailable, metrics stay in-process: {e}");
                    SdkMeterProvider::builder().build()
                }
            };
            let meter = provider.meter("lifepress");

            let queries_total = meter
                .u64_counter("lifepress_queries_total")
                .with_description("Total queries executed")
                .build();

            let query_errors_total = meter
                .u64_counter("lifepress_query_errors_total")
                .with_description("Queries rejected by the database")
                .build();

            let query_duration = meter
                .f64_histogram("lifepress_query_duration_seconds")
                .with_description("Duration of queries")
                .build();

            Self {
                registry,
                provider,
                queries_total,
                query_errors_total,
                query_duration,
            }
        }

        /// Registry the exporter writes into
        pub fn registry(&self) -> &Registry {
            &self.registry
        }

        pub fn provider(&self) -> &SdkMeterProvider {
            &self.provider
        }

        /// Current metrics in the Prometheus text exposition format
        pub fn encode(&self) -> Result<String, prometheus::Error> {
            TextEncoder::new().encode_to_string(&self.registry.gather())
        }

        pub fn record_query(&self, elapsed: std::time::Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors_total.add(1, &[]);
        }
    }

}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    /// Span wrapping a single statement execution
    pub fn execute_query_span(sql: &str) -> Span {
        tracing::debug_span!("lifepress.query", db.statement = %sql)
    }

    /// Span wrapping connection establishment
    pub fn acquire_connection_span(backend: &str) -> Span {
        tracing::debug_span!("lifepress.connect", db.system = %backend)
    }

    /// Span wrapping a relation load for a whole result set
    pub fn eager_load_span(relation: &'static str, parents: usize) -> Span {
        tracing::debug_span!("lifepress.eager_load", relation, parents)
    }
}
