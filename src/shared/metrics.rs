//! Prometheus Metrics Module
//!
//! 撮合引擎核心指标
//!
//! ```rust,ignore
//! use venue_matcher::shared::metrics::METRICS;
//!
//! METRICS.orders_total.with_label_values(&["buy", "PETR4"]).inc();
//! let timer = METRICS.matching_duration.with_label_values(&["PETR4"]).start_timer();
//! // ... match ...
//! timer.observe_duration();
//! ```

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};

lazy_static! {
    pub static ref METRICS: Metrics = Metrics::new();
}

pub struct Metrics {
    /// Orders routed into the book, by order_type and asset
    pub orders_total: CounterVec,

    /// Transactions executed, by asset
    pub transactions_total: CounterVec,

    /// Shares traded, by asset
    pub shares_traded_total: CounterVec,

    /// Seconds spent in one `match_order` call
    pub matching_duration: HistogramVec,

    /// Resting orders per asset and side
    pub resting_orders: GaugeVec,

    /// Orders rejected or skipped, by reason
    pub rejected_orders_total: CounterVec,
}

impl Metrics {
    fn new() -> Self {
        Self {
            orders_total: register_counter_vec!(
                "venue_matcher_orders_total",
                "Total number of orders routed to the order book",
                &["order_type", "asset"]
            )
            .expect("register venue_matcher_orders_total"),

            transactions_total: register_counter_vec!(
                "venue_matcher_transactions_total",
                "Total number of transactions executed",
                &["asset"]
            )
            .expect("register venue_matcher_transactions_total"),

            shares_traded_total: register_counter_vec!(
                "venue_matcher_shares_traded_total",
                "Total number of shares traded",
                &["asset"]
            )
            .expect("register venue_matcher_shares_traded_total"),

            matching_duration: register_histogram_vec!(
                "venue_matcher_matching_duration_seconds",
                "Time spent matching one incoming order",
                &["asset"],
                vec![1e-6, 5e-6, 1e-5, 5e-5, 1e-4, 5e-4, 1e-3, 5e-3]
            )
            .expect("register venue_matcher_matching_duration_seconds"),

            resting_orders: register_gauge_vec!(
                "venue_matcher_resting_orders",
                "Orders currently resting in the book",
                &["asset", "side"]
            )
            .expect("register venue_matcher_resting_orders"),

            rejected_orders_total: register_counter_vec!(
                "venue_matcher_rejected_orders_total",
                "Orders rejected before or skipped during matching",
                &["reason"]
            )
            .expect("register venue_matcher_rejected_orders_total"),
        }
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
