//! Outcome and metric models.
//!
//! An [`Outcome`] is the recorded result of one scenario execution. The
//! constructors are the only way to build one, which keeps the invariant
//! that `error` is set if and only if the status is
//! [`OutcomeStatus::Errored`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Terminal status of a scenario execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The runner completed and its success flag was set.
    Passed,
    /// The runner completed but its success flag was not set.
    Failed,
    /// The runner raised an error (capability failure, timeout).
    Errored,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Passed => write!(f, "passed"),
            OutcomeStatus::Failed => write!(f, "failed"),
            OutcomeStatus::Errored => write!(f, "errored"),
        }
    }
}

/// A scenario-reported metric value.
///
/// Metrics are opaque to the harness; the tagged union only pins down the
/// display kinds so reports serialize stably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    /// A numeric reading.
    Number(f64),
    /// A preformatted string.
    Text(String),
    /// A point in time.
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => write!(f, "{s}"),
            MetricValue::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(n: f64) -> Self {
        MetricValue::Number(n)
    }
}

impl From<u64> for MetricValue {
    fn from(n: u64) -> Self {
        MetricValue::Number(n as f64)
    }
}

impl From<u128> for MetricValue {
    fn from(n: u128) -> Self {
        MetricValue::Number(n as f64)
    }
}

impl From<bool> for MetricValue {
    fn from(b: bool) -> Self {
        MetricValue::Text(b.to_string())
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl From<DateTime<Utc>> for MetricValue {
    fn from(t: DateTime<Utc>) -> Self {
        MetricValue::Timestamp(t)
    }
}

/// Scenario metrics, keyed by display name. BTreeMap keeps report output
/// in a stable order.
pub type Metrics = BTreeMap<String, MetricValue>;

/// What a runner returns when it settles without raising an error.
///
/// The coordinator classifies the report: `success` becomes
/// [`OutcomeStatus::Passed`] or [`OutcomeStatus::Failed`].
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Scenario-defined success flag.
    pub success: bool,

    /// Human-readable one-line summary.
    pub detail: String,

    /// Scenario-specific metrics.
    pub metrics: Metrics,
}

impl RunReport {
    /// Creates a report with the given success flag and summary line.
    pub fn new(success: bool, detail: impl Into<String>) -> Self {
        Self {
            success,
            detail: detail.into(),
            metrics: Metrics::new(),
        }
    }

    /// Attaches a metric.
    pub fn with_metric(mut self, key: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(key.into(), value.into());
        self
    }
}

/// The recorded result of one scenario execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// How the run settled.
    pub status: OutcomeStatus,

    /// Scenario-specific metrics (empty for errored runs).
    pub metrics: Metrics,

    /// Human-readable one-line summary.
    pub detail: String,

    /// Failure message. Set if and only if `status` is `Errored`.
    pub error: Option<String>,

    /// When the run settled.
    pub completed_at: DateTime<Utc>,
}

impl Outcome {
    /// Outcome for a runner that completed with its success flag set.
    pub fn passed(detail: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            status: OutcomeStatus::Passed,
            metrics,
            detail: detail.into(),
            error: None,
            completed_at: Utc::now(),
        }
    }

    /// Outcome for a runner that completed with its success flag unset.
    pub fn failed(detail: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            status: OutcomeStatus::Failed,
            metrics,
            detail: detail.into(),
            error: None,
            completed_at: Utc::now(),
        }
    }

    /// Outcome for a runner that raised an error.
    pub fn errored(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: OutcomeStatus::Errored,
            metrics: Metrics::new(),
            detail: message.clone(),
            error: Some(message),
            completed_at: Utc::now(),
        }
    }

    /// True when the run passed.
    pub fn is_passed(&self) -> bool {
        self.status == OutcomeStatus::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_set_iff_errored() {
        let passed = Outcome::passed("ok", Metrics::new());
        assert_eq!(passed.status, OutcomeStatus::Passed);
        assert!(passed.error.is_none());

        let failed = Outcome::failed("not ok", Metrics::new());
        assert_eq!(failed.status, OutcomeStatus::Failed);
        assert!(failed.error.is_none());

        let errored = Outcome::errored("boom");
        assert_eq!(errored.status, OutcomeStatus::Errored);
        assert_eq!(errored.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_run_report_builder() {
        let report = RunReport::new(true, "all checks held")
            .with_metric("staked", 10_000u64)
            .with_metric("rate", 0.042)
            .with_metric("wallet", "0xfeed");

        assert!(report.success);
        assert_eq!(report.metrics.len(), 3);
        assert_eq!(
            report.metrics.get("staked"),
            Some(&MetricValue::Number(10_000.0))
        );
        assert_eq!(
            report.metrics.get("wallet"),
            Some(&MetricValue::Text("0xfeed".into()))
        );
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Number(1.5).to_string(), "1.5");
        assert_eq!(MetricValue::Text("hi".into()).to_string(), "hi");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = Outcome::passed(
            "done",
            [("count".to_string(), MetricValue::Number(3.0))].into(),
        );
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"passed\""));

        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, OutcomeStatus::Passed);
        assert_eq!(back.metrics.len(), 1);
    }

    #[test]
    fn test_metrics_keys_sorted() {
        let report = RunReport::new(true, "ordered")
            .with_metric("zeta", 1u64)
            .with_metric("alpha", 2u64);
        let keys: Vec<_> = report.metrics.keys().cloned().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
