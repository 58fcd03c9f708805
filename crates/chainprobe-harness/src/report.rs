//! Progress and aggregation over the result store.
//!
//! Aggregates are derived, never stored: every read recomputes from a
//! fresh store snapshot so the numbers cannot drift from the recorded
//! outcomes, including mid-way through a run-all pass.

use crate::outcome::{Outcome, OutcomeStatus};
use crate::registry::ScenarioRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pass counts over scenarios that have a recorded outcome.
///
/// A scenario that has never run contributes to neither field; it only
/// appears in [`Aggregate::progress`]'s denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Recorded outcomes with status `Passed`.
    pub passed: usize,
    /// All recorded outcomes.
    pub total: usize,
}

/// Overall security verdict, gated by the critical scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Every critical scenario has a recorded `Passed` outcome.
    Secure,
    /// At least one critical scenario failed, errored, or has not run.
    Insecure,
}

/// Counts derived from one store snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Scenarios in the registry.
    pub total: usize,
    /// Scenarios with a recorded outcome.
    pub completed: usize,
    /// Scenarios with a recorded `Passed` outcome.
    pub passed: usize,
    /// Scenarios flagged critical.
    pub critical_total: usize,
    /// Critical scenarios with a recorded `Passed` outcome.
    pub critical_passed: usize,
}

impl Aggregate {
    /// Computes the aggregate for a registry and a store snapshot.
    pub fn compute(registry: &ScenarioRegistry, outcomes: &HashMap<String, Outcome>) -> Self {
        let mut aggregate = Aggregate {
            total: registry.len(),
            completed: 0,
            passed: 0,
            critical_total: 0,
            critical_passed: 0,
        };

        for scenario in registry.list() {
            let outcome = outcomes.get(scenario.id());
            let passed = outcome.is_some_and(|o| o.status == OutcomeStatus::Passed);

            if outcome.is_some() {
                aggregate.completed += 1;
            }
            if passed {
                aggregate.passed += 1;
            }
            if scenario.critical() {
                aggregate.critical_total += 1;
                if passed {
                    aggregate.critical_passed += 1;
                }
            }
        }

        aggregate
    }

    /// Completion ratio in `[0, 1]`. An empty catalogue reports `1.0`.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Pass ratio over recorded outcomes only.
    pub fn summary(&self) -> Summary {
        Summary {
            passed: self.passed,
            total: self.completed,
        }
    }

    /// Secure iff every critical scenario has passed. A critical scenario
    /// that has never run fails open to `Insecure`.
    pub fn critical_verdict(&self) -> Verdict {
        if self.critical_passed == self.critical_total {
            Verdict::Secure
        } else {
            Verdict::Insecure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Metrics;
    use crate::scenario::Scenario;
    use crate::outcome::RunReport;
    use async_trait::async_trait;
    use chainprobe_chain::{ChainCapability, ChainError};

    struct StubScenario {
        id: String,
        critical: bool,
    }

    impl StubScenario {
        fn boxed(id: &str, critical: bool) -> Box<dyn Scenario> {
            Box::new(Self {
                id: id.to_string(),
                critical,
            })
        }
    }

    #[async_trait]
    impl Scenario for StubScenario {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.id
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn critical(&self) -> bool {
            self.critical
        }

        async fn run(&self, _chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
            Ok(RunReport::new(true, "stub"))
        }
    }

    fn registry_abc() -> ScenarioRegistry {
        ScenarioRegistry::new(vec![
            StubScenario::boxed("a", true),
            StubScenario::boxed("b", true),
            StubScenario::boxed("c", false),
        ])
        .unwrap()
    }

    #[test]
    fn test_critical_mix_from_partial_run() {
        // A passed, B failed, C never run.
        let registry = registry_abc();
        let mut outcomes = HashMap::new();
        outcomes.insert("a".to_string(), Outcome::passed("ok", Metrics::new()));
        outcomes.insert("b".to_string(), Outcome::failed("nope", Metrics::new()));

        let aggregate = Aggregate::compute(&registry, &outcomes);

        assert_eq!(aggregate.critical_verdict(), Verdict::Insecure);
        assert_eq!(
            aggregate.summary(),
            Summary {
                passed: 1,
                total: 2
            }
        );
        assert!((aggregate.progress() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_passed_is_secure() {
        let registry = registry_abc();
        let mut outcomes = HashMap::new();
        for id in ["a", "b", "c"] {
            outcomes.insert(id.to_string(), Outcome::passed("ok", Metrics::new()));
        }

        let aggregate = Aggregate::compute(&registry, &outcomes);

        assert_eq!(aggregate.critical_verdict(), Verdict::Secure);
        assert!((aggregate.progress() - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            aggregate.summary(),
            Summary {
                passed: 3,
                total: 3
            }
        );
    }

    #[test]
    fn test_unrun_critical_fails_open() {
        let registry = registry_abc();
        let outcomes = HashMap::new();

        let aggregate = Aggregate::compute(&registry, &outcomes);

        assert_eq!(aggregate.critical_verdict(), Verdict::Insecure);
        assert!((aggregate.progress()).abs() < f64::EPSILON);
        assert_eq!(
            aggregate.summary(),
            Summary {
                passed: 0,
                total: 0
            }
        );
    }

    #[test]
    fn test_errored_critical_is_insecure() {
        let registry = registry_abc();
        let mut outcomes = HashMap::new();
        outcomes.insert("a".to_string(), Outcome::passed("ok", Metrics::new()));
        outcomes.insert("b".to_string(), Outcome::errored("rpc down"));
        outcomes.insert("c".to_string(), Outcome::passed("ok", Metrics::new()));

        let aggregate = Aggregate::compute(&registry, &outcomes);
        assert_eq!(aggregate.critical_verdict(), Verdict::Insecure);
    }

    #[test]
    fn test_no_critical_scenarios_is_vacuously_secure() {
        let registry = ScenarioRegistry::new(vec![StubScenario::boxed("x", false)]).unwrap();
        let aggregate = Aggregate::compute(&registry, &HashMap::new());
        assert_eq!(aggregate.critical_verdict(), Verdict::Secure);
    }

    #[test]
    fn test_empty_catalogue_progress_is_complete() {
        let registry = ScenarioRegistry::new(vec![]).unwrap();
        let aggregate = Aggregate::compute(&registry, &HashMap::new());
        assert!((aggregate.progress() - 1.0).abs() < f64::EPSILON);
    }
}
