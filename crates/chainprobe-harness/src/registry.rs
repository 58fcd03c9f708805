//! Fixed catalogue of registered scenarios.

use crate::error::HarnessError;
use crate::scenario::Scenario;
use std::collections::HashSet;

/// The scenario catalogue, fixed at construction.
///
/// Ids are unique and [`list`](ScenarioRegistry::list) returns scenarios
/// in declaration order, which is also the order `run_all` executes them
/// in. There is no dynamic addition or removal at runtime.
#[derive(Debug)]
pub struct ScenarioRegistry {
    scenarios: Vec<Box<dyn Scenario>>,
}

impl ScenarioRegistry {
    /// Builds a registry, rejecting duplicate ids.
    pub fn new(scenarios: Vec<Box<dyn Scenario>>) -> Result<Self, HarnessError> {
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.id().to_string()) {
                return Err(HarnessError::DuplicateId(scenario.id().to_string()));
            }
        }
        Ok(Self { scenarios })
    }

    /// Returns the catalogue in declaration order.
    pub fn list(&self) -> Vec<&dyn Scenario> {
        self.scenarios.iter().map(AsRef::as_ref).collect()
    }

    /// Looks up a scenario by id.
    ///
    /// An unknown id is a programming error in the caller (a trigger
    /// referencing a stale id), surfaced loudly as
    /// [`HarnessError::NotFound`].
    pub fn get(&self, id: &str) -> Result<&dyn Scenario, HarnessError> {
        self.scenarios
            .iter()
            .find(|s| s.id() == id)
            .map(AsRef::as_ref)
            .ok_or_else(|| HarnessError::NotFound(id.to_string()))
    }

    /// Number of registered scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// True when the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
