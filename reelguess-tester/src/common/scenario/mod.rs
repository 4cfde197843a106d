pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::catalog_scenarios;

/// A named logic scenario.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            key: "custom",
            name: name.into(),
            plan,
        }
    }

    #[must_use]
    pub const fn with_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }
}

/// Look up a scenario by key or alias.
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = match name.to_lowercase().as_str() {
        "smoke" => "smoke",
        "daily-determinism" | "determinism" => "daily-determinism",
        "attempt-cap" | "cap" => "attempt-cap",
        "clue-monotonicity" | "clues" => "clue-monotonicity",
        "rehydration" | "reload" => "rehydration",
        "random-replay" | "replay" => "random-replay",
        "solver" => "solver",
        _ => return None,
    };
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, String)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        let listed = list_scenarios();
        assert_eq!(listed.len(), 7);
        for (key, name) in listed {
            let scenario = get_scenario(key).unwrap();
            assert_eq!(scenario.name, name);
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert_eq!(get_scenario("REPLAY").map(|s| s.key), Some("random-replay"));
        assert_eq!(get_scenario("cap").map(|s| s.key), Some("attempt-cap"));
        assert!(get_scenario("vehicle-system").is_none());
    }
}
