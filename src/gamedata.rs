//! Owning wrapper around a provider game-data object and its scenario.

use std::collections::BTreeSet;
use std::path::Path;

use crate::backend::{self, GameData, Scenario};
use crate::error::{CoreError, RetroFailure};

/// The only agent rewards are read for.
pub const AGENT: u32 = 0;

/// Result of loading both definitions.
///
/// The two loads are independent, so either can fail on its own.
#[derive(Debug)]
pub struct LoadOutcome {
    pub data: Result<(), CoreError>,
    pub scenario: Result<(), CoreError>,
}

impl LoadOutcome {
    pub fn is_ok(&self) -> bool {
        self.data.is_ok() && self.scenario.is_ok()
    }

    /// Collapse to the first failure, data before scenario.
    pub fn into_result(self) -> Result<(), RetroFailure> {
        self.data.map_err(RetroFailure::DataLoad)?;
        self.scenario.map_err(RetroFailure::ScenarioLoad)
    }
}

/// One button group and the values it may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet {
    pub key: i32,
    pub values: BTreeSet<i32>,
}

/// The scenario's action space, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidActions(Vec<ActionSet>);

impl ValidActions {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionSet> {
        self.0.iter()
    }

    /// Value sets as button bit combinations, ordered by key.
    pub fn button_combos(&self) -> Vec<Vec<u64>> {
        self.0
            .iter()
            .map(|set| set.values.iter().map(|&v| v as u64).collect())
            .collect()
    }
}

impl IntoIterator for ValidActions {
    type Item = ActionSet;
    type IntoIter = std::vec::IntoIter<ActionSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Game RAM variables plus the scenario scored against them.
pub struct RetroGameData {
    // Declared first so it is dropped before the data it reads.
    scenario: Box<dyn Scenario>,
    data: Box<dyn GameData>,
}

impl RetroGameData {
    /// Create both objects from the installed provider, data first.
    pub fn new() -> Result<Self, RetroFailure> {
        let provider = backend::provider()?;
        let data = provider.new_game_data();
        let scenario = provider.new_scenario();
        Ok(Self { scenario, data })
    }

    /// Load the data definition and the scenario definition.
    pub fn load(&mut self, data_path: impl AsRef<Path>, scenario_path: impl AsRef<Path>) -> LoadOutcome {
        let data = self.data.load(data_path.as_ref());
        let scenario = self.scenario.load(scenario_path.as_ref(), &*self.data);

        if let Err(e) = &data {
            tracing::warn!(path = %data_path.as_ref().display(), error = %e, "game data failed to load");
        }
        if let Err(e) = &scenario {
            tracing::warn!(path = %scenario_path.as_ref().display(), error = %e, "scenario failed to load");
        }
        LoadOutcome { data, scenario }
    }

    /// Restart the scenario and reload its scripts.
    pub fn reset(&mut self) {
        self.scenario.restart();
        self.scenario.reload_scripts(&*self.data);
    }

    /// Snapshot RAM, then evaluate the scenario for this tick.
    pub fn update_ram(&mut self) {
        self.data.update_ram();
        self.scenario.update(&*self.data);
    }

    pub fn current_reward(&self) -> f32 {
        self.scenario.current_reward(AGENT)
    }

    pub fn total_reward(&self) -> f32 {
        self.scenario.total_reward(AGENT)
    }

    pub fn is_done(&self) -> bool {
        self.scenario.is_done()
    }

    pub fn valid_actions(&self) -> ValidActions {
        ValidActions(
            self.scenario
                .valid_actions()
                .into_iter()
                .map(|(key, values)| ActionSet { key, values })
                .collect(),
        )
    }

    pub fn lookup_value(&self, name: &str) -> Result<i64, RetroFailure> {
        self.data
            .lookup_value(name)
            .ok_or_else(|| RetroFailure::UnknownVariable(name.to_string()))
    }

    pub(crate) fn data_mut(&mut self) -> &mut dyn GameData {
        &mut *self.data
    }
}
