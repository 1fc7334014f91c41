use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::{ConditionProvider, ConditionSnapshot, Coordinate, FetchError};

/// Provider that replays queued results and records what was asked.
#[derive(Debug, Default)]
pub(crate) struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ConditionSnapshot, FetchError>>>,
    calls: Mutex<Vec<Coordinate>>,
}

impl ScriptedProvider {
    pub(crate) fn new(
        results: impl IntoIterator<Item = Result<ConditionSnapshot, FetchError>>,
    ) -> Self {
        Self { script: Mutex::new(results.into_iter().collect()), calls: Mutex::new(Vec::new()) }
    }

    pub(crate) fn push(&self, result: Result<ConditionSnapshot, FetchError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub(crate) fn calls(&self) -> Vec<Coordinate> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConditionProvider for ScriptedProvider {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ConditionSnapshot, FetchError> {
        self.calls.lock().unwrap().push(coordinate);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::unreachable("script exhausted")))
    }
}

pub(crate) fn snapshot(wind: f64, wave: Option<f64>) -> ConditionSnapshot {
    ConditionSnapshot::new(wind, wave, Some(27.5)).unwrap()
}

pub(crate) fn point(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}
