use crate::{Config, ConditionSnapshot, Coordinate, FetchError, provider::open_meteo::OpenMeteoProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Source of sea conditions for a coordinate.
///
/// Implementations report metric units (km/h, m, °C) and must return an error
/// rather than a zeroed snapshot when they have nothing to say.
#[async_trait]
pub trait ConditionProvider: Send + Sync + Debug {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ConditionSnapshot, FetchError>;
}

#[async_trait]
impl<T: ConditionProvider + ?Sized> ConditionProvider for Box<T> {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ConditionSnapshot, FetchError> {
        (**self).fetch(coordinate).await
    }
}

/// Construct the configured provider.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ConditionProvider>> {
    let provider = OpenMeteoProvider::from_config(&config.provider)?;
    Ok(Box::new(provider))
}
