use crate::{
    error::FetchError,
    model::{ForecastData, ForecastRequest, SelectedCity},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

/// Free-text city lookup against the geocoding collaborator.
///
/// Zero matches is reported as [`FetchError::Empty`]; callers on the
/// suggestion path treat it the same as a transport failure and simply
/// show nothing.
#[async_trait]
pub trait GeocodingService: Send + Sync + Debug {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<SelectedCity>, FetchError>;
}

/// Forecast lookup by coordinates and unit against the forecast collaborator.
#[async_trait]
pub trait ForecastService: Send + Sync + Debug {
    async fn fetch(&self, request: &ForecastRequest) -> Result<ForecastData, FetchError>;
}
