//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Weather-code classification and backdrop selection
//! - Projection of raw forecast data into display-ready view models
//! - Abstractions over the geocoding and forecast collaborators
//! - Application state, request tokens, and the debounced city search
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod project;
pub mod provider;
pub mod search;

pub use classify::{
    AnimationKind, BackgroundProfile, Category, Classification, WeatherCode, background_for,
    classify,
};
pub use config::Config;
pub use controller::App;
pub use error::FetchError;
pub use model::{ForecastData, ForecastRequest, SelectedCity, TemperatureUnit, ViewModel};
pub use provider::{ForecastService, GeocodingService};
pub use search::SearchSession;
