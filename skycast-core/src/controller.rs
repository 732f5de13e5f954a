//! Application state and the fetch-and-project flow.
//!
//! One controller owns the selected city and the active temperature unit;
//! there is no module-level mutable state. Every forecast request carries a
//! monotonically increasing token and results that are no longer the most
//! recent issued are discarded, so a slow stale response can never
//! overwrite fresher state.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{
    error::FetchError,
    model::{ForecastRequest, SelectedCity, TemperatureUnit, ViewModel},
    project,
    provider::ForecastService,
};

/// Issues monotonically increasing request tokens and answers whether a
/// token is still the most recent one issued.
#[derive(Debug, Default)]
pub struct TokenIssuer {
    issued: AtomicU64,
}

impl TokenIssuer {
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == token
    }
}

/// Mutable application state: at most one selected city at a time, plus the
/// active unit. Replaced wholesale on selection, never field-by-field.
#[derive(Debug, Clone, Default)]
struct AppState {
    selected: Option<SelectedCity>,
    unit: TemperatureUnit,
}

/// Controller owning the application state and the forecast collaborator.
#[derive(Debug)]
pub struct App {
    forecaster: Arc<dyn ForecastService>,
    tokens: TokenIssuer,
    state: Mutex<AppState>,
}

impl App {
    pub fn new(forecaster: Arc<dyn ForecastService>, unit: TemperatureUnit) -> Self {
        Self {
            forecaster,
            tokens: TokenIssuer::default(),
            state: Mutex::new(AppState {
                selected: None,
                unit,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the selected city wholesale.
    pub fn select_city(&self, city: SelectedCity) {
        self.state().selected = Some(city);
    }

    pub fn selected_city(&self) -> Option<SelectedCity> {
        self.state().selected.clone()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.state().unit
    }

    /// Flip the unit and return the new value. The caller re-fetches with
    /// the same coordinates; the service does the conversion.
    pub fn toggle_unit(&self) -> TemperatureUnit {
        let mut state = self.state();
        state.unit = state.unit.toggled();
        state.unit
    }

    /// Fetch a forecast for the selected city and project it.
    ///
    /// Returns `Ok(None)` when no city is selected, or when a newer request
    /// was issued while this one was in flight (the stale result is
    /// discarded). A fetch failure aborts the whole update: no partial
    /// merging, and the caller keeps whatever view it already has.
    pub async fn refresh(&self) -> Result<Option<ViewModel>, FetchError> {
        let (city, unit) = {
            let state = self.state();
            match &state.selected {
                Some(city) => (city.clone(), state.unit),
                None => return Ok(None),
            }
        };

        let token = self.tokens.issue();
        let request = ForecastRequest {
            latitude: city.latitude,
            longitude: city.longitude,
            unit,
        };

        let data = self.forecaster.fetch(&request).await?;

        if !self.tokens.is_current(token) {
            debug!(token, "discarding stale forecast response");
            return Ok(None);
        }

        Ok(Some(project::view_model(&data)))
    }
}
