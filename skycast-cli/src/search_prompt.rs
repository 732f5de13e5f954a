//! Interactive city picker: an inquire text prompt whose autocomplete is
//! backed by the debounced search session, plus a fallback selection list
//! for free-typed names.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use inquire::{
    Autocomplete, CustomUserError, InquireError, Select, Text, autocompletion::Replacement,
};

use skycast_core::{Config, GeocodingService, SearchSession, SelectedCity};

/// Outcome of one round of city picking.
pub enum Pick {
    City(SelectedCity),
    NoMatch,
    Cancelled,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bridges inquire's synchronous per-keystroke callback onto the async
/// search session. Each keystroke resets the debounce; suggestion batches
/// land on a channel and the freshest one is shown on the next redraw.
#[derive(Clone)]
struct CityAutocomplete {
    session: Arc<Mutex<SearchSession>>,
    latest: Arc<Mutex<Vec<SelectedCity>>>,
}

impl Autocomplete for CityAutocomplete {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let mut session = lock(&self.session);
        session.input_changed(input);
        if let Some(batch) = session.latest_suggestions() {
            *lock(&self.latest) = batch;
        }
        Ok(lock(&self.latest)
            .iter()
            .map(SelectedCity::display_name)
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// Run the search prompt until the user picks a city or cancels.
pub async fn pick_city(geocoder: Arc<dyn GeocodingService>, config: &Config) -> anyhow::Result<Pick> {
    let session = SearchSession::new(
        Arc::clone(&geocoder),
        config.debounce(),
        config.suggestion_limit,
    );
    let latest = Arc::new(Mutex::new(Vec::new()));
    let autocomplete = CityAutocomplete {
        session: Arc::new(Mutex::new(session)),
        latest: Arc::clone(&latest),
    };

    let typed = tokio::task::spawn_blocking(move || {
        Text::new("City:")
            .with_autocomplete(autocomplete)
            .with_help_message("Type at least two characters, pick a suggestion with Tab/Enter")
            .prompt()
    })
    .await
    .context("Prompt task failed")?;

    let typed = match typed {
        Ok(typed) => typed,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(Pick::Cancelled);
        }
        Err(err) => return Err(err).context("City prompt failed"),
    };

    // The prompt hands back plain text; map it onto the suggestion it came from.
    let suggested = lock(&latest).clone();
    if let Some(city) = suggested
        .iter()
        .find(|city| city.display_name() == typed)
    {
        return Ok(Pick::City(city.clone()));
    }

    // Free-typed name: one-shot lookup, then let the user disambiguate.
    let matches = match geocoder
        .search(typed.trim(), config.suggestion_limit)
        .await
    {
        Ok(matches) => matches,
        Err(err) => {
            tracing::debug!(%err, "city lookup failed");
            return Ok(Pick::NoMatch);
        }
    };

    if matches.len() == 1 {
        let Some(city) = matches.into_iter().next() else {
            return Ok(Pick::NoMatch);
        };
        return Ok(Pick::City(city));
    }

    let options: Vec<String> = matches.iter().map(SelectedCity::display_name).collect();
    let picked = tokio::task::spawn_blocking(move || Select::new("Which city?", options).prompt())
        .await
        .context("Prompt task failed")?;

    match picked {
        Ok(choice) => Ok(matches
            .into_iter()
            .find(|city| city.display_name() == choice)
            .map_or(Pick::NoMatch, Pick::City)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(Pick::Cancelled)
        }
        Err(err) => Err(err).context("City selection failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::provider::openmeteo::OpenMeteoClient;
    use std::time::Duration;

    #[tokio::test]
    async fn completion_echoes_the_highlighted_suggestion() {
        let geocoder = Arc::new(OpenMeteoClient::new()) as Arc<dyn GeocodingService>;
        let session = SearchSession::new(geocoder, Duration::from_millis(30), 5);
        let mut autocomplete = CityAutocomplete {
            session: Arc::new(Mutex::new(session)),
            latest: Arc::new(Mutex::new(Vec::new())),
        };

        let completion = autocomplete
            .get_completion("madr", Some("Madrid, Madrid, Spain".to_string()))
            .expect("completion never fails");
        assert_eq!(completion.as_deref(), Some("Madrid, Madrid, Spain"));

        let none = autocomplete
            .get_completion("madr", None)
            .expect("completion never fails");
        assert!(none.is_none());
    }
}
