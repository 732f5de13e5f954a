//! Debounced city search.
//!
//! Keystrokes reset a cancel-and-restart quiescence timer (300 ms by
//! default); only after the input goes quiet does a geocoding request go
//! out. Completed lookups arrive as token-stamped batches so that an
//! out-of-order response can never replace fresher suggestions, and
//! lookups that fail (transport trouble or zero matches) resolve to an
//! empty batch: suggestions clear silently, no user-visible error.

use std::sync::Arc;
use std::time::Duration;

use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle, time};
use tracing::debug;

use crate::{controller::TokenIssuer, model::SelectedCity, provider::GeocodingService};

/// Quiescence window after the last keystroke.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this (trimmed) clear suggestions without a lookup.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug)]
struct SuggestionBatch {
    token: u64,
    cities: Vec<SelectedCity>,
}

/// One live search box worth of state.
#[derive(Debug)]
pub struct SearchSession {
    geocoder: Arc<dyn GeocodingService>,
    quiescence: Duration,
    limit: u8,
    tokens: Arc<TokenIssuer>,
    handle: Handle,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SuggestionBatch>,
    rx: mpsc::UnboundedReceiver<SuggestionBatch>,
}

impl SearchSession {
    /// Must be created inside a tokio runtime; lookups run as spawned tasks.
    pub fn new(geocoder: Arc<dyn GeocodingService>, quiescence: Duration, limit: u8) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            geocoder,
            quiescence,
            limit,
            tokens: Arc::new(TokenIssuer::default()),
            handle: Handle::current(),
            pending: None,
            tx,
            rx,
        }
    }

    /// Feed the current content of the search box. Cancels any pending
    /// debounce timer and restarts it; too-short queries clear suggestions
    /// immediately without issuing a request.
    pub fn input_changed(&mut self, query: &str) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let query = query.trim().to_owned();
        if query.chars().count() < MIN_QUERY_LEN {
            let token = self.tokens.issue();
            let _ = self.tx.send(SuggestionBatch {
                token,
                cities: Vec::new(),
            });
            return;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let tokens = Arc::clone(&self.tokens);
        let tx = self.tx.clone();
        let quiescence = self.quiescence;
        let limit = self.limit;

        self.pending = Some(self.handle.spawn(async move {
            time::sleep(quiescence).await;

            let token = tokens.issue();
            let cities = match geocoder.search(&query, limit).await {
                Ok(cities) => cities,
                Err(err) => {
                    debug!(%err, %query, "city lookup failed; clearing suggestions");
                    Vec::new()
                }
            };
            if !tokens.is_current(token) {
                debug!(token, "dropping stale suggestion batch");
                return;
            }
            let _ = tx.send(SuggestionBatch { token, cities });
        }));
    }

    /// Drain delivered batches and return the newest one, if any arrived
    /// since the last call. `Some(vec![])` means "clear the list".
    pub fn latest_suggestions(&mut self) -> Option<Vec<SelectedCity>> {
        let mut newest: Option<SuggestionBatch> = None;
        while let Ok(batch) = self.rx.try_recv() {
            if newest
                .as_ref()
                .is_none_or(|current| batch.token > current.token)
            {
                newest = Some(batch);
            }
        }
        newest.map(|batch| batch.cities)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
