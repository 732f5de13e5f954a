use reqwest::StatusCode;
use thiserror::Error;

/// Failure at the geocoding or forecast collaborator boundary.
///
/// Two kinds matter to callers: transport problems (network error,
/// non-success status, undecodable body) and valid-but-empty responses.
/// Geocoding failures of either kind resolve to "no suggestions shown";
/// forecast failures surface once to the user and abort the whole update.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to the {service} service failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} returned no results")]
    Empty { service: &'static str },
}

impl FetchError {
    /// True for a valid response that simply contained no matches.
    pub fn is_empty(&self) -> bool {
        matches!(self, FetchError::Empty { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_distinguishable_from_transport_kinds() {
        let err = FetchError::Empty {
            service: "geocoding",
        };
        assert!(err.is_empty());
        assert!(err.to_string().contains("no results"));

        let err = FetchError::Status {
            service: "forecast",
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert!(!err.is_empty());
        assert!(err.to_string().contains("502"));
    }
}
