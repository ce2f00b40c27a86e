use thiserror::Error;

/// Why a fetch cycle failed. Every variant is collapsed into a single
/// "cycle failed" outcome by the refresh worker.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, connect, TLS, timeout, body read.
    #[error("network error on {endpoint}: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Http {
        endpoint: &'static str,
        status: u16,
    },

    /// Body did not match the expected shape.
    #[error("failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            FetchError::Network { endpoint, .. }
            | FetchError::Http { endpoint, .. }
            | FetchError::Parse { endpoint, .. } => endpoint,
        }
    }

    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "network",
            FetchError::Http { .. } => "http",
            FetchError::Parse { .. } => "parse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_names_endpoint_and_status() {
        let err = FetchError::Http { endpoint: "search/trending", status: 429 };
        assert_eq!(err.to_string(), "search/trending returned HTTP 429");
        assert_eq!(err.kind(), "http");
        assert_eq!(err.endpoint(), "search/trending");
    }

    #[test]
    fn parse_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::Parse { endpoint: "simple/price", source };
        assert!(err.to_string().starts_with("failed to parse simple/price response"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
