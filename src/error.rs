use thiserror::Error;

use crate::provider::ProviderError;
use crate::ranking::RankingError;

/// Top-level error taxonomy. Every handler path collapses to one of the
/// wire result codes: `success`, `error_bad_request`, `error_datasource`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or unknown query parameters. Detected at the boundary,
    /// before the ranking core is invoked.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upstream provider failed or returned no usable data.
    #[error("data source unavailable: {0}")]
    DataSourceUnavailable(String),
}

impl ServiceError {
    /// The `result` code surfaced to the caller.
    pub fn result_code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "error_bad_request",
            ServiceError::DataSourceUnavailable(_) => "error_datasource",
        }
    }
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        match err {
            // An unknown team slug is a caller mistake, not an outage.
            ProviderError::UnknownTeam(team) => {
                ServiceError::BadRequest(format!("unknown team '{}'", team))
            }
            other => ServiceError::DataSourceUnavailable(other.to_string()),
        }
    }
}

impl From<RankingError> for ServiceError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::NoData => {
                ServiceError::DataSourceUnavailable("no events retrieved".into())
            }
        }
    }
}
