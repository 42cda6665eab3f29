// Errors surfaced by the statistics use cases
use std::fmt;
use thiserror::Error;

/// What a failed request was trying to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Historical,
    Countries,
    TopCountries,
    Overview,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Historical => "historical",
            Self::Countries => "countries",
            Self::TopCountries => "top countries",
            Self::Overview => "overview",
        })
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    /// The provider could not be reached or answered with something unusable.
    /// `detail` keeps the underlying cause for logs; it is not shown to clients.
    #[error("Failed to fetch {resource} data")]
    Upstream { resource: Resource, detail: String },

    /// A query parameter could not be interpreted
    #[error("{0}")]
    InvalidQuery(String),
}

impl StatsError {
    pub fn upstream(resource: Resource, error: &anyhow::Error) -> Self {
        Self::Upstream {
            resource,
            detail: format!("{:#}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_generic() {
        let cause = anyhow::anyhow!("connection refused").context("Failed to reach provider");
        let error = StatsError::upstream(Resource::TopCountries, &cause);

        assert_eq!(error.to_string(), "Failed to fetch top countries data");
        match error {
            StatsError::Upstream { detail, .. } => {
                assert_eq!(detail, "Failed to reach provider: connection refused")
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
