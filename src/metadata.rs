//! Movie metadata lookups.
//!
//! Handlers only see [`MetadataProvider`]; the production implementation is
//! [`crate::tmdb::TmdbClient`].

use async_trait::async_trait;

use crate::models::{Candidate, MovieDetail};

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("request to metadata provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("metadata provider returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Free-text title search. Results are in provider relevance order.
    async fn search(&self, title: &str) -> Result<Vec<Candidate>, MetadataError>;

    /// Full record for one external id.
    async fn detail(&self, id: i64) -> Result<MovieDetail, MetadataError>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;

    use super::*;

    /// In-memory provider; `fail` simulates a provider outage on every call.
    #[derive(Clone, Default)]
    pub struct FakeProvider {
        pub candidates: Vec<Candidate>,
        pub details: HashMap<i64, MovieDetail>,
        pub fail: bool,
    }

    impl FakeProvider {
        pub fn with_movie(mut self, detail: MovieDetail, release_date: &str) -> Self {
            self.candidates.push(Candidate {
                id: detail.id,
                title: detail.title.clone(),
                release_date: Some(release_date.to_string()),
                overview: Some(detail.description.clone()),
            });
            self.details.insert(detail.id, detail);
            self
        }

        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        fn outage() -> MetadataError {
            MetadataError::Api { status: 503, message: "simulated outage".to_string() }
        }
    }

    #[async_trait]
    impl MetadataProvider for FakeProvider {
        async fn search(&self, title: &str) -> Result<Vec<Candidate>, MetadataError> {
            if self.fail {
                return Err(Self::outage());
            }
            let needle = title.to_lowercase();
            Ok(self
                .candidates
                .iter()
                .filter(|c| c.title.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn detail(&self, id: i64) -> Result<MovieDetail, MetadataError> {
            if self.fail {
                return Err(Self::outage());
            }
            self.details.get(&id).cloned().ok_or(MetadataError::Api {
                status: 404,
                message: format!("no movie {id}"),
            })
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }
}
