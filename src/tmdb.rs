use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    metadata::{MetadataError, MetadataProvider},
    models::{Candidate, MovieDetail, poster_url, year_from_release_date},
};

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    image_base_url: String,
    language: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
        image_base_url: String,
        language: String,
        rps: u32,
    ) -> Self {
        if access_token.trim().is_empty() {
            tracing::warn!("no TMDB_ACCESS_TOKEN provided, movie lookups will be rejected");
        }

        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { client, access_token, base_url, image_base_url, language, limiter }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, MetadataError> {
        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("include_adult", "true"), ("language", self.language.as_str())])
            .query(extra)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MetadataError::Api { status: status.as_u16(), message });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search(&self, title: &str) -> Result<Vec<Candidate>, MetadataError> {
        debug!(title = %title, "searching TMDB");
        let resp: SearchResponse = self.get_json("/search/movie", &[("query", title)]).await?;
        debug!(title = %title, results = resp.results.len(), "TMDB search done");
        Ok(resp.results)
    }

    async fn detail(&self, id: i64) -> Result<MovieDetail, MetadataError> {
        debug!(movie_id = id, "fetching TMDB detail");
        let raw: RawMovieDetail = self.get_json(&format!("/movie/{id}"), &[]).await?;
        Ok(raw.into_detail(&self.image_base_url))
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct RawMovieDetail {
    id: i64,
    #[serde(default)]
    original_title: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

impl RawMovieDetail {
    fn into_detail(self, image_base_url: &str) -> MovieDetail {
        let title = if self.original_title.trim().is_empty() {
            self.title
        } else {
            self.original_title
        };

        MovieDetail {
            id: self.id,
            title,
            year: self.release_date.as_deref().and_then(year_from_release_date),
            description: self.overview.unwrap_or_default(),
            img_url: self
                .poster_path
                .filter(|p| !p.trim().is_empty())
                .map(|p| poster_url(image_base_url, &p)),
        }
    }
}
