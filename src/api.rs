//! Remote recipe API client.
//!
//! Three calls, all JSON:
//!
//! ```text
//! GET  <base>/<id>                      → { data: { recipe } }
//! GET  <base>?search=<query>&key=<key>  → { data: { recipes: [...] } }
//! POST <base>?key=<key>   (recipe body) → { data: { recipe } }
//! ```
//!
//! Non-success responses carry a `message` field; it is surfaced as
//! `"<message> (<status>)"`. Every request is bounded by the configured
//! timeout. A timeout fails the caller, there are no retries.
//!
//! The state store talks to the API through [`RecipeApi`] so it can be
//! driven by an in-memory fake.

use crate::config::ApiConfig;
use crate::types::{ApiRecipe, ApiSearchResult, Envelope, Failure, RecipeData, SearchData};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request took too long! Timeout after {0} second")]
    Timeout(u64),
    #[error("{message} ({status})")]
    Status { message: String, status: u16 },
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Operations the state store needs from the recipe backend.
pub trait RecipeApi {
    /// Fetch one recipe by id.
    fn fetch_recipe(&self, id: &str) -> Result<ApiRecipe, ApiError>;
    /// Search recipes by free-text query.
    fn search(&self, query: &str) -> Result<Vec<ApiSearchResult>, ApiError>;
    /// Submit a new recipe; the response echoes it with `id` and `key` set.
    fn create_recipe(&self, recipe: &ApiRecipe) -> Result<ApiRecipe, ApiError>;
}

/// [`RecipeApi`] over HTTP.
pub struct HttpApi {
    client: Client,
    base_url: Url,
    key: String,
    timeout_secs: u64,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::Transport)?;

        let base_url = Url::parse(config.url.trim_end_matches('/')).map_err(|e| {
            ApiError::InvalidUrl {
                url: config.url.clone(),
                reason: e.to_string(),
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.url.clone(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            key: config.key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `<base>/<id>` with `id` percent-encoded as a single path segment.
    fn recipe_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Send a request and decode the success envelope.
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Failure>(&body)
                .ok()
                .and_then(|f| f.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            return Err(ApiError::Status {
                message,
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        debug!(status = ?envelope.status, "Decoded response envelope");
        Ok(envelope.data)
    }

    fn classify(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Transport(error)
        }
    }
}

impl RecipeApi for HttpApi {
    fn fetch_recipe(&self, id: &str) -> Result<ApiRecipe, ApiError> {
        let url = self.recipe_url(id)?;
        info!("Fetching recipe {}", url);
        let data: RecipeData = self.send(self.client.get(url))?;
        Ok(data.recipe)
    }

    fn search(&self, query: &str) -> Result<Vec<ApiSearchResult>, ApiError> {
        info!("Searching recipes for {:?}", query);
        let request = self
            .client
            .get(self.base_url.clone())
            .query(&[("search", query), ("key", self.key.as_str())]);
        let data: SearchData = self.send(request)?;
        debug!("Search returned {} recipes", data.recipes.len());
        Ok(data.recipes)
    }

    fn create_recipe(&self, recipe: &ApiRecipe) -> Result<ApiRecipe, ApiError> {
        info!("Uploading recipe {:?}", recipe.title);
        let request = self
            .client
            .post(self.base_url.clone())
            .query(&[("key", self.key.as_str())])
            .json(recipe);
        let data: RecipeData = self.send(request)?;
        Ok(data.recipe)
    }
}
