//! HTTP gateway for the public cat image and voting API.
//!
//! This crate provides:
//! - [`CatApiSource`] config enum for choosing between mock and live clients
//! - [`CatApi`] trait for abstracting access to the remote API
//! - [`CatApiClient`] production client that talks to the live API
//! - [`MockCatApi`] mock client for testing with pre-configured images and votes
//!
//! ## Usage with CatApiSource (Recommended)
//!
//! ```ignore
//! use catvote_api::CatApiSource;
//!
//! // Development/testing: use mock data
//! let api = CatApiSource::mock().into_api();
//!
//! // Production: use the live API
//! let api = CatApiSource::live("https://api.thecatapi.com/v1", "live_key").into_api();
//!
//! // Use the api
//! let images = api.get_images(10).await?;
//! ```

mod mock;
mod retry;

pub use mock::MockCatApi;

use std::sync::Arc;

use async_trait::async_trait;
use catvote_shared::types::{CatImage, CreateVoteRequest, CreateVoteResponse, Vote};
use reqwest::Client as ReqwestClient;

use crate::retry::with_retry;

/// Header carrying the static API key on every request.
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, thiserror::Error)]
pub enum CatApiError {
    #[error("Failed to fetch cat images")]
    FetchImages,
    #[error("Failed to fetch user votes")]
    FetchUserVotes,
    #[error("Failed to create vote")]
    CreateVote,
    #[error("reqwest error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CatApiError>;

/// Trait for accessing the remote cat image and voting API.
///
/// This trait abstracts the HTTP client to enable dependency injection
/// and mocking for testing. Production code uses [`CatApiClient`], while
/// tests can use mock implementations.
///
/// List fetches and vote writes rewrap transport errors into generic,
/// user-safe messages; the underlying cause is logged, not surfaced.
/// Single-image lookups propagate the transport error unwrapped.
#[async_trait]
pub trait CatApi: Send + Sync {
    /// Fetch a batch of random cat images.
    async fn get_images(&self, limit: u32) -> Result<Vec<CatImage>>;

    /// Fetch a specific image by id.
    async fn get_image(&self, image_id: &str) -> Result<CatImage>;

    /// Fetch all votes cast by the given pseudonymous user.
    async fn get_user_votes(&self, sub_id: &str) -> Result<Vec<Vote>>;

    /// Cast a vote. Never retried internally; retries are the
    /// coordinator's responsibility.
    async fn create_vote(&self, request: CreateVoteRequest) -> Result<CreateVoteResponse>;
}

/// Production client that talks to the live cat API.
///
/// Read operations go through a bounded transport-level retry with
/// exponential backoff; client errors (4xx) are never retried.
///
/// # Example
///
/// ```ignore
/// use catvote_api::CatApiClient;
///
/// let client = CatApiClient::new("https://api.thecatapi.com/v1", "live_key");
/// let images = client.get_images(10).await?;
/// ```
pub struct CatApiClient {
    base_url: String,
    api_key: String,
    client: ReqwestClient,
}

impl CatApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        CatApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: ReqwestClient::new(),
        }
    }

    async fn fetch_images_once(&self, limit: u32) -> std::result::Result<Vec<CatImage>, reqwest::Error> {
        let url = format!("{}/images/search", self.base_url);
        self.client
            .get(&url)
            .query(&[("limit", limit)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn fetch_image_once(&self, image_id: &str) -> std::result::Result<CatImage, reqwest::Error> {
        let url = format!("{}/images/{}", self.base_url, image_id);
        self.client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn fetch_user_votes_once(&self, sub_id: &str) -> std::result::Result<Vec<Vote>, reqwest::Error> {
        let url = format!("{}/votes", self.base_url);
        // The sub_id is percent-encoded by the query serializer.
        self.client
            .get(&url)
            .query(&[("sub_id", sub_id)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl CatApi for CatApiClient {
    async fn get_images(&self, limit: u32) -> Result<Vec<CatImage>> {
        with_retry(|| self.fetch_images_once(limit)).await.map_err(|e| {
            tracing::error!("Error fetching cat images: {e}");
            CatApiError::FetchImages
        })
    }

    async fn get_image(&self, image_id: &str) -> Result<CatImage> {
        // Single-image lookups are used for display fallback, not the
        // primary flow; the transport error propagates unwrapped.
        let image = with_retry(|| self.fetch_image_once(image_id)).await?;
        Ok(image)
    }

    async fn get_user_votes(&self, sub_id: &str) -> Result<Vec<Vote>> {
        with_retry(|| self.fetch_user_votes_once(sub_id)).await.map_err(|e| {
            tracing::error!("Error fetching user votes: {e}");
            CatApiError::FetchUserVotes
        })
    }

    async fn create_vote(&self, request: CreateVoteRequest) -> Result<CreateVoteResponse> {
        let url = format!("{}/votes", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match response {
            Ok(response) => Ok(response.json().await.map_err(|e| {
                tracing::error!("Error decoding create vote response: {e}");
                CatApiError::CreateVote
            })?),
            Err(e) => {
                tracing::error!("Error creating vote: {e}");
                Err(CatApiError::CreateVote)
            }
        }
    }
}

/// Configuration for the cat API data source.
///
/// Use this to explicitly choose between mock and live clients.
///
/// # Example
///
/// ```ignore
/// use catvote_api::CatApiSource;
///
/// // Development/testing: use mock data
/// let api = CatApiSource::mock().into_api();
///
/// // Production: use the live API
/// let api = CatApiSource::live("https://api.thecatapi.com/v1", "live_key").into_api();
/// ```
#[derive(Debug, Clone)]
pub enum CatApiSource {
    /// Use the mock client with pre-configured images and votes.
    Mock,

    /// Connect to the live API.
    Live {
        /// The API base URL (e.g., "https://api.thecatapi.com/v1")
        base_url: String,
        /// The static API key attached to every request.
        api_key: String,
    },
}

impl CatApiSource {
    /// Create a mock API source.
    pub fn mock() -> Self {
        Self::Mock
    }

    /// Create a live API source with the given base URL and key.
    pub fn live(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::Live {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create the appropriate CatApi implementation.
    ///
    /// Returns a shared trait object that can be handed to the voting
    /// coordinator.
    pub fn into_api(self) -> Arc<dyn CatApi> {
        match self {
            Self::Mock => Arc::new(MockCatApi::new()),
            Self::Live { base_url, api_key } => Arc::new(CatApiClient::new(&base_url, &api_key)),
        }
    }
}
