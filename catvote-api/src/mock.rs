//! Mock cat API client for testing and local development.
//!
//! The `MockCatApi` can be pre-populated with images and votes, allowing
//! tests to run without network access. Individual operations can be
//! scripted to fail, and every submitted vote request is recorded so
//! tests can assert on exactly what reached the gateway.
//!
//! # Example
//!
//! ```ignore
//! use catvote_api::{CatApi, MockCatApi};
//! use catvote_shared::types::CatImage;
//!
//! let api = MockCatApi::new();
//! api.register_image(CatImage {
//!     id: "img1".to_string(),
//!     url: "https://example.com/img1.jpg".to_string(),
//!     width: 640,
//!     height: 480,
//! });
//!
//! let images = api.get_images(10).await?;
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use catvote_shared::types::{CatImage, CreateVoteRequest, CreateVoteResponse, Vote, VoteId};

use crate::{CatApi, CatApiError, Result};

/// Mock cat API that serves pre-configured images and votes.
///
/// Use this for testing and local development without network access.
pub struct MockCatApi {
    images: RwLock<Vec<CatImage>>,
    votes: RwLock<Vec<Vote>>,
    /// Every CreateVoteRequest that reached the gateway, failures included.
    submitted: RwLock<Vec<CreateVoteRequest>>,
    fail_images: AtomicBool,
    fail_user_votes: AtomicBool,
    fail_create: AtomicBool,
    create_delay: RwLock<Option<Duration>>,
    next_vote_id: AtomicU64,
}

impl MockCatApi {
    /// Create a new empty mock client.
    pub fn new() -> Self {
        Self {
            images: RwLock::new(Vec::new()),
            votes: RwLock::new(Vec::new()),
            submitted: RwLock::new(Vec::new()),
            fail_images: AtomicBool::new(false),
            fail_user_votes: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            create_delay: RwLock::new(None),
            next_vote_id: AtomicU64::new(1),
        }
    }

    /// Create a mock client pre-populated with the given images.
    pub fn with_images(images: Vec<CatImage>) -> Self {
        let api = Self::new();
        *api.images.write().unwrap() = images;
        api
    }

    /// Create a mock client pre-populated with the given votes.
    pub fn with_votes(votes: Vec<Vote>) -> Self {
        let api = Self::new();
        *api.votes.write().unwrap() = votes;
        api
    }

    /// Register an image to be served by `get_images` and `get_image`.
    pub fn register_image(&self, image: CatImage) {
        self.images.write().unwrap().push(image);
    }

    /// Register a pre-existing vote to be served by `get_user_votes`.
    pub fn register_vote(&self, vote: Vote) {
        self.votes.write().unwrap().push(vote);
    }

    /// Script `get_images` to fail while set.
    pub fn set_fail_images(&self, fail: bool) {
        self.fail_images.store(fail, Ordering::SeqCst);
    }

    /// Script `get_user_votes` to fail while set.
    pub fn set_fail_user_votes(&self, fail: bool) {
        self.fail_user_votes.store(fail, Ordering::SeqCst);
    }

    /// Script `create_vote` to fail while set.
    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Delay `create_vote` responses; lets tests observe in-flight votes.
    pub fn set_create_delay(&self, delay: Duration) {
        *self.create_delay.write().unwrap() = Some(delay);
    }

    /// Every vote request that reached the gateway, in order.
    pub fn submitted_requests(&self) -> Vec<CreateVoteRequest> {
        self.submitted.read().unwrap().clone()
    }

    /// Number of votes the mock server currently holds.
    pub fn vote_count(&self) -> usize {
        self.votes.read().unwrap().len()
    }
}

impl Default for MockCatApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatApi for MockCatApi {
    async fn get_images(&self, limit: u32) -> Result<Vec<CatImage>> {
        if self.fail_images.load(Ordering::SeqCst) {
            return Err(CatApiError::FetchImages);
        }
        let images = self.images.read().unwrap();
        Ok(images.iter().take(limit as usize).cloned().collect())
    }

    async fn get_image(&self, image_id: &str) -> Result<CatImage> {
        self.images
            .read()
            .unwrap()
            .iter()
            .find(|image| image.id == image_id)
            .cloned()
            .ok_or_else(|| CatApiError::NotFound(format!("image not found in mock: {}", image_id)))
    }

    async fn get_user_votes(&self, sub_id: &str) -> Result<Vec<Vote>> {
        if self.fail_user_votes.load(Ordering::SeqCst) {
            return Err(CatApiError::FetchUserVotes);
        }
        let votes = self.votes.read().unwrap();
        Ok(votes.iter().filter(|vote| vote.sub_id == sub_id).cloned().collect())
    }

    async fn create_vote(&self, request: CreateVoteRequest) -> Result<CreateVoteResponse> {
        self.submitted.write().unwrap().push(request.clone());

        let delay = *self.create_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(CatApiError::CreateVote);
        }

        let id = VoteId::Server(self.next_vote_id.fetch_add(1, Ordering::SeqCst).to_string());
        self.votes.write().unwrap().push(Vote {
            id: id.clone(),
            image_id: request.image_id.clone(),
            sub_id: request.sub_id.clone(),
            value: request.value,
            created_at: chrono::Utc::now(),
        });

        Ok(CreateVoteResponse {
            message: "SUCCESS".to_string(),
            id,
            image_id: request.image_id,
            sub_id: request.sub_id,
            value: request.value,
            country_code: String::new(),
        })
    }
}
