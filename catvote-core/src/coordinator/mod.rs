//! Optimistic voting coordinator.
//!
//! The coordinator drives a per-image state machine
//! `Unvoted -> Optimistic -> {Confirmed | Failed}`, with
//! `Failed -> Optimistic` reachable only through `retry`. A vote appears
//! in the cache immediately, is reconciled with the server response on
//! success, and is rolled back to the pre-vote snapshot on failure, with
//! the failed attempt retained so it can be replayed with the exact same
//! value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use catvote_api::CatApi;
use catvote_shared::types::{CreateVoteRequest, Vote, VoteId, VoteValue};
use tokio::time::Instant;

use crate::cache::VoteCache;
use crate::errors::CoordinatorError;

/// Repeated vote intents for the same image inside this window are
/// coalesced, so a double-click produces exactly one network call.
const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Voting lifecycle of a single image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteState {
    /// No vote exists and none is in flight.
    Unvoted,
    /// An optimistic vote is in the cache with its submission in flight.
    Optimistic,
    /// The server confirmed the vote.
    Confirmed,
    /// The submission failed; the optimistic vote was rolled back and the
    /// attempt can be replayed with `retry`.
    Failed,
}

/// The failed vote attempt retained for replay.
///
/// Cleared on successful retry; owned exclusively by the coordinator and
/// never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureContext {
    pub image_id: String,
    pub attempted_value: VoteValue,
}

/// Result of a vote or retry call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was submitted and confirmed by the server.
    Confirmed(Vote),
    /// The call was a duplicate or otherwise not permitted; nothing was
    /// submitted. Duplicate UI intents are tolerated, not errors.
    Ignored,
}

struct Inner {
    cache: VoteCache,
    loaded: bool,
    states: HashMap<String, VoteState>,
    failures: HashMap<String, FailureContext>,
    last_intent: HashMap<String, Instant>,
}

/// Coordinates optimistic voting against the remote gateway.
///
/// Enforces at most one vote per `(sub_id, image_id)` pair and at most
/// one in-flight submission per image. Votes on distinct images are fully
/// independent. Dropping the coordinator (or a vote future) while a
/// submission is outstanding simply discards the response.
pub struct VotingCoordinator {
    api: Arc<dyn CatApi>,
    sub_id: String,
    debounce_window: Duration,
    inner: Mutex<Inner>,
}

impl VotingCoordinator {
    /// Creates a coordinator for the given identity.
    pub fn new(api: Arc<dyn CatApi>, sub_id: impl Into<String>) -> Self {
        Self {
            api,
            sub_id: sub_id.into(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            inner: Mutex::new(Inner {
                cache: VoteCache::new(),
                loaded: false,
                states: HashMap::new(),
                failures: HashMap::new(),
                last_intent: HashMap::new(),
            }),
        }
    }

    /// Overrides the intent-coalescing window.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// The identity all votes are scoped to.
    pub fn sub_id(&self) -> &str {
        &self.sub_id
    }

    /// Casts a vote on an image.
    ///
    /// No-op (`VoteOutcome::Ignored`) unless the image is `Unvoted`:
    /// duplicate UI-driven calls while a vote is in flight, already
    /// confirmed, or failed-but-not-retried do not raise an error. The
    /// optimistic entry appears in the cache before the request is sent
    /// and is rolled back if the submission fails.
    ///
    /// # Errors
    ///
    /// Returns `CoordinatorError::Submit` when the gateway rejects the
    /// vote; the cache is restored to its pre-vote state and the attempt
    /// is retained for `retry`.
    pub async fn vote(&self, image_id: &str, value: VoteValue) -> Result<VoteOutcome, CoordinatorError> {
        self.submit(image_id, value, false).await
    }

    /// Replays the failed vote for an image with exactly the previously
    /// attempted value.
    ///
    /// No-op when no failure context exists for the image. The value is
    /// taken from the recorded failure; callers cannot supply a
    /// different one.
    ///
    /// # Errors
    ///
    /// Returns `CoordinatorError::Submit` when the replay fails again; a
    /// fresh failure context is recorded for another retry.
    pub async fn retry(&self, image_id: &str) -> Result<VoteOutcome, CoordinatorError> {
        let context = {
            let inner = self.inner.lock().unwrap();
            inner.failures.get(image_id).cloned()
        };
        match context {
            Some(context) => self.submit(image_id, context.attempted_value, true).await,
            None => Ok(VoteOutcome::Ignored),
        }
    }

    async fn submit(
        &self,
        image_id: &str,
        value: VoteValue,
        is_retry: bool,
    ) -> Result<VoteOutcome, CoordinatorError> {
        let (temp_id, snapshot, request) = {
            let mut inner = self.inner.lock().unwrap();
            let now = Instant::now();

            if !is_retry {
                if let Some(last) = inner.last_intent.get(image_id) {
                    if now.duration_since(*last) < self.debounce_window {
                        return Ok(VoteOutcome::Ignored);
                    }
                }
            }
            inner.last_intent.insert(image_id.to_string(), now);

            if is_retry {
                // Taking the context is what admits the retry; a racing
                // second retry finds it gone and becomes a no-op.
                if inner.failures.remove(image_id).is_none() {
                    return Ok(VoteOutcome::Ignored);
                }
            } else {
                let state = inner.states.get(image_id).copied().unwrap_or(VoteState::Unvoted);
                if state != VoteState::Unvoted || inner.cache.get(image_id).is_some() {
                    return Ok(VoteOutcome::Ignored);
                }
            }

            let optimistic = Vote {
                id: VoteId::temporary(),
                image_id: image_id.to_string(),
                sub_id: self.sub_id.clone(),
                value,
                created_at: chrono::Utc::now(),
            };
            let temp_id = optimistic.id.clone();
            let snapshot = inner.cache.insert_optimistic(optimistic);
            inner.states.insert(image_id.to_string(), VoteState::Optimistic);

            let request = CreateVoteRequest {
                image_id: image_id.to_string(),
                sub_id: self.sub_id.clone(),
                value,
            };
            (temp_id, snapshot, request)
        };

        match self.api.create_vote(request).await {
            Ok(response) => {
                let confirmed = Vote {
                    id: response.id,
                    image_id: response.image_id,
                    sub_id: response.sub_id,
                    value: response.value,
                    created_at: chrono::Utc::now(),
                };
                let mut inner = self.inner.lock().unwrap();
                inner.cache.replace(&temp_id, confirmed.clone());
                inner.states.insert(image_id.to_string(), VoteState::Confirmed);
                inner.failures.remove(image_id);
                inner.cache.invalidate();
                tracing::debug!(image_id, "vote confirmed");
                Ok(VoteOutcome::Confirmed(confirmed))
            }
            Err(e) => {
                let mut inner = self.inner.lock().unwrap();
                inner.cache.rollback(snapshot);
                inner.states.insert(image_id.to_string(), VoteState::Failed);
                inner.failures.insert(
                    image_id.to_string(),
                    FailureContext {
                        image_id: image_id.to_string(),
                        attempted_value: value,
                    },
                );
                inner.cache.invalidate();
                tracing::warn!(image_id, "vote submission failed, rolled back optimistic entry");
                Err(CoordinatorError::Submit(e))
            }
        }
    }

    /// The current user's votes, reconciled with the server when the
    /// cache is stale or has never been loaded.
    ///
    /// # Errors
    ///
    /// Returns `CoordinatorError::Fetch` when the vote list cannot be
    /// fetched; the cached state is left untouched.
    pub async fn user_votes(&self) -> Result<Vec<Vote>, CoordinatorError> {
        {
            let inner = self.inner.lock().unwrap();
            if inner.loaded && !inner.cache.is_stale() {
                return Ok(inner.cache.votes().to_vec());
            }
        }
        let fetched = self
            .api
            .get_user_votes(&self.sub_id)
            .await
            .map_err(CoordinatorError::Fetch)?;
        let mut inner = self.inner.lock().unwrap();
        inner.cache.reload(fetched);
        inner.loaded = true;
        Ok(inner.cache.votes().to_vec())
    }

    /// Whether a vote (optimistic or confirmed) exists for the image.
    pub fn has_voted(&self, image_id: &str) -> bool {
        self.inner.lock().unwrap().cache.get(image_id).is_some()
    }

    /// The cached vote for the image, if any.
    pub fn current_vote(&self, image_id: &str) -> Option<Vote> {
        self.inner.lock().unwrap().cache.get(image_id).cloned()
    }

    /// Whether the last vote attempt for the image failed and has not
    /// been successfully retried.
    pub fn is_error(&self, image_id: &str) -> bool {
        self.inner.lock().unwrap().failures.contains_key(image_id)
    }

    /// The voting lifecycle state of the image.
    pub fn state(&self, image_id: &str) -> VoteState {
        self.inner
            .lock()
            .unwrap()
            .states
            .get(image_id)
            .copied()
            .unwrap_or(VoteState::Unvoted)
    }

    /// The retained failed attempt for the image, if any.
    pub fn failure_context(&self, image_id: &str) -> Option<FailureContext> {
        self.inner.lock().unwrap().failures.get(image_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catvote_api::MockCatApi;

    fn coordinator(api: Arc<MockCatApi>) -> VotingCoordinator {
        VotingCoordinator::new(api, "user-1").with_debounce_window(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_vote_transitions_to_confirmed() {
        let api = Arc::new(MockCatApi::new());
        let coordinator = coordinator(api.clone());

        let outcome = coordinator.vote("img1", VoteValue::Up).await.unwrap();
        assert!(matches!(outcome, VoteOutcome::Confirmed(_)));
        assert_eq!(coordinator.state("img1"), VoteState::Confirmed);
        assert!(coordinator.has_voted("img1"));
        assert_eq!(coordinator.current_vote("img1").unwrap().value, VoteValue::Up);
        assert!(!coordinator.current_vote("img1").unwrap().id.is_temporary());
    }

    #[tokio::test]
    async fn test_vote_on_voted_image_is_noop() {
        let api = Arc::new(MockCatApi::new());
        let coordinator = coordinator(api.clone());

        coordinator.vote("img1", VoteValue::Up).await.unwrap();
        let outcome = coordinator.vote("img1", VoteValue::Down).await.unwrap();

        assert_eq!(outcome, VoteOutcome::Ignored);
        assert_eq!(api.submitted_requests().len(), 1);
        assert_eq!(coordinator.current_vote("img1").unwrap().value, VoteValue::Up);
    }

    #[tokio::test]
    async fn test_failed_vote_rolls_back_and_records_context() {
        let api = Arc::new(MockCatApi::new());
        api.set_fail_create(true);
        let coordinator = coordinator(api.clone());

        let result = coordinator.vote("img1", VoteValue::Down).await;
        assert!(matches!(result, Err(CoordinatorError::Submit(_))));
        assert_eq!(coordinator.state("img1"), VoteState::Failed);
        assert!(!coordinator.has_voted("img1"));
        assert!(coordinator.is_error("img1"));
        assert_eq!(
            coordinator.failure_context("img1").unwrap().attempted_value,
            VoteValue::Down
        );
    }

    #[tokio::test]
    async fn test_vote_after_unretried_failure_is_noop() {
        let api = Arc::new(MockCatApi::new());
        api.set_fail_create(true);
        let coordinator = coordinator(api.clone());

        let _ = coordinator.vote("img1", VoteValue::Up).await;
        let outcome = coordinator.vote("img1", VoteValue::Down).await.unwrap();

        assert_eq!(outcome, VoteOutcome::Ignored);
        assert_eq!(api.submitted_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_replays_recorded_value() {
        let api = Arc::new(MockCatApi::new());
        api.set_fail_create(true);
        let coordinator = coordinator(api.clone());

        let _ = coordinator.vote("img1", VoteValue::Down).await;
        api.set_fail_create(false);

        let outcome = coordinator.retry("img1").await.unwrap();
        assert!(matches!(outcome, VoteOutcome::Confirmed(_)));

        let submitted = api.submitted_requests();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[1].value, VoteValue::Down);
        assert!(!coordinator.is_error("img1"));
        assert_eq!(coordinator.state("img1"), VoteState::Confirmed);
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_noop() {
        let api = Arc::new(MockCatApi::new());
        let coordinator = coordinator(api.clone());

        let outcome = coordinator.retry("img1").await.unwrap();
        assert_eq!(outcome, VoteOutcome::Ignored);
        assert!(api.submitted_requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_retry_records_fresh_context() {
        let api = Arc::new(MockCatApi::new());
        api.set_fail_create(true);
        let coordinator = coordinator(api.clone());

        let _ = coordinator.vote("img1", VoteValue::Up).await;
        let result = coordinator.retry("img1").await;

        assert!(matches!(result, Err(CoordinatorError::Submit(_))));
        assert!(coordinator.is_error("img1"));
        assert_eq!(
            coordinator.failure_context("img1").unwrap().attempted_value,
            VoteValue::Up
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_opposite_vote_is_noop() {
        let api = Arc::new(MockCatApi::new());
        api.set_create_delay(Duration::from_millis(100));
        let coordinator = coordinator(api.clone());

        let (first, second) = tokio::join!(
            coordinator.vote("img1", VoteValue::Up),
            coordinator.vote("img1", VoteValue::Down),
        );

        assert!(matches!(first.unwrap(), VoteOutcome::Confirmed(_)));
        assert_eq!(second.unwrap(), VoteOutcome::Ignored);

        let submitted = api.submitted_requests();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].value, VoteValue::Up);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_intents_are_coalesced() {
        let api = Arc::new(MockCatApi::new());
        api.set_create_delay(Duration::from_millis(50));
        let coordinator = VotingCoordinator::new(api.clone(), "user-1");

        let (first, second, third) = tokio::join!(
            coordinator.vote("img1", VoteValue::Up),
            coordinator.vote("img1", VoteValue::Up),
            coordinator.vote("img1", VoteValue::Up),
        );

        assert!(matches!(first.unwrap(), VoteOutcome::Confirmed(_)));
        assert_eq!(second.unwrap(), VoteOutcome::Ignored);
        assert_eq!(third.unwrap(), VoteOutcome::Ignored);
        assert_eq!(api.submitted_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_votes_on_distinct_images_are_independent() {
        let api = Arc::new(MockCatApi::new());
        let coordinator = coordinator(api.clone());

        coordinator.vote("img1", VoteValue::Up).await.unwrap();
        coordinator.vote("img2", VoteValue::Down).await.unwrap();

        assert_eq!(api.submitted_requests().len(), 2);
        assert_eq!(coordinator.current_vote("img1").unwrap().value, VoteValue::Up);
        assert_eq!(coordinator.current_vote("img2").unwrap().value, VoteValue::Down);
    }

    #[tokio::test]
    async fn test_user_votes_reconciles_after_settle() {
        let api = Arc::new(MockCatApi::new());
        let coordinator = coordinator(api.clone());

        assert!(coordinator.user_votes().await.unwrap().is_empty());
        coordinator.vote("img1", VoteValue::Up).await.unwrap();

        // The post-vote cache is stale; the next read refetches.
        let votes = coordinator.user_votes().await.unwrap();
        assert_eq!(votes.len(), 1);
        assert!(!votes[0].id.is_temporary());
    }

    #[tokio::test]
    async fn test_user_votes_fetch_failure_surfaces() {
        let api = Arc::new(MockCatApi::new());
        api.set_fail_user_votes(true);
        let coordinator = coordinator(api.clone());

        let result = coordinator.user_votes().await;
        assert!(matches!(result, Err(CoordinatorError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_preexisting_server_vote_blocks_new_vote() {
        let api = Arc::new(MockCatApi::new());
        api.create_vote(CreateVoteRequest {
            image_id: "img1".to_string(),
            sub_id: "user-1".to_string(),
            value: VoteValue::Up,
        })
        .await
        .unwrap();
        let coordinator = coordinator(api.clone());

        coordinator.user_votes().await.unwrap();
        let outcome = coordinator.vote("img1", VoteValue::Down).await.unwrap();

        assert_eq!(outcome, VoteOutcome::Ignored);
        assert_eq!(api.submitted_requests().len(), 1);
    }
}
