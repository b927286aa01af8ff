use std::env;
use std::sync::Arc;

use catvote_api::{CatApi, CatApiSource};
use catvote_core::VotingCoordinator;
use catvote_identity::{FileIdentityStore, IdentityProvider};
use dotenv::dotenv;

use crate::errors::VotingAppError;

const DEFAULT_API_URL: &str = "https://api.thecatapi.com/v1";
const DEFAULT_SUB_ID_PATH: &str = ".cat-voting-sub-id";

/// `Dependencies` struct holds the necessary components for the voting
/// application.
///
/// It includes the gateway for talking to the remote API, the identity
/// provider scoping votes to this session, and the coordinator driving
/// the optimistic voting flow.
pub struct Dependencies {
    pub api: Arc<dyn CatApi>,
    pub identity: IdentityProvider<FileIdentityStore>,
    pub coordinator: VotingCoordinator,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance.
    ///
    /// Reads `CAT_API_BASE_URL`, `CAT_API_KEY`, and `CAT_SUB_ID_PATH`
    /// from the environment (a `.env` file is honored), falling back to
    /// the public API URL and a sub-id file in the working directory.
    /// A missing API key is not validated here; unauthenticated calls
    /// fail at the remote service.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `VotingAppError` if the persisted identity cannot be read or
    /// created.
    pub fn new() -> Result<Self, VotingAppError> {
        dotenv().ok();

        let base_url = env::var("CAT_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key = env::var("CAT_API_KEY").unwrap_or_default();
        let sub_id_path =
            env::var("CAT_SUB_ID_PATH").unwrap_or_else(|_| DEFAULT_SUB_ID_PATH.to_string());

        let api = CatApiSource::live(base_url, api_key).into_api();
        let identity = IdentityProvider::new(FileIdentityStore::new(sub_id_path));
        let sub_id = identity.get_id()?;
        let coordinator = VotingCoordinator::new(api.clone(), sub_id);

        Ok(Dependencies {
            api,
            identity,
            coordinator,
        })
    }
}
