mod cat_image;
mod create_vote;
mod vote;
mod vote_value;

pub use cat_image::CatImage;
pub use create_vote::{CreateVoteRequest, CreateVoteResponse};
pub use vote::{Vote, VoteId};
pub use vote_value::{InvalidVoteValue, VoteValue};
