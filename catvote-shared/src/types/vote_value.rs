use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents the type of vote cast by a user.
///
/// On the wire votes are the integers `1` (up) and `-1` (down); any other
/// value is rejected during deserialization.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "i8", try_from = "i8")]
pub enum VoteValue {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

/// Error returned when a wire integer is not a valid vote value.
#[derive(Debug, Error)]
#[error("Invalid vote value: {0}")]
pub struct InvalidVoteValue(pub i8);

impl From<VoteValue> for i8 {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i8> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_serializes_to_one() {
        assert_eq!(serde_json::to_string(&VoteValue::Up).unwrap(), "1");
    }

    #[test]
    fn test_down_serializes_to_negative_one() {
        assert_eq!(serde_json::to_string(&VoteValue::Down).unwrap(), "-1");
    }

    #[test]
    fn test_deserialize_wire_integers() {
        assert_eq!(serde_json::from_str::<VoteValue>("1").unwrap(), VoteValue::Up);
        assert_eq!(serde_json::from_str::<VoteValue>("-1").unwrap(), VoteValue::Down);
    }

    #[test]
    fn test_deserialize_rejects_other_integers() {
        assert!(serde_json::from_str::<VoteValue>("0").is_err());
        assert!(serde_json::from_str::<VoteValue>("2").is_err());
    }
}
