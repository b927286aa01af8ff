use serde::{Deserialize, Serialize};

/// Represents a single cat image served by the image API.
///
/// Images are immutable once fetched; every other component treats them
/// as read-only data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatImage {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}
