//! Data provider contracts consumed by the home coordinator

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque provider failure. Only its description is ever shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl From<Failure> for String {
    fn from(e: Failure) -> Self {
        e.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub nickname: String,
    pub profile_image_url: Option<String>,
    pub coins: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: i64,
    #[serde(default)]
    pub nickname: String,
}

/// A past match as returned by the backend, before the viewer's role is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatch {
    pub id: i64,
    pub date: String,
    pub duration: String,
    pub role: String,
}

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch(&self) -> Result<Profile, Failure>;
}

#[async_trait]
pub trait FriendListProvider: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Friend>, Failure>;
}

#[async_trait]
pub trait MatchHistoryProvider: Send + Sync {
    /// Every past match of the current player, in backend order
    async fn fetch_all(&self) -> Result<Vec<RawMatch>, Failure>;

    /// Returns true if the current player was the murderer in the given match
    async fn enrich(&self, match_id: i64) -> Result<bool, Failure>;
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn end_session(&self) -> Result<(), Failure>;
}
