use serde::Serialize;

use crate::providers::{Profile, RawMatch};

pub const MURDERER_ROLE_LABEL: &str = "Asesino";
pub const INNOCENT_ROLE_LABEL: &str = "Inocente";

/// Display label for the viewer's role in a match
pub fn role_label_for(was_murderer: bool) -> &'static str {
    if was_murderer {
        MURDERER_ROLE_LABEL
    } else {
        INNOCENT_ROLE_LABEL
    }
}

/// One entry of the match history as shown on the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: i64,
    pub played_at: String,
    pub duration_label: String,
    pub role_label: String,
}

impl Match {
    pub fn with_role(mut self, was_murderer: bool) -> Self {
        self.role_label = role_label_for(was_murderer).to_string();
        self
    }
}

impl From<RawMatch> for Match {
    fn from(raw: RawMatch) -> Self {
        Self {
            id: raw.id,
            played_at: raw.date,
            duration_label: raw.duration,
            role_label: raw.role,
        }
    }
}

/// The whole home screen state at one instant.
///
/// Snapshots are published behind an `Arc` and never mutated afterwards; every
/// update builds a new value from the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub profile_loading: bool,
    pub matches_loading: bool,
    pub display_name: String,
    pub avatar_ref: Option<String>,
    pub coin_balance: i64,
    pub friend_count: usize,
    pub match_count: usize,
    pub matches: Vec<Match>,
    pub last_error: Option<String>,
}

impl Snapshot {
    pub fn profile_started(&self) -> Self {
        Self {
            profile_loading: true,
            ..self.clone()
        }
    }

    pub fn profile_loaded(&self, profile: Profile) -> Self {
        Self {
            profile_loading: false,
            display_name: profile.nickname,
            avatar_ref: profile.profile_image_url,
            coin_balance: profile.coins,
            ..self.clone()
        }
    }

    pub fn friends_loaded(&self, friend_count: usize) -> Self {
        Self {
            friend_count,
            ..self.clone()
        }
    }

    pub fn matches_started(&self) -> Self {
        Self {
            matches_loading: true,
            ..self.clone()
        }
    }

    pub fn matches_loaded(&self, matches: Vec<Match>) -> Self {
        Self {
            matches_loading: false,
            match_count: matches.len(),
            matches,
            ..self.clone()
        }
    }

    pub fn profile_failed(&self, message: String) -> Self {
        Self {
            profile_loading: false,
            last_error: Some(message),
            ..self.clone()
        }
    }

    pub fn matches_failed(&self, message: String) -> Self {
        Self {
            matches_loading: false,
            last_error: Some(message),
            ..self.clone()
        }
    }

    /// Records an error without touching any slice
    pub fn with_error(&self, message: String) -> Self {
        Self {
            last_error: Some(message),
            ..self.clone()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.profile_loading || self.matches_loading
    }
}
