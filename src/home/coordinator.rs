//! Assembles the home screen snapshot from the profile, friends and match
//! history providers

use std::sync::Arc;

use tokio::task::{JoinHandle, JoinSet};

use super::error::HomeError;
use super::snapshot::{Match, Snapshot};
use super::store::{SnapshotStore, Subscription, DEFAULT_SNAPSHOT_BUFFER};
use crate::providers::{
    FriendListProvider, MatchHistoryProvider, ProfileProvider, RawMatch, SessionProvider,
};
use crate::settings::{AppSettings, EnrichmentMode};

/// The collaborators the coordinator fetches from
#[derive(Clone)]
pub struct HomeProviders {
    pub profile: Arc<dyn ProfileProvider>,
    pub friends: Arc<dyn FriendListProvider>,
    pub matches: Arc<dyn MatchHistoryProvider>,
    pub session: Arc<dyn SessionProvider>,
}

#[derive(Debug, Clone, Copy)]
pub struct HomeOptions {
    pub enrichment: EnrichmentMode,
    pub snapshot_buffer: usize,
}

impl Default for HomeOptions {
    fn default() -> Self {
        Self {
            enrichment: EnrichmentMode::default(),
            snapshot_buffer: DEFAULT_SNAPSHOT_BUFFER,
        }
    }
}

impl From<&AppSettings> for HomeOptions {
    fn from(settings: &AppSettings) -> Self {
        Self {
            enrichment: settings.enrichment_mode,
            snapshot_buffer: settings.snapshot_buffer,
        }
    }
}

/// Handles to the three fetch paths launched by one refresh.
///
/// Dropping it leaves the paths running.
pub struct RefreshHandle {
    profile: JoinHandle<()>,
    friends: JoinHandle<()>,
    matches: JoinHandle<()>,
}

impl RefreshHandle {
    /// Wait until all three fetch paths have written their result
    pub async fn join(self) {
        for (section, handle) in [
            ("profile", self.profile),
            ("friends", self.friends),
            ("matches", self.matches),
        ] {
            if let Err(e) = handle.await {
                tracing::error!("Home {} task failed: {}", section, e);
            }
        }
    }
}

pub struct HomeCoordinator {
    store: Arc<SnapshotStore>,
    providers: HomeProviders,
    enrichment: EnrichmentMode,
}

impl HomeCoordinator {
    /// Create the coordinator and start the initial load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(providers: HomeProviders, options: HomeOptions) -> (Self, RefreshHandle) {
        tracing::debug!("Creating home coordinator ({:?} enrichment)", options.enrichment);
        let coordinator = Self {
            store: Arc::new(SnapshotStore::with_buffer(options.snapshot_buffer)),
            providers,
            enrichment: options.enrichment,
        };
        let initial = coordinator.start();
        (coordinator, initial)
    }

    fn start(&self) -> RefreshHandle {
        self.refresh()
    }

    /// Re-launch all three fetch paths.
    ///
    /// Paths from an earlier call keep running; for each section the result that
    /// completes last is the one left in the snapshot.
    pub fn refresh(&self) -> RefreshHandle {
        tracing::info!("Refreshing home data");

        let profile = tokio::spawn(load_profile(
            Arc::clone(&self.store),
            Arc::clone(&self.providers.profile),
        ));
        let friends = tokio::spawn(load_friends(
            Arc::clone(&self.store),
            Arc::clone(&self.providers.friends),
        ));
        let matches = tokio::spawn(load_matches(
            Arc::clone(&self.store),
            Arc::clone(&self.providers.matches),
            self.enrichment,
        ));

        RefreshHandle {
            profile,
            friends,
            matches,
        }
    }

    /// End the session. A failure is reported through `last_error`.
    pub fn logout(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let session = Arc::clone(&self.providers.session);

        tokio::spawn(async move {
            tracing::info!("Logging out");
            if let Err(e) = session.end_session().await {
                let err = HomeError::SessionEnd(e);
                tracing::warn!("{}", err);
                store.update(|s| s.with_error(err.into()));
            }
        })
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    pub fn subscribe(&self) -> Subscription {
        self.store.subscribe()
    }
}

async fn load_profile(store: Arc<SnapshotStore>, provider: Arc<dyn ProfileProvider>) {
    tracing::debug!("Loading profile");
    store.update(Snapshot::profile_started);

    match provider.fetch().await {
        Ok(profile) => {
            tracing::info!("Profile loaded for {}", profile.nickname);
            store.update(|s| s.profile_loaded(profile));
        }
        Err(e) => {
            let err = HomeError::ProfileFetch(e);
            tracing::warn!("{}", err);
            store.update(|s| s.profile_failed(err.into()));
        }
    }
}

async fn load_friends(store: Arc<SnapshotStore>, provider: Arc<dyn FriendListProvider>) {
    tracing::debug!("Loading friends");

    match provider.fetch().await {
        Ok(friends) => {
            tracing::info!("Loaded {} friends", friends.len());
            store.update(|s| s.friends_loaded(friends.len()));
        }
        Err(e) => {
            // friend_count keeps its previous value
            let err = HomeError::FriendFetch(e);
            tracing::warn!("{}", err);
            store.update(|s| s.with_error(err.into()));
        }
    }
}

async fn load_matches(
    store: Arc<SnapshotStore>,
    provider: Arc<dyn MatchHistoryProvider>,
    enrichment: EnrichmentMode,
) {
    tracing::debug!("Loading match history");
    store.update(Snapshot::matches_started);

    let raw_matches = match provider.fetch_all().await {
        Ok(raw_matches) => raw_matches,
        Err(e) => {
            let err = HomeError::MatchFetch(e);
            tracing::warn!("{}", err);
            store.update(|s| s.matches_failed(err.into()));
            return;
        }
    };

    let matches = match enrichment {
        EnrichmentMode::Sequential => enrich_sequential(provider, raw_matches).await,
        EnrichmentMode::Concurrent => enrich_concurrent(provider, raw_matches).await,
    };

    tracing::info!("Loaded {} matches", matches.len());
    store.update(|s| s.matches_loaded(matches));
}

/// One enrichment call at a time, in input order.
///
/// Each call runs on its own task so a panicking lookup falls back to the
/// innocent role, same as in concurrent mode.
async fn enrich_sequential(
    provider: Arc<dyn MatchHistoryProvider>,
    raw_matches: Vec<RawMatch>,
) -> Vec<Match> {
    let mut enriched = Vec::with_capacity(raw_matches.len());

    for raw in raw_matches {
        let provider = Arc::clone(&provider);
        let match_id = raw.id;
        let lookup = tokio::spawn(async move { provider.enrich(match_id).await });
        let was_murderer = match lookup.await {
            Ok(Ok(was_murderer)) => was_murderer,
            Ok(Err(e)) => {
                tracing::debug!("Role lookup failed for match {}: {}", match_id, e);
                false
            }
            Err(e) => {
                tracing::warn!("Role lookup task for match {} failed: {}", match_id, e);
                false
            }
        };
        enriched.push(Match::from(raw).with_role(was_murderer));
    }

    enriched
}

/// All enrichment calls at once; results are put back in input order
async fn enrich_concurrent(
    provider: Arc<dyn MatchHistoryProvider>,
    raw_matches: Vec<RawMatch>,
) -> Vec<Match> {
    let mut roles = vec![false; raw_matches.len()];
    let mut lookups = JoinSet::new();

    for (index, raw) in raw_matches.iter().enumerate() {
        let provider = Arc::clone(&provider);
        let match_id = raw.id;
        lookups.spawn(async move { (index, match_id, provider.enrich(match_id).await) });
    }

    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((index, _, Ok(was_murderer))) => roles[index] = was_murderer,
            Ok((_, match_id, Err(e))) => {
                tracing::debug!("Role lookup failed for match {}: {}", match_id, e);
            }
            Err(e) => tracing::warn!("Role lookup task failed: {}", e),
        }
    }

    raw_matches
        .into_iter()
        .zip(roles)
        .map(|(raw, was_murderer)| Match::from(raw).with_role(was_murderer))
        .collect()
}
