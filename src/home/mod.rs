mod coordinator;
mod error;
mod snapshot;
mod store;

pub use coordinator::{HomeCoordinator, HomeOptions, HomeProviders, RefreshHandle};
pub use error::HomeError;
pub use snapshot::{role_label_for, Match, Snapshot, INNOCENT_ROLE_LABEL, MURDERER_ROLE_LABEL};
pub use store::{SnapshotStore, Subscription, DEFAULT_SNAPSHOT_BUFFER};
