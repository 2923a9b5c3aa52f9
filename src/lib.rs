pub mod api;
pub mod home;
pub mod logging;
pub mod providers;
pub mod settings;

use std::sync::Arc;

use api::ApiClient;
use home::HomeProviders;

/// Wire every home provider to the same backend client
pub fn backend_providers(client: ApiClient) -> HomeProviders {
    let client = Arc::new(client);
    HomeProviders {
        profile: client.clone(),
        friends: client.clone(),
        matches: client.clone(),
        session: client,
    }
}
