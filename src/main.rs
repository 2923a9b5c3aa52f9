use veil_companion::api::ApiClient;
use veil_companion::home::{HomeCoordinator, HomeOptions};
use veil_companion::{backend_providers, logging, settings};

const BASE_URL_ENV: &str = "VEIL_API_BASE_URL";
const ACCESS_TOKEN_ENV: &str = "VEIL_ACCESS_TOKEN";

#[tokio::main]
async fn main() {
    let _guard = logging::init_logging();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let mut settings = settings::load_settings()?;
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        settings.api_base_url = base_url;
    }

    let access_token = std::env::var(ACCESS_TOKEN_ENV).ok();
    if access_token.is_none() {
        tracing::warn!("{} is not set, requests will be anonymous", ACCESS_TOKEN_ENV);
    }

    let client = ApiClient::new(&settings, access_token)?;
    let (home, initial) =
        HomeCoordinator::launch(backend_providers(client), HomeOptions::from(&settings));

    let mut updates = home.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(snapshot) = updates.next().await {
            tracing::debug!(
                profile_loading = snapshot.profile_loading,
                matches_loading = snapshot.matches_loading,
                "Snapshot updated"
            );
        }
    });

    initial.join().await;
    printer.abort();

    let snapshot = home.snapshot();
    let json = serde_json::to_string_pretty(snapshot.as_ref())
        .map_err(|e| format!("Failed to serialize snapshot: {}", e))?;
    println!("{}", json);

    if let Some(error) = &snapshot.last_error {
        return Err(error.clone());
    }

    Ok(())
}
