use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::providers::{
    Failure, Friend, FriendListProvider, MatchHistoryProvider, Profile, ProfileProvider, RawMatch,
    SessionProvider,
};
use crate::settings::AppSettings;

const PROFILE_PATH: &str = "players/me";
const FRIENDS_PATH: &str = "friends";
const MATCHES_PATH: &str = "games/user";
const LOGOUT_PATH: &str = "auth/logout";

fn murderer_path(match_id: i64) -> String {
    format!("games/{}/murderer", match_id)
}

/// Game backend client. Implements every provider the home screen needs.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &AppSettings, access_token: Option<String>) -> Result<Self, Failure> {
        tracing::debug!("Initializing ApiClient for {}", settings.api_base_url);

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| Failure::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: parse_base_url(&settings.api_base_url)?,
            access_token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Failure> {
        self.base_url
            .join(path)
            .map_err(|e| Failure::Other(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Failure> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Failure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(Failure::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Failure> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self.send(self.http.get(url)).await?;
        response
            .json()
            .await
            .map_err(|e| Failure::Decode(e.to_string()))
    }
}

/// Endpoints are joined relative to the base, so it must end with a slash
fn parse_base_url(base_url: &str) -> Result<Url, Failure> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    Url::parse(&normalized)
        .map_err(|e| Failure::Other(format!("Invalid API base URL {}: {}", base_url, e)))
}

#[async_trait]
impl ProfileProvider for ApiClient {
    async fn fetch(&self) -> Result<Profile, Failure> {
        self.get_json(PROFILE_PATH).await
    }
}

#[async_trait]
impl FriendListProvider for ApiClient {
    async fn fetch(&self) -> Result<Vec<Friend>, Failure> {
        self.get_json(FRIENDS_PATH).await
    }
}

#[async_trait]
impl MatchHistoryProvider for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<RawMatch>, Failure> {
        self.get_json(MATCHES_PATH).await
    }

    async fn enrich(&self, match_id: i64) -> Result<bool, Failure> {
        self.get_json(&murderer_path(match_id)).await
    }
}

#[async_trait]
impl SessionProvider for ApiClient {
    async fn end_session(&self) -> Result<(), Failure> {
        let url = self.endpoint(LOGOUT_PATH)?;
        tracing::debug!("POST {}", url);

        self.send(self.http.post(url)).await?;
        Ok(())
    }
}
