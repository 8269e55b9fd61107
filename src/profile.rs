use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::Result;

/// Fetches public Gravatar profiles.
///
/// Requests block the calling thread and have no timeout or retry. The body
/// is decoded whatever the HTTP status: Gravatar answers unknown hashes with a
/// 404 whose body is the JSON string `"User not found"`.
#[derive(Clone, Debug)]
pub struct ProfileClient {
    http_client: Client,
}

impl ProfileClient {
    pub fn new() -> Result<ProfileClient> {
        let http_client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(ProfileClient::from_client(http_client))
    }

    /// Uses a caller-configured client, e.g. one with a timeout.
    pub fn from_client(http_client: Client) -> ProfileClient {
        ProfileClient { http_client }
    }

    pub fn fetch(&self, profile_url: &str) -> Result<Value> {
        tracing::debug!("fetching gravatar profile {profile_url}");
        let response = self.http_client.get(profile_url).send()?;
        tracing::debug!("gravatar profile {profile_url} -> {}", response.status());
        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}
