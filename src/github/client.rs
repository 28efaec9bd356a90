use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client as HttpClient, Proxy, RequestBuilder, Response};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::config;
use crate::error::FetchError;
use crate::model::{Credential, Entity, FetchResult, Fetcher};

const USER_AGENT: &str = "github-activity-collector";

pub struct Client {
    http_client: HttpClient,
    // one connection pool per proxy address, built on first use
    proxied_clients: Mutex<HashMap<String, HttpClient>>,
    config: config::GithubConfig,
}

impl Client {
    pub fn new(config: config::GithubConfig) -> Self {
        let http_client = HttpClient::new();
        Self {
            http_client,
            proxied_clients: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Returns the client routed through `address`, building it on first use.
    async fn proxied_client(&self, address: &str) -> Result<HttpClient, FetchError> {
        let mut clients = self.proxied_clients.lock().await;
        if let Some(client) = clients.get(address) {
            return Ok(client.clone());
        }

        let proxy = Proxy::all(address).map_err(|e| FetchError::proxy(address, e))?;
        let client = HttpClient::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| FetchError::proxy(address, e))?;
        clients.insert(address.to_string(), client.clone());
        Ok(client)
    }

    async fn request(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<RequestBuilder, FetchError> {
        let request = match credential {
            Credential::Direct => {
                let request = self.http_client.get(url);
                if self.config.oauth_token.is_empty() {
                    request
                } else {
                    request.header(
                        "authorization",
                        format!("token {}", self.config.oauth_token),
                    )
                }
            }
            Credential::Proxy(address) => self.proxied_client(address).await?.get(url),
        };

        Ok(request.header("user-agent", USER_AGENT))
    }

    /// Sends a GET and rejects any non-2xx answer.
    async fn send(&self, url: &str, credential: &Credential) -> Result<Response, FetchError> {
        let response = self.request(url, credential).await?.send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(FetchError::status(status, body))
        }
    }

    /// Fetches one page and decodes its body as a JSON array of records.
    pub async fn fetch_page(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<(HeaderMap, Vec<Entity>), FetchError> {
        let response = self.send(url, credential).await?;
        let headers = response.headers().clone();
        let body = response.text().await?;
        let entities: Vec<Entity> = serde_json::from_str(&body).map_err(FetchError::decode)?;
        Ok((headers, entities))
    }

    /// Fetches `url` and returns only the response headers.
    pub async fn fetch_headers(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<HeaderMap, FetchError> {
        let response = self.send(url, credential).await?;
        Ok(response.headers().clone())
    }
}

#[async_trait]
impl Fetcher for Client {
    async fn get(&self, url: &str, credential: &Credential) -> FetchResult {
        tracing::info!("Request '{}' (credential '{}')", url, credential);

        match self.fetch_page(url, credential).await {
            Ok((headers, entities)) => {
                tracing::info!("Received '{}' entities", entities.len());
                FetchResult::success(headers, entities)
            }
            Err(e) => {
                tracing::error!(
                    url = %url,
                    credential = %credential,
                    error = %e,
                    "Request failed"
                );
                FetchResult::failure()
            }
        }
    }
}
