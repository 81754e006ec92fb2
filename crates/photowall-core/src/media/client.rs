use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{MediaApi, MediaResource};
use crate::config::MediaConfig;
use crate::{Error, Result};

const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 500;
/// Largest page the search endpoint accepts
const MAX_PAGE_SIZE: u32 = 500;
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    expression: &'a str,
    sort_by: Vec<serde_json::Value>,
    max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Vec<MediaResource>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// HTTP client for the media Admin and delivery APIs
pub struct MediaClient {
    client: Client,
    api_base: Url,
    cloud_name: String,
    credentials: Option<(String, String)>,
}

impl MediaClient {
    pub fn new(config: &MediaConfig) -> Result<Self> {
        if config.cloud_name.trim().is_empty() {
            return Err(Error::Config(
                "media.cloud_name is not set (config file or CLOUDINARY_CLOUD_NAME)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        let credentials = match (&config.api_key, &config.api_secret) {
            (Some(key), Some(secret)) => Some((key.clone(), secret.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            api_base: Url::parse(&config.api_base)?,
            cloud_name: config.cloud_name.clone(),
            credentials,
        })
    }

    fn search_url(&self) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid media.api_base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(["v1_1", self.cloud_name.as_str(), "resources", "search"]);
        Ok(url)
    }

    fn resource_url(&self, public_id: &str) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid media.api_base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(["v1_1", self.cloud_name.as_str(), "resources", "image", "upload"])
            .extend(public_id.split('/'));
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let (key, secret) = self.credentials.as_ref().ok_or_else(|| {
            Error::Config(
                "media.api_key and media.api_secret are required for catalog access".to_string(),
            )
        })?;
        Ok(request.basic_auth(key, Some(secret)))
    }

    /// Send with retry and exponential backoff on throttling and transport errors
    async fn send_with_retry<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> Result<RequestBuilder>,
    {
        let mut last_error = None;
        let mut delay_ms = INITIAL_RETRY_DELAY_MS;

        for attempt in 0..MAX_RETRIES {
            match build()?.send().await {
                Ok(response) if is_retryable(response.status()) => {
                    tracing::warn!(
                        "Media API returned {}, retrying after {}ms...",
                        response.status(),
                        delay_ms
                    );
                    last_error = Some(api_error(response).await);
                }
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("Media API request failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(Error::Http(e));
                }
            }

            if attempt < MAX_RETRIES - 1 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::Other(format!("Media API request failed after {} retries", MAX_RETRIES))
        }))
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

fn search_body<'a>(expression: &'a str, page_size: u32, cursor: Option<&'a str>) -> SearchRequest<'a> {
    SearchRequest {
        expression,
        sort_by: vec![serde_json::json!({ "public_id": "desc" })],
        max_results: page_size,
        next_cursor: cursor,
    }
}

async fn api_error(response: Response) -> Error {
    let status = response.status().as_u16();
    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    Error::Api { status, message }
}

#[async_trait::async_trait]
impl MediaApi for MediaClient {
    async fn search(&self, expression: &str, max_results: u32) -> Result<Vec<MediaResource>> {
        let url = self.search_url()?;
        let mut resources: Vec<MediaResource> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let remaining = max_results.saturating_sub(resources.len() as u32);
            if remaining == 0 {
                break;
            }
            let body = search_body(expression, remaining.min(MAX_PAGE_SIZE), cursor.as_deref());

            tracing::debug!("Searching media: {} (cursor {:?})", expression, cursor);
            let response = self
                .send_with_retry(|| self.authorized(self.client.post(url.clone()).json(&body)))
                .await?;
            if !response.status().is_success() {
                return Err(api_error(response).await);
            }

            let page: SearchResponse = serde_json::from_slice(&response.bytes().await?)?;
            resources.extend(page.resources);

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        resources.truncate(max_results as usize);
        tracing::info!("Media search returned {} resources", resources.len());
        Ok(resources)
    }

    async fn resource(&self, public_id: &str) -> Result<MediaResource> {
        let url = self.resource_url(public_id)?;
        let response = self
            .send_with_retry(|| self.authorized(self.client.get(url.clone())))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::PhotoNotFound(public_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        let url = Url::parse(url)?;
        let response = self
            .send_with_retry(|| Ok(self.client.get(url.clone())))
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MediaConfig {
        MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_cloud_name() {
        let err = MediaClient::new(&MediaConfig::default()).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_search_url() {
        let client = MediaClient::new(&config()).unwrap();
        assert_eq!(
            client.search_url().unwrap().as_str(),
            "https://api.cloudinary.com/v1_1/demo/resources/search"
        );
    }

    #[test]
    fn test_resource_url_keeps_folders_and_encodes() {
        let client = MediaClient::new(&config()).unwrap();
        assert_eq!(
            client.resource_url("gallery/my photo").unwrap().as_str(),
            "https://api.cloudinary.com/v1_1/demo/resources/image/upload/gallery/my%20photo"
        );
    }

    #[test]
    fn test_search_body_shape() {
        let body = serde_json::to_value(search_body("folder:gallery/*", 400, None)).unwrap();
        assert_eq!(body["expression"], "folder:gallery/*");
        assert_eq!(body["sort_by"][0]["public_id"], "desc");
        assert_eq!(body["max_results"], 400);
        assert!(body.get("next_cursor").is_none());

        let paged = serde_json::to_value(search_body("x", 10, Some("abc"))).unwrap();
        assert_eq!(paged["next_cursor"], "abc");
    }

    #[test]
    fn test_missing_credentials() {
        let client = MediaClient::new(&MediaConfig {
            api_secret: None,
            ..config()
        })
        .unwrap();
        let request = client.client.get("https://example.com");
        assert!(matches!(client.authorized(request), Err(Error::Config(_))));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
        assert!(!is_retryable(StatusCode::OK));
    }
}
