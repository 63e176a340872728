use crate::{DownloadError, Result};
use derivative::Derivative;
use derive_setters::Setters;
use futures::StreamExt;
use log::{debug, info};
use reqwest::{
    Client,
    header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

/// Body and declared content type of a downloaded image.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub url: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Downloads image content over HTTP(S).
///
/// The timeout bounds the whole exchange: connecting, headers and body.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ImageFetcher {
    #[derivative(Default(value = "DEFAULT_TIMEOUT"))]
    timeout: Duration,

    #[setters(into)]
    #[derivative(Default(value = "DEFAULT_USER_AGENT.to_string()"))]
    user_agent: String,
}

impl ImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        Ok(headers)
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let request_error = |error: reqwest::Error| DownloadError::Fetch {
            error,
            url: url.to_string(),
        };

        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(self.headers()?)
            .build()
            .map_err(request_error)?;

        debug!("GET {url} (timeout {:?})", self.timeout);
        let response = client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(DownloadError::Network {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !content_type.contains("image") {
            return Err(DownloadError::Validation {
                content_type,
                url: url.to_string(),
            });
        }

        let mut bytes = vec![];
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(request_error)?;
            bytes.extend_from_slice(&chunk);
        }

        info!("downloaded {} bytes of {content_type} from {url}", bytes.len());

        Ok(FetchedImage {
            url: url.to_string(),
            content_type,
            bytes,
        })
    }
}
