use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use scrapedeck_logging::{clip_for_log, deck_debug, deck_warn};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, ApiErrorKind, ResultsReply, StartReply, StartRequest, StatusReply};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const START_ROUTE: &str = "start_scrape";
pub const STATUS_ROUTE: &str = "status";
pub const RESULTS_ROUTE: &str = "results";
pub const DOWNLOAD_ROUTE: &str = "download";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Cap on any response body, JSON or artifact.
    pub max_body_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 50 * 1024 * 1024,
        }
    }
}

/// The four operations of the job protocol.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn start(&self, url: &str) -> Result<StartReply, ApiError>;
    async fn status(&self, job_id: &str) -> Result<StatusReply, ApiError>;
    async fn results(&self, job_id: &str) -> Result<ResultsReply, ApiError>;
    /// Artifact bytes, passed through uninterpreted.
    async fn download(&self, job_id: &str) -> Result<Vec<u8>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::new(
                ApiErrorKind::InvalidUrl,
                format!("unsupported base url {}", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    /// Absolute URL of the per-job artifact.
    pub fn artifact_url(&self, job_id: &str) -> Result<Url, ApiError> {
        self.endpoint(DOWNLOAD_ROUTE, Some(job_id))
    }

    fn endpoint(&self, route: &str, job_id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::new(ApiErrorKind::InvalidUrl, "base url cannot carry a path")
            })?;
            segments.pop_if_empty().push(route);
            if let Some(id) = job_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        deck_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.decode(response).await
    }

    /// Parses the body whatever the HTTP status, since the server reports
    /// structured errors (e.g. unknown job id) on 4xx responses.
    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = self.read_capped(response).await?;
        match serde_json::from_slice::<T>(&body) {
            Ok(value) => {
                if !status.is_success() {
                    deck_warn!("structured reply with http status {}", status);
                }
                Ok(value)
            }
            Err(_) if !status.is_success() => Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )),
            Err(err) => Err(ApiError::new(ApiErrorKind::Decode, err.to_string())),
        }
    }

    async fn read_capped(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let max_bytes = self.settings.max_body_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    ApiErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    ApiErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn start(&self, url: &str) -> Result<StartReply, ApiError> {
        let endpoint = self.endpoint(START_ROUTE, None)?;
        let body = serde_json::to_vec(&StartRequest { url })
            .map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))?;
        deck_debug!("POST {} url={}", endpoint, clip_for_log(url, 120));
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.decode(response).await
    }

    async fn status(&self, job_id: &str) -> Result<StatusReply, ApiError> {
        let endpoint = self.endpoint(STATUS_ROUTE, Some(job_id))?;
        self.get_json(endpoint).await
    }

    async fn results(&self, job_id: &str) -> Result<ResultsReply, ApiError> {
        let endpoint = self.endpoint(RESULTS_ROUTE, Some(job_id))?;
        self.get_json(endpoint).await
    }

    async fn download(&self, job_id: &str) -> Result<Vec<u8>, ApiError> {
        let endpoint = self.artifact_url(job_id)?;
        deck_debug!("GET {}", endpoint);
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = self.read_capped(response).await?;
        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body);
            let detail = detail.trim();
            let message = if detail.is_empty() {
                status.to_string()
            } else {
                format!("{status}: {}", clip_for_log(detail, 200))
            };
            return Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        Ok(body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiErrorKind::Decode, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}
