use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::{consts, http};

use super::{LikeRequest, ServiceResult, TIMEOUT_MESSAGE};

/// Faults of a single request to the OneBot API.
///
/// The reqwest error is part of the message, which is shown to chat users, so it is not also
/// exposed as the source.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not build http client: {0}")]
    BuildClient(reqwest::Error),
    #[error("could not send request: {0}")]
    Request(reqwest::Error),
    #[error("unexpected content type: {0}")]
    ContentType(String),
    #[error("could not decode response: {0}")]
    DecodeResponse(reqwest::Error),
}

impl Error {
    /// Returns whether the request was aborted because it exceeded its timeout.
    fn is_timeout(&self) -> bool {
        match self {
            Self::Request(err) | Self::DecodeResponse(err) => err.is_timeout(),
            Self::BuildClient(_) | Self::ContentType(_) => false,
        }
    }
}

/// Returns an error unless the response declares a JSON body.
///
/// A missing `Content-Type` is treated as `application/octet-stream`.
fn check_content_type(response: &reqwest::Response) -> Result<(), Error> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");
    let mime = content_type.split(';').next().unwrap_or_default().trim();

    if mime.eq_ignore_ascii_case("application/json") {
        Ok(())
    } else {
        Err(Error::ContentType(mime.to_string()))
    }
}

/// OneBot API client for the `send_like` action.
#[derive(Debug, Clone)]
pub struct Client {
    /// The full URL of the `send_like` endpoint.
    endpoint: String,
    /// Total timeout of a single request.
    timeout: Duration,
}

impl Client {
    /// Creates a client for the OneBot API at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, consts::HTTP_TIMEOUT)
    }

    /// Creates a client for the OneBot API at `base_url` that gives up on requests after
    /// `timeout`.
    #[must_use]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let endpoint = format!("{}/send_like", base_url.trim_end_matches('/'));

        Self { endpoint, timeout }
    }

    /// Returns the URL like requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Asks the OneBot API to like the given user the requested number of times.
    ///
    /// The request is attempted exactly once. Faults never escape: a timeout or any other
    /// transport or decoding fault is returned as a [`ServiceResult::Failed`].
    pub async fn send_like(&self, request: &LikeRequest) -> ServiceResult {
        match self.post(request).await {
            Ok(body) => ServiceResult::from_response(&body),
            Err(err) if err.is_timeout() => {
                error!(endpoint = %self.endpoint, "like request timed out");

                ServiceResult::failed(TIMEOUT_MESSAGE)
            }
            Err(err) => {
                error!(endpoint = %self.endpoint, %err, "like request failed");

                ServiceResult::failed(format!("请求异常: {err}"))
            }
        }
    }

    async fn post(&self, request: &LikeRequest) -> Result<Value, Error> {
        // Every request gets its own client so nothing is shared between concurrent handlers.
        let client = http::build_client(self.timeout).map_err(Error::BuildClient)?;

        debug!(endpoint = %self.endpoint, ?request, "sending like request");
        let response = client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(Error::Request)?;
        let status = response.status();
        check_content_type(&response)?;
        let body: Value = response.json().await.map_err(Error::DecodeResponse)?;
        debug!(%status, %body, "received like response");

        Ok(body)
    }
}
