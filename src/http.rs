//! HTTP features

use std::time::Duration;

use crate::consts;

pub use reqwest::Client;

/// Returns a HTTP client builder with the default settings and the given total request
/// `timeout`.
#[must_use]
pub fn builder(timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .user_agent(consts::HTTP_USER_AGENT)
}

/// Builds a HTTP client with the default settings and the given total request `timeout`.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    builder(timeout).build()
}
