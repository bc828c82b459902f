pub mod backend;
pub mod routing;

pub use backend::*;
pub use routing::*;

use std::backtrace::Backtrace;
use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{info_span, Instrument};

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("error fetching data \n{} \n{}", source, backtrace)]
    Http {
        #[from]
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    #[error("error parsing the response of {} \n{} \n{} \n {}", url, source, body, backtrace)]
    Parsing {
        url: Url,
        source: serde_json::Error,
        body: String,
        backtrace: Backtrace,
    },

    #[error("couldn't build url {path}: {reason}")]
    InvalidUrl { path: String, reason: String },
}

pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub(crate) fn join_url(base: &Url, path: &str) -> Result<Url, FetchError> {
    base.join(path).map_err(|e| FetchError::InvalidUrl {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// GETs `url` and parses the body as JSON. Non 2xx statuses are errors.
pub(crate) async fn get_json<T: DeserializeOwned>(http: &Client, url: Url) -> Result<T, FetchError> {
    let response = send(http, &url).await?.error_for_status()?;

    read_json(response, url).await
}

pub(crate) async fn send(http: &Client, url: &Url) -> Result<Response, FetchError> {
    Ok(http
        .get(url.clone())
        .send()
        .instrument(info_span!("Sending request", %url))
        .await?)
}

/// Parses the body whatever the status. The raw body ends up in the error if it isn't valid.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    url: Url,
) -> Result<T, FetchError> {
    let body = response
        .text()
        .instrument(info_span!("Reading body of response"))
        .await?;

    serde_json::from_str(&body).map_err(|source| FetchError::Parsing {
        url,
        source,
        body,
        backtrace: Backtrace::capture(),
    })
}
