use crate::api::error::ApiError;
use reqwest::Method;
use std::collections::BTreeMap;

pub(crate) mod client;
pub use client::{ApiClient, RequestOptions};
pub mod error;
pub(crate) mod transport;
pub use transport::ReqwestTransport;

#[cfg(test)]
use mockall::automock;

/// Header map keyed by lower-cased header name.
pub type Headers = BTreeMap<String, String>;

/// A fully resolved HTTP request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

#[cfg(test)]
impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Raw HTTP response: status code and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns whatever the server answered.
    ///
    /// Only failures to obtain a response are errors; non-2xx statuses are not.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}
