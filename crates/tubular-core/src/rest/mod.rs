//! Blocking JSON REST client for the edX-style service APIs.
//!
//! Requests are authorized with `Authorization: JWT <token>` and, like the
//! services expect, every resource path ends in a slash.

mod transfer;

pub use transfer::{perform, Method, RawResponse};

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;

/// Authenticated handle to one service's API root.
#[derive(Clone)]
pub struct RestClient {
    base_url: Url,
    jwt: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub fn new(api_base_url: &str, jwt: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(api_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            base_url,
            jwt: jwt.into(),
        })
    }

    /// Resource URL for `segments` below the API root. Each segment is
    /// percent-encoded on its own, so usernames cannot escape their slot.
    pub fn url_for(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty().extend(segments).push("");
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    pub fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.url_for(segments, query)?;
        self.send(Method::Get, &url, None)
    }

    pub fn post<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<Value, ApiError> {
        let url = self.url_for(segments, &[])?;
        let bytes = serde_json::to_vec(body)?;
        self.send(Method::Post, &url, Some(&bytes))
    }

    pub fn patch<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<Value, ApiError> {
        let url = self.url_for(segments, &[])?;
        let bytes = serde_json::to_vec(body)?;
        self.send(Method::Patch, &url, Some(&bytes))
    }

    fn send(&self, method: Method, url: &Url, body: Option<&[u8]>) -> Result<Value, ApiError> {
        let mut headers = vec![
            format!("Authorization: JWT {}", self.jwt),
            "Accept: application/json".to_string(),
        ];
        if body.is_some() {
            headers.push("Content-Type: application/json".to_string());
        }
        tracing::debug!(?method, url = %url, "api request");
        let response = perform(method, url.as_str(), &headers, body)?;
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body_text(),
            });
        }
        decode_body(&response.body)
    }
}

/// Empty bodies (e.g. 204) decode to `null`.
pub(crate) fn decode_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}
