//! OAuth2 client-credentials exchange against the LMS.

use serde::Deserialize;
use std::time::{Duration, SystemTime};

use crate::error::ApiError;
use crate::rest::{perform, Method};

pub const OAUTH_ACCESS_TOKEN_PATH: &str = "/oauth2/access_token";

/// Bearer-style token returned by the LMS, used as a JWT on later requests.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    /// When the provider said the token stops being valid, if it said.
    pub expires_at: Option<SystemTime>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// URL of the token endpoint for an LMS root.
pub fn access_token_url(oauth_base_url: &str) -> String {
    format!(
        "{}{}",
        oauth_base_url.trim_end_matches('/'),
        OAUTH_ACCESS_TOKEN_PATH
    )
}

/// Exchanges client credentials for a JWT access token. Not retried.
pub fn get_access_token(
    oauth_base_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AccessToken, ApiError> {
    let form = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "client_credentials")
        .append_pair("client_id", client_id)
        .append_pair("client_secret", client_secret)
        .append_pair("token_type", "jwt")
        .finish();
    let headers = vec![
        "Content-Type: application/x-www-form-urlencoded".to_string(),
        "Accept: application/json".to_string(),
    ];

    let url = access_token_url(oauth_base_url);
    let response = perform(Method::Post, &url, &headers, Some(form.as_bytes()))?;
    if !response.is_success() {
        let body = response.body_text();
        if (400..500).contains(&response.status) {
            tracing::error!("API Error: {}", body);
        }
        return Err(ApiError::Auth {
            status: response.status,
            body,
        });
    }

    let parsed: TokenResponse = serde_json::from_slice(&response.body)?;
    let expires_at = parsed
        .expires_in
        .map(|secs| SystemTime::now() + Duration::from_secs(secs));
    tracing::debug!(client_id, "obtained access token");
    Ok(AccessToken {
        token: parsed.access_token,
        expires_at,
    })
}
