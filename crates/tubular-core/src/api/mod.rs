//! Service clients for the learner retirement workflow.
//!
//! Each client owns one authenticated [`RestClient`] and exposes one method
//! per remote operation. Every method runs through [`run_with_retry`] with
//! the operation's own [`RetryPolicy`].

mod credentials;
mod ecommerce;
mod lms;

pub use credentials::CredentialsApi;
pub use ecommerce::EcommerceApi;
pub use lms::{ForumRetirement, LmsApi, DEFAULT_COOL_OFF_DAYS};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

use crate::auth::{self, AccessToken};
use crate::error::ApiError;
use crate::rest::RestClient;
use crate::retry::{run_with_retry, RetryPolicy, Sleeper, ThreadSleeper};

/// A learner record as returned by the retirement queue. Only
/// `original_username` is interpreted; everything else is carried along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learner {
    pub original_username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Learner {
    pub fn new(original_username: impl Into<String>) -> Self {
        Self {
            original_username: original_username.into(),
            extra: Map::new(),
        }
    }

    /// Request body used by every per-service retirement step.
    pub(crate) fn username_payload(&self) -> Value {
        json!({ "username": self.original_username })
    }
}

/// Policy for operations that only retry 504.
pub(crate) fn retry_504() -> &'static RetryPolicy {
    static POLICY: OnceLock<RetryPolicy> = OnceLock::new();
    POLICY.get_or_init(RetryPolicy::default)
}

/// Policy for operations whose backends surface transient 500s.
pub(crate) fn retry_500_504() -> &'static RetryPolicy {
    static POLICY: OnceLock<RetryPolicy> = OnceLock::new();
    POLICY.get_or_init(|| RetryPolicy::with_statuses([500]))
}

/// Authenticated connection shared by the service clients.
pub struct BaseApiClient {
    rest: RestClient,
    sleeper: Box<dyn Sleeper>,
}

impl std::fmt::Debug for BaseApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseApiClient")
            .field("rest", &self.rest)
            .finish_non_exhaustive()
    }
}

impl BaseApiClient {
    /// Fetches an access token from the LMS and builds a client for `api_base_url`.
    pub fn new(
        lms_base_url: &str,
        api_base_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, ApiError> {
        let token = auth::get_access_token(lms_base_url, client_id, client_secret)?;
        Self::with_token(api_base_url, &token)
    }

    pub fn with_token(api_base_url: &str, token: &AccessToken) -> Result<Self, ApiError> {
        Ok(Self {
            rest: RestClient::new(api_base_url, token.token.clone())?,
            sleeper: Box::new(ThreadSleeper),
        })
    }

    /// Replaces the sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub(crate) fn call<T, F>(
        &self,
        operation: &str,
        policy: &RetryPolicy,
        mut f: F,
    ) -> Result<T, ApiError>
    where
        F: FnMut(&RestClient) -> Result<T, ApiError>,
    {
        run_with_retry(policy, operation, self.sleeper.as_ref(), || f(&self.rest))
    }
}
