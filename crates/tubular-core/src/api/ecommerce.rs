//! Ecommerce retirement endpoint.

use serde_json::Value;

use super::{retry_504, BaseApiClient, Learner};
use crate::auth::AccessToken;
use crate::error::ApiError;
use crate::retry::Sleeper;

#[derive(Debug)]
pub struct EcommerceApi {
    client: BaseApiClient,
}

impl EcommerceApi {
    pub fn new(
        lms_base_url: &str,
        api_base_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, ApiError> {
        BaseApiClient::new(lms_base_url, api_base_url, client_id, client_secret).map(Self::from_client)
    }

    pub fn with_token(api_base_url: &str, token: &AccessToken) -> Result<Self, ApiError> {
        BaseApiClient::with_token(api_base_url, token).map(Self::from_client)
    }

    pub fn from_client(client: BaseApiClient) -> Self {
        Self { client }
    }

    pub fn with_sleeper(self, sleeper: impl Sleeper + 'static) -> Self {
        Self::from_client(self.client.with_sleeper(sleeper))
    }

    pub fn retire_learner(&self, learner: &Learner) -> Result<Value, ApiError> {
        let body = learner.username_payload();
        self.client.call("ecommerce_retire_learner", retry_504(), |rest| {
            rest.post(&["api", "v2", "user", "retire"], &body)
        })
    }
}
