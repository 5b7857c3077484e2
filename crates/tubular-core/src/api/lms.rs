//! LMS retirement endpoints.

use serde_json::{json, Value};

use super::{retry_500_504, retry_504, BaseApiClient, Learner};
use crate::auth::AccessToken;
use crate::error::ApiError;
use crate::retry::Sleeper;

pub const DEFAULT_COOL_OFF_DAYS: u32 = 7;

/// Result of the forum retirement step.
#[derive(Debug, Clone, PartialEq)]
pub enum ForumRetirement {
    Retired(Value),
    /// The forum service answered 404: the learner has no forum data left.
    NothingToRetire,
}

/// LMS API client.
#[derive(Debug)]
pub struct LmsApi {
    client: BaseApiClient,
}

impl LmsApi {
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

    /// Learners in any of `states` whose last state change is older than
    /// `cool_off_days`.
    pub fn learners_to_retire(
        &self,
        states: &[&str],
        cool_off_days: u32,
    ) -> Result<Vec<Learner>, ApiError> {
        let mut query = vec![("cool_off_days", cool_off_days.to_string())];
        query.extend(states.iter().map(|s| ("states", s.to_string())));

        self.client.call("learners_to_retire", retry_504(), |rest| {
            let value = rest
                .get(&["api", "user", "v1", "accounts", "retirement_queue"], &query)
                .map_err(|e| {
                    if e.is_client_error() {
                        tracing::error!("API Error: {}", e.body().unwrap_or_default());
                    }
                    e
                })?;
            Ok(serde_json::from_value(value)?)
        })
    }

    pub fn get_learner_retirement_state(&self, username: &str) -> Result<Value, ApiError> {
        self.client
            .call("get_learner_retirement_state", retry_504(), |rest| {
                rest.get(
                    &["api", "user", "v1", "accounts", username, "retirement_status"],
                    &[],
                )
            })
    }

    /// Moves the learner to `new_state_name`; `message` is stored with the
    /// transition for auditing.
    pub fn update_learner_retirement_state(
        &self,
        username: &str,
        new_state_name: &str,
        message: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "username": username,
            "new_state": new_state_name,
            "response": message,
        });
        self.client
            .call("update_learner_retirement_state", retry_504(), |rest| {
                rest.patch(
                    &["api", "user", "v1", "accounts", "update_retirement_status"],
                    &body,
                )
            })
    }

    /// Deactivates the account and forces logout.
    pub fn retirement_deactivate_logout(&self, learner: &Learner) -> Result<Value, ApiError> {
        let body = learner.username_payload();
        self.client
            .call("retirement_deactivate_logout", retry_504(), |rest| {
                rest.post(&["api", "user", "v1", "accounts", "deactivate_logout"], &body)
            })
    }

    /// Retires discussion forum data. A 404 means there is nothing left to
    /// retire and is reported as success.
    pub fn retirement_retire_forum(&self, learner: &Learner) -> Result<ForumRetirement, ApiError> {
        let body = learner.username_payload();
        self.client
            .call("retirement_retire_forum", retry_504(), |rest| {
                match rest.post(&["api", "discussion", "v1", "accounts", "retire_forum"], &body) {
                    Ok(value) => Ok(ForumRetirement::Retired(value)),
                    Err(e) if e.is_not_found() => Ok(ForumRetirement::NothingToRetire),
                    Err(e) => Err(e),
                }
            })
    }

    /// Removes the learner from email lists.
    pub fn retirement_retire_mailings(&self, learner: &Learner) -> Result<Value, ApiError> {
        let body = learner.username_payload();
        self.client
            .call("retirement_retire_mailings", retry_500_504(), |rest| {
                rest.post(&["api", "user", "v1", "accounts", "retire_mailings"], &body)
            })
    }

    /// Unenrolls the learner from all courses.
    pub fn retirement_unenroll(&self, learner: &Learner) -> Result<Value, ApiError> {
        let body = learner.username_payload();
        self.client.call("retirement_unenroll", retry_504(), |rest| {
            rest.post(&["api", "enrollment", "v1", "unenroll"], &body)
        })
    }

    /// Deletes the learner's notes. The notes backend reports its own
    /// unavailability as 500, so that status is retried too.
    pub fn retirement_retire_notes(&self, learner: &Learner) -> Result<Value, ApiError> {
        let body = learner.username_payload();
        self.client
            .call("retirement_retire_notes", retry_500_504(), |rest| {
                rest.post(&["api", "edxnotes", "v1", "retire_user"], &body)
            })
    }

    /// Deletes, blanks or one-way hashes miscellaneous personal information.
    pub fn retirement_lms_retire_misc(&self, learner: &Learner) -> Result<Value, ApiError> {
        let body = learner.username_payload();
        self.client
            .call("retirement_lms_retire_misc", retry_504(), |rest| {
                rest.post(&["api", "user", "v1", "accounts", "retire_misc"], &body)
            })
    }

    /// Final LMS step: retires all remaining personal information.
    pub fn retirement_lms_retire(&self, learner: &Learner) -> Result<Value, ApiError> {
        let body = learner.username_payload();
        self.client.call("retirement_lms_retire", retry_504(), |rest| {
            rest.post(&["api", "user", "v1", "accounts", "retire"], &body)
        })
    }
}
