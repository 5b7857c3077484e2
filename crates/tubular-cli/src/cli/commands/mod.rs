//! CLI command handlers, one per file.

mod base_ami;
mod learners_to_retire;
mod retirement_state;
mod service_retire;

pub use base_ami::run_retrieve_latest_base_ami;
pub use learners_to_retire::run_learners_to_retire;
pub use retirement_state::run_retirement_state;
pub use service_retire::{run_credentials_retire, run_ecommerce_retire};

use anyhow::{Context, Result};
use tubular_core::api::LmsApi;
use tubular_core::config::TubularConfig;

/// LMS client authenticated with the configured credentials.
fn lms_client(cfg: &TubularConfig) -> Result<LmsApi> {
    LmsApi::new(
        &cfg.lms_base_url,
        &cfg.lms_base_url,
        &cfg.client_id,
        &cfg.resolved_client_secret(),
    )
    .with_context(|| format!("connect to LMS at {}", cfg.lms_base_url))
}
