//! `tubular retirement-state <username>`

use anyhow::Result;
use tubular_core::config::TubularConfig;

use super::lms_client;

pub fn run_retirement_state(cfg: &TubularConfig, username: &str) -> Result<()> {
    let api = lms_client(cfg)?;
    let state = api.get_learner_retirement_state(username)?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
