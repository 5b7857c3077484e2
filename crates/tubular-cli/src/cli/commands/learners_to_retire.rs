//! `tubular learners-to-retire` – print the retirement queue as JSON.

use anyhow::Result;
use tubular_core::config::TubularConfig;

use super::lms_client;

pub fn run_learners_to_retire(
    cfg: &TubularConfig,
    states: &[String],
    cool_off_days: u32,
) -> Result<()> {
    let api = lms_client(cfg)?;
    let states: Vec<&str> = states.iter().map(String::as_str).collect();
    let learners = api.learners_to_retire(&states, cool_off_days)?;
    tracing::info!(count = learners.len(), "fetched retirement queue");
    println!("{}", serde_json::to_string_pretty(&learners)?);
    Ok(())
}
