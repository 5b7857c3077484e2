//! `tubular ecommerce-retire <username>` and `tubular credentials-retire <username>`

use anyhow::{Context, Result};
use tubular_core::api::{CredentialsApi, EcommerceApi, Learner};
use tubular_core::config::TubularConfig;

pub fn run_ecommerce_retire(cfg: &TubularConfig, username: &str) -> Result<()> {
    let base_url = service_url(cfg.ecommerce_base_url.as_deref(), "ecommerce_base_url")?;
    let api = EcommerceApi::new(
        &cfg.lms_base_url,
        base_url,
        &cfg.client_id,
        &cfg.resolved_client_secret(),
    )
    .with_context(|| format!("connect to ecommerce at {}", base_url))?;
    let result = api.retire_learner(&Learner::new(username))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn run_credentials_retire(cfg: &TubularConfig, username: &str) -> Result<()> {
    let base_url = service_url(cfg.credentials_base_url.as_deref(), "credentials_base_url")?;
    let api = CredentialsApi::new(
        &cfg.lms_base_url,
        base_url,
        &cfg.client_id,
        &cfg.resolved_client_secret(),
    )
    .with_context(|| format!("connect to credentials at {}", base_url))?;
    let result = api.retire_learner(&Learner::new(username))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn service_url<'a>(url: Option<&'a str>, key: &str) -> Result<&'a str> {
    url.filter(|u| !u.is_empty())
        .with_context(|| format!("{} is not configured", key))
}
