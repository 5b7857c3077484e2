//! Latest Ubuntu base AMI lookup.
//!
//! Either takes an override id as-is, or reads Ubuntu's cloud-images locator
//! for the requested release and picks the first HVM image in the region.

mod locator;
mod output;

pub use locator::{
    fetch_listing, find_hvm_image, locator_url, parse_row, suite_for_version, LocatorImage,
    LOCATOR_BASE_URL,
};
pub use output::AmiInfo;

use anyhow::{Context, Result};

pub const DEFAULT_REGION: &str = "us-east-1";

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmiRequest {
    pub override_ami: Option<String>,
    pub ubuntu_version: Option<String>,
    pub region: String,
}

/// Resolves [`AmiRequest`]s against a locator endpoint.
#[derive(Debug, Clone)]
pub struct AmiLookup {
    locator_base_url: String,
}

impl Default for AmiLookup {
    fn default() -> Self {
        Self::new(LOCATOR_BASE_URL)
    }
}

impl AmiLookup {
    pub fn new(locator_base_url: impl Into<String>) -> Self {
        Self {
            locator_base_url: locator_base_url.into(),
        }
    }

    pub fn resolve(&self, request: &AmiRequest) -> Result<AmiInfo> {
        if let Some(ami_id) = request.override_ami.as_deref().filter(|s| !s.is_empty()) {
            tracing::info!("Using override AMI ID : {}", ami_id);
            return Ok(AmiInfo::new(ami_id));
        }

        let version = request
            .ubuntu_version
            .as_deref()
            .context("an Ubuntu version is required when no override AMI is given")?;
        tracing::info!("Ubuntu version : {}", version);
        let suite = suite_for_version(version).with_context(|| {
            format!("unsupported Ubuntu version {}; expected 16.04 or 18.04", version)
        })?;

        let url = locator_url(&self.locator_base_url, suite);
        tracing::info!(suite, url = %url, "reading cloud image locator");
        let listing = fetch_listing(&url)?;
        let image = find_hvm_image(&listing, &request.region).with_context(|| {
            format!("no hvm image for region {} in {}", request.region, url)
        })?;

        tracing::info!("Found latest AMI ID : {}", image.ami_id);
        Ok(AmiInfo::new(&image.ami_id).with_tags(image.tags()))
    }
}
