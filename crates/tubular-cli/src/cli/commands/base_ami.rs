//! `tubular retrieve-latest-base-ami` – resolve the base AMI and emit YAML.

use anyhow::{Context, Result};
use std::path::Path;
use tubular_core::ami::{AmiLookup, AmiRequest, DEFAULT_REGION};
use tubular_core::config;

/// `config` is only consulted for the default region, and only when no
/// override and no `--region` were given. A missing default config file is
/// not created.
pub fn run_retrieve_latest_base_ami(
    config: Option<&Path>,
    override_ami: Option<String>,
    ubuntu_version: Option<String>,
    region: Option<String>,
    out_file: Option<&Path>,
) -> Result<()> {
    retrieve(config, override_ami, ubuntu_version, region, out_file)
        .context("Error finding base AMI ID.")
}

fn retrieve(
    config: Option<&Path>,
    override_ami: Option<String>,
    ubuntu_version: Option<String>,
    region: Option<String>,
    out_file: Option<&Path>,
) -> Result<()> {
    let has_override = override_ami.as_deref().is_some_and(|s| !s.is_empty());
    let region = match region {
        Some(region) => region,
        None if has_override => DEFAULT_REGION.to_string(),
        None => default_region(config)?,
    };
    let request = AmiRequest {
        override_ami,
        ubuntu_version,
        region,
    };
    let info = AmiLookup::default().resolve(&request)?;

    match out_file {
        Some(path) => {
            info.write_yaml(path)?;
            tracing::info!("wrote AMI info to {}", path.display());
        }
        None => print!("{}", info.to_yaml()?),
    }
    Ok(())
}

fn default_region(config: Option<&Path>) -> Result<String> {
    Ok(match config::load_existing(config)? {
        Some(cfg) => cfg.default_region().to_string(),
        None => DEFAULT_REGION.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn override_written_to_out_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ami.yml");
        run_retrieve_latest_base_ami(
            None,
            Some("ami-0feed".to_string()),
            None,
            None,
            Some(&path),
        )
        .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "---\nami_id: ami-0feed\nbase_ami_id: ami-0feed\n");
    }

    #[test]
    fn override_ignores_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(&cfg_path, "lms_base_url = 3").unwrap();
        let out = dir.path().join("ami.yml");
        run_retrieve_latest_base_ami(
            Some(&cfg_path),
            Some("ami-123".to_string()),
            None,
            None,
            Some(&out),
        )
        .unwrap();
        assert!(fs::read_to_string(&out).unwrap().contains("ami_id: ami-123"));
    }

    #[test]
    fn explicit_region_ignores_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(&cfg_path, "lms_base_url = 3").unwrap();
        // The version check fails before any network access, after the
        // region has been settled without reading the config.
        let err = run_retrieve_latest_base_ami(
            Some(&cfg_path),
            None,
            Some("12.04".to_string()),
            Some("eu-west-1".to_string()),
            None,
        )
        .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("12.04"), "{msg}");
        assert!(!msg.contains("parse"), "{msg}");
    }

    #[test]
    fn default_region_from_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(
            &cfg_path,
            "lms_base_url = \"https://lms\"\nclient_id = \"x\"\n[ami]\ndefault_region = \"eu-west-1\"\n",
        )
        .unwrap();
        assert_eq!(default_region(Some(&cfg_path)).unwrap(), "eu-west-1");
    }

    #[test]
    fn broken_config_reported_when_region_needed() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(&cfg_path, "lms_base_url = 3").unwrap();
        let err = run_retrieve_latest_base_ami(
            Some(&cfg_path),
            None,
            Some("18.04".to_string()),
            None,
            None,
        )
        .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.starts_with("Error finding base AMI ID."), "{msg}");
        assert!(msg.contains("parse"), "{msg}");
    }

    #[test]
    fn unsupported_version_reports_context() {
        let err = run_retrieve_latest_base_ami(
            None,
            None,
            Some("12.04".to_string()),
            Some("us-east-1".to_string()),
            None,
        )
        .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.starts_with("Error finding base AMI ID."));
        assert!(msg.contains("12.04"));
    }

    #[test]
    fn write_failure_reports_context() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("ami.yml");
        let err = run_retrieve_latest_base_ami(
            None,
            Some("ami-0feed".to_string()),
            None,
            None,
            Some(&out),
        )
        .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.starts_with("Error finding base AMI ID."), "{msg}");
    }
}
