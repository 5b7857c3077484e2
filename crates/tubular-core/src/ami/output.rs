//! YAML document describing the chosen base AMI.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Flat, key-sorted mapping of `ami_id`, `base_ami_id` and descriptive tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AmiInfo(BTreeMap<String, String>);

impl AmiInfo {
    pub fn new(ami_id: &str) -> Self {
        let mut fields = BTreeMap::new();
        // Ansible reads `base_ami_id`; release pages read `ami_id`.
        fields.insert("base_ami_id".to_string(), ami_id.to_string());
        fields.insert("ami_id".to_string(), ami_id.to_string());
        Self(fields)
    }

    /// Adds tags; the id keys are never overwritten.
    pub fn with_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in tags {
            self.0.entry(k).or_insert(v);
        }
        self
    }

    pub fn ami_id(&self) -> &str {
        self.get("ami_id").unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// YAML with an explicit `---` document start.
    pub fn to_yaml(&self) -> Result<String> {
        let body = serde_yaml::to_string(&self.0).context("serialize AMI info")?;
        Ok(format!("---\n{}", body))
    }

    pub fn write_yaml(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).with_context(|| format!("write {}", path.display()))
    }
}
