//! Ubuntu cloud-images locator: `released.current.txt` fetch and row parsing.
//!
//! Each row is tab separated:
//! `suite  build  label  serial  root_store  arch  region  ami  [aki  ari]  virt`.

use anyhow::{Context, Result};

use crate::rest::{perform, Method};

pub const LOCATOR_BASE_URL: &str = "http://cloud-images.ubuntu.com/query";

/// Ubuntu suite name for a supported release number.
pub fn suite_for_version(ubuntu_version: &str) -> Option<&'static str> {
    match ubuntu_version.trim() {
        "16.04" => Some("xenial"),
        "18.04" => Some("bionic"),
        _ => None,
    }
}

pub fn locator_url(base_url: &str, suite: &str) -> String {
    format!(
        "{}/{}/server/released.current.txt",
        base_url.trim_end_matches('/'),
        suite
    )
}

/// One published image from the locator listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorImage {
    pub suite: String,
    pub serial: String,
    pub root_store: String,
    pub arch: String,
    pub region: String,
    pub ami_id: String,
    pub virtualization: String,
}

impl LocatorImage {
    /// Descriptive tags written next to the AMI id.
    ///
    /// These come from the locator row itself, not from the image's EC2 tags:
    /// nothing here talks to the EC2 API.
    pub fn tags(&self) -> Vec<(String, String)> {
        vec![
            ("ubuntu_suite".to_string(), self.suite.clone()),
            ("ubuntu_serial".to_string(), self.serial.clone()),
            ("root_store".to_string(), self.root_store.clone()),
            ("arch".to_string(), self.arch.clone()),
        ]
    }
}

/// Parses one listing row; `None` for blank or malformed rows.
pub fn parse_row(line: &str) -> Option<LocatorImage> {
    let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
    if cols.len() < 9 {
        return None;
    }
    let ami_id = cols[7];
    if !ami_id.starts_with("ami-") {
        return None;
    }
    let virtualization = cols[8..].iter().rev().find(|c| !c.is_empty())?;
    Some(LocatorImage {
        suite: cols[0].to_string(),
        serial: cols[3].to_string(),
        root_store: cols[4].to_string(),
        arch: cols[5].to_string(),
        region: cols[6].to_string(),
        ami_id: ami_id.to_string(),
        virtualization: virtualization.to_string(),
    })
}

/// First HVM image published for `region`, in listing order.
pub fn find_hvm_image(listing: &str, region: &str) -> Option<LocatorImage> {
    listing
        .lines()
        .filter_map(parse_row)
        .find(|img| img.region == region && img.virtualization == "hvm")
}

/// Downloads the listing at `url`.
pub fn fetch_listing(url: &str) -> Result<String> {
    let response = perform(Method::Get, url, &[], None)
        .with_context(|| format!("GET {}", url))?;
    if !response.is_success() {
        anyhow::bail!("GET {} returned HTTP {}", url, response.status);
    }
    String::from_utf8(response.body).context("locator listing is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
bionic\tserver\trelease\t20230607\tebs-ssd\tamd64\tap-south-1\tami-0aaaaaaaaaaaaaaa1\t\thvm
bionic\tserver\trelease\t20230607\tinstance-store\tamd64\tus-east-1\tami-0bbbbbbbbbbbbbbb2\t\tparavirtual
bionic\tserver\trelease\t20230607\tebs-ssd\tamd64\tus-east-1\tami-0ccccccccccccccc3\t\thvm
bionic\tserver\trelease\t20230607\tebs-ssd\tarm64\tus-east-1\tami-0ddddddddddddddd4\t\thvm
";

    #[test]
    fn suites() {
        assert_eq!(suite_for_version("16.04"), Some("xenial"));
        assert_eq!(suite_for_version("18.04"), Some("bionic"));
        assert_eq!(suite_for_version("20.04"), None);
    }

    #[test]
    fn locator_url_shape() {
        assert_eq!(
            locator_url(LOCATOR_BASE_URL, "xenial"),
            "http://cloud-images.ubuntu.com/query/xenial/server/released.current.txt"
        );
    }

    #[test]
    fn first_hvm_row_for_region_wins() {
        let img = find_hvm_image(LISTING, "us-east-1").unwrap();
        assert_eq!(img.ami_id, "ami-0ccccccccccccccc3");
        assert_eq!(img.arch, "amd64");
        assert_eq!(img.root_store, "ebs-ssd");
    }

    #[test]
    fn missing_region() {
        assert!(find_hvm_image(LISTING, "eu-west-3").is_none());
    }

    #[test]
    fn rows_with_kernel_columns() {
        let row = "xenial\tserver\trelease\t20180126\tebs\tamd64\tus-west-2\tami-0123\taki-1\tari-2\thvm";
        let img = parse_row(row).unwrap();
        assert_eq!(img.ami_id, "ami-0123");
        assert_eq!(img.virtualization, "hvm");
        assert_eq!(img.suite, "xenial");
        assert_eq!(img.serial, "20180126");
    }

    #[test]
    fn malformed_rows_skipped() {
        assert!(parse_row("").is_none());
        assert!(parse_row("bionic\tserver").is_none());
        assert!(parse_row("a\tb\tc\td\te\tf\tus-east-1\tnot-an-ami\thvm").is_none());
    }
}
