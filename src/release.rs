//! Upstream release lookup for the Wings daemon.
//!
//! The download URL always points at the latest published binary, so the
//! version lookup is strictly informational: any failure here degrades to
//! "version unknown" rather than aborting the install.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// GitHub latest-release endpoint for the daemon.
pub const RELEASES_URL: &str =
    "https://api.github.com/repos/pterodactyl/wings/releases/latest";

/// Version-independent download URL for the x86_64 binary.
pub const BINARY_URL: &str =
    "https://github.com/pterodactyl/wings/releases/latest/download/wings_linux_amd64";

/// Version-independent URL for the release checksum manifest.
pub const CHECKSUMS_URL: &str =
    "https://github.com/pterodactyl/wings/releases/latest/download/checksums.txt";

/// Asset name of the binary inside the checksum manifest.
pub const BINARY_ASSET: &str = "wings_linux_amd64";

/// The one field we need from the release API response.
#[derive(Debug, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

/// Build the HTTP client used for every download in the install sequence.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("wings-installer/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(120))
        .build()
        .context("building the HTTP client")
}

/// Fetch the latest release tag, best-effort.
pub fn fetch_latest_version(client: &Client) -> Option<String> {
    let release: Release = client
        .get(RELEASES_URL)
        .send()
        .ok()?
        .error_for_status()
        .ok()?
        .json()
        .ok()?;
    Some(release.tag_name)
}

/// Download a URL into memory.
pub fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("downloading {}", url))?;
    let bytes = response
        .bytes()
        .with_context(|| format!("reading the response body of {}", url))?;
    Ok(bytes.to_vec())
}

/// Download a URL as text.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("downloading {}", url))?;
    response
        .text()
        .with_context(|| format!("reading the response body of {}", url))
}

/// Find the hex digest for `asset` in a `checksums.txt` manifest.
///
/// Lines look like `<hex digest>  <asset name>`; unrelated lines are
/// ignored.
pub fn checksum_for_asset(manifest: &str, asset: &str) -> Option<String> {
    manifest.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let name = parts.next()?;
        (name == asset).then(|| digest.to_ascii_lowercase())
    })
}
