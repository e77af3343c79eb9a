//! Host operating system detection.
//!
//! Produces a normalized `(distro, major version, architecture)` identity
//! for the machine the installer is running on. Detection falls through an
//! ordered list of sources, taking the first one that answers:
//!
//! 1. `/etc/os-release` (systemd standard)
//! 2. the `lsb_release` utility
//! 3. legacy release files (`/etc/lsb-release`, `/etc/debian_version`,
//!    `/etc/SuSe-release`, `/etc/redhat-release`)
//! 4. `uname` as a last resort

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::process::Cmd;

/// Distribution family the installer knows how to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distro {
    Ubuntu,
    Debian,
    CentOs,
    /// Anything else, carrying the normalized name for display.
    Other(String),
}

impl Distro {
    /// Normalize a distribution identifier (e.g. `ID=` from os-release).
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "ubuntu" => Distro::Ubuntu,
            "debian" => Distro::Debian,
            "centos" => Distro::CentOs,
            other => Distro::Other(other.to_string()),
        }
    }

    /// Lowercase name used in support-table lookups and messages.
    pub fn id(&self) -> &str {
        match self {
            Distro::Ubuntu => "ubuntu",
            Distro::Debian => "debian",
            Distro::CentOs => "centos",
            Distro::Other(name) => name,
        }
    }
}

/// Normalized identity of the host OS.
#[derive(Debug, Clone)]
pub struct OsIdentity {
    pub distro: Distro,
    pub major: u32,
    pub architecture: String,
}

/// Detect the host OS identity.
///
/// Fails with an error when no identification source exists at all.
pub fn detect() -> Result<OsIdentity> {
    let (distro, version) = detect_distro_and_version()
        .context("unable to identify the operating system on this machine")?;
    let major = parse_major(&version).with_context(|| {
        format!("unable to parse a major version out of '{version}'")
    })?;

    let arch = Cmd::new("uname").arg("-m").run()?.stdout.trim().to_string();

    Ok(OsIdentity {
        distro,
        major,
        architecture: arch,
    })
}

fn detect_distro_and_version() -> Option<(Distro, String)> {
    if let Ok(content) = fs::read_to_string("/etc/os-release") {
        if let Some(found) = parse_os_release(&content) {
            return Some(found);
        }
    }

    if let Some(found) = query_lsb_release() {
        return Some(found);
    }

    if let Ok(content) = fs::read_to_string("/etc/lsb-release") {
        if let Some(found) = parse_legacy_lsb(&content) {
            return Some(found);
        }
    }

    if Path::new("/etc/debian_version").exists() {
        let version = fs::read_to_string("/etc/debian_version").ok()?;
        return Some((Distro::Debian, version.trim().to_string()));
    }

    // SuSe and RedHat family release files share the "Name release N.N"
    // shape, so one parser covers both.
    for release_file in ["/etc/SuSe-release", "/etc/redhat-release"] {
        if let Ok(content) = fs::read_to_string(release_file) {
            if let Some(found) = parse_redhat_release(&content) {
                return Some(found);
            }
        }
    }

    query_uname()
}

/// Parse `ID=` and `VERSION_ID=` out of an os-release file.
pub fn parse_os_release(content: &str) -> Option<(Distro, String)> {
    let id = os_release_field(content, "ID")?;
    let version = os_release_field(content, "VERSION_ID")?;
    Some((Distro::from_id(&id), version))
}

fn os_release_field(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.strip_prefix(key)?.strip_prefix('=')?;
        Some(value.trim().trim_matches('"').to_string())
    })
}

fn query_lsb_release() -> Option<(Distro, String)> {
    let id = Cmd::new("lsb_release")
        .args(["-si"])
        .allow_fail()
        .run()
        .ok()
        .filter(|r| r.success())?
        .stdout;
    let version = Cmd::new("lsb_release")
        .args(["-sr"])
        .allow_fail()
        .run()
        .ok()
        .filter(|r| r.success())?
        .stdout;
    Some((Distro::from_id(&id), version.trim().to_string()))
}

/// Parse `DISTRIB_ID=` and `DISTRIB_RELEASE=` from a legacy lsb-release file.
pub fn parse_legacy_lsb(content: &str) -> Option<(Distro, String)> {
    let id = os_release_field(content, "DISTRIB_ID")?;
    let version = os_release_field(content, "DISTRIB_RELEASE")?;
    Some((Distro::from_id(&id), version))
}

/// Parse a redhat-release line like "CentOS Linux release 7.9.2009 (Core)".
pub fn parse_redhat_release(content: &str) -> Option<(Distro, String)> {
    let line = content.lines().next()?;
    let name = line.split_whitespace().next()?;
    let version = line
        .split_whitespace()
        .find(|token| token.chars().next().is_some_and(|c| c.is_ascii_digit()))?;
    Some((Distro::from_id(name), version.to_string()))
}

fn query_uname() -> Option<(Distro, String)> {
    let name = Cmd::new("uname").arg("-s").allow_fail().run().ok()?;
    let release = Cmd::new("uname").arg("-r").allow_fail().run().ok()?;
    if !name.success() || !release.success() {
        return None;
    }
    Some((
        Distro::from_id(name.stdout.trim()),
        release.stdout.trim().to_string(),
    ))
}

/// Extract the major version: the substring before the first `.`.
pub fn parse_major(version: &str) -> Result<u32> {
    let major = version.trim().split('.').next().unwrap_or_default();
    if major.is_empty() {
        bail!("empty version string");
    }
    major
        .parse::<u32>()
        .with_context(|| format!("non-numeric major version '{major}'"))
}
