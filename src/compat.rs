//! Host compatibility gate.
//!
//! Checks the probed OS identity against the support matrix and the
//! virtualization denylist before anything is installed. Unsupported
//! distro/version and container-based virtualization are fatal; a
//! non-x86_64 machine or an unexpected hypervisor only needs the operator
//! to confirm.

use anyhow::{bail, Result};
use std::io::{BufRead, Write};

use crate::probe::{Distro, OsIdentity};
use crate::process::Cmd;
use crate::prompt::Prompter;

/// Supported distribution major versions. Anything not listed is rejected.
pub const SUPPORTED_VERSIONS: &[(&str, &[u32])] = &[
    ("ubuntu", &[18, 20]),
    ("debian", &[9, 10]),
    ("centos", &[7, 8]),
];

/// Virtualization types Docker cannot run inside.
///
/// Container-based virtualization shares the host kernel and lacks the
/// features the container runtime needs.
pub const DENIED_VIRT_TYPES: &[&str] = &["openvz", "lxc"];

/// Whether a (distro, major version) pair is in the support table.
pub fn is_supported(distro: &Distro, major: u32) -> bool {
    SUPPORTED_VERSIONS
        .iter()
        .any(|(id, versions)| *id == distro.id() && versions.contains(&major))
}

/// Whether a virtualization type reported by the host is denylisted.
pub fn is_denied_virtualization(virt: &str) -> bool {
    DENIED_VIRT_TYPES.contains(&virt.trim().to_ascii_lowercase().as_str())
}

/// Ask the host what hypervisor it runs under, if any.
///
/// Returns `None` on bare metal (or when detection is unavailable).
pub fn detect_virtualization() -> Option<String> {
    let result = Cmd::new("systemd-detect-virt").allow_fail().run().ok()?;
    let virt = result.stdout.trim().to_ascii_lowercase();
    if virt.is_empty() || virt == "none" {
        None
    } else {
        Some(virt)
    }
}

/// Run the full gate. Returns `Ok(false)` when the operator declined one of
/// the advisory confirmations.
pub fn gate<R: BufRead, W: Write>(
    identity: &OsIdentity,
    prompt: &mut Prompter<R, W>,
) -> Result<bool> {
    if !is_supported(&identity.distro, identity.major) {
        bail!(
            "Unsupported OS: {} {} is not in the support table",
            identity.distro.id(),
            identity.major
        );
    }

    if identity.architecture != "x86_64" {
        prompt.say(&format!(
            "Warning: detected architecture '{}'; only x86_64 builds of the daemon are published.",
            identity.architecture
        ))?;
        if !prompt.confirm("Continue on this architecture anyway?", false)? {
            return Ok(false);
        }
    }

    if let Some(virt) = detect_virtualization() {
        check_virtualization(&virt, prompt)?;
        if !prompt.confirm("Continue inside this virtual machine?", false)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Fail on a denylisted virtualization type, warn on everything else.
pub fn check_virtualization<R: BufRead, W: Write>(
    virt: &str,
    prompt: &mut Prompter<R, W>,
) -> Result<()> {
    if is_denied_virtualization(virt) {
        bail!(
            "Unsupported virtualization: {} lacks the kernel features Docker needs",
            virt
        );
    }
    prompt.say(&format!(
        "Notice: running under '{}' virtualization. Installation is possible but unsupported.",
        virt
    ))?;
    Ok(())
}
