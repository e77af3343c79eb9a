//! Preflight checks run before anything touches the host.
//!
//! Validates that the installer is running as root, that the host tools
//! every install path needs are present, and whether a previous
//! installation left its marker behind.

use anyhow::{bail, Result};
use std::path::Path;

use crate::process::command_exists;
use crate::steps::daemon::CONFIG_DIR;
use crate::steps::pkg::PackageManager;

/// Host tools required on every install path.
///
/// Each tuple is (command_name, package_name).
pub const REQUIRED_TOOLS: &[(&str, &str)] = &[
    ("uname", "coreutils"),
    ("systemctl", "systemd"),
];

/// Whether this process runs with root privileges.
pub fn is_root() -> bool {
    // Safe: geteuid has no failure mode.
    unsafe { libc::geteuid() == 0 }
}

/// Fail unless running as root; every install step writes system paths.
pub fn check_root() -> Result<()> {
    if !is_root() {
        bail!("this installer must be run as root");
    }
    Ok(())
}

/// Check that specific tools are available.
///
/// # Returns
///
/// * `Ok(())` if all tools are found
/// * `Err` with the list of missing tools and their packages
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let mut missing = Vec::new();

    for (tool, package) in tools {
        if !command_exists(tool) {
            missing.push((*tool, *package));
        }
    }

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("  {} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Missing required host tools:\n{}", msg);
    }

    Ok(())
}

/// Check the baseline tools every install path needs.
pub fn check_host_tools() -> Result<()> {
    check_required_tools(REQUIRED_TOOLS)
}

/// Check that the distro's package manager is actually on this host.
pub fn check_package_manager(pm: &PackageManager) -> Result<()> {
    check_required_tools(&[(pm.command(), "the distribution package manager")])
}

/// Whether a previous installation left its configuration directory.
///
/// Re-running the installer on a provisioned host is unsupported; the
/// caller must get an explicit operator override before continuing.
pub fn prior_install_exists() -> bool {
    Path::new(CONFIG_DIR).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_required_tools_success() {
        let tools = &[("ls", "coreutils"), ("cat", "coreutils")];
        assert!(check_required_tools(tools).is_ok());
    }

    #[test]
    fn test_check_required_tools_failure_lists_package() {
        let tools = &[("nonexistent_command_xyz", "fake-package")];
        let err = check_required_tools(tools).unwrap_err();
        assert!(err.to_string().contains("fake-package"));
    }
}
