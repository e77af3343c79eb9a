//! Firewall configuration.
//!
//! Opens the fixed port set the daemon needs. Ports 80/443 are added only
//! when TLS was selected, and this step always runs before certificate
//! acquisition so the standalone challenge can get through.

use anyhow::{bail, Result};

use crate::config::FirewallBackend;
use crate::process::Cmd;
use crate::steps::pkg::PackageManager;

/// Ports the daemon needs open: SSH control, the service API, and the
/// secondary service port.
pub const DAEMON_PORTS: &[u16] = &[22, 8443, 2096];

/// Extra ports for the HTTP-01 certificate challenge and HTTPS traffic.
pub const TLS_PORTS: &[u16] = &[80, 443];

/// The full port set for a configuration.
pub fn ports_to_open(tls_enabled: bool) -> Vec<u16> {
    let mut ports = DAEMON_PORTS.to_vec();
    if tls_enabled {
        ports.extend_from_slice(TLS_PORTS);
    }
    ports
}

/// Install and configure the selected firewall tool.
pub fn configure(
    pm: &PackageManager,
    backend: FirewallBackend,
    tls_enabled: bool,
) -> Result<()> {
    let ports = ports_to_open(tls_enabled);
    match backend {
        FirewallBackend::Ufw => configure_ufw(pm, &ports),
        FirewallBackend::Firewalld => configure_firewalld(pm, &ports),
        FirewallBackend::None => bail!("firewall step ran without a backend selected"),
    }
}

fn configure_ufw(pm: &PackageManager, ports: &[u16]) -> Result<()> {
    pm.install(&["ufw"])?;

    for port in ports {
        Cmd::new("ufw")
            .arg("allow")
            .arg(format!("{}/tcp", port))
            .error_msg("ufw allow failed")
            .run()?;
    }

    // --force skips ufw's own "may disrupt ssh" prompt; port 22 is already
    // in the allow list above.
    Cmd::new("ufw")
        .args(["--force", "enable"])
        .error_msg("enabling ufw failed")
        .run()?;

    Ok(())
}

fn configure_firewalld(pm: &PackageManager, ports: &[u16]) -> Result<()> {
    pm.install(&["firewalld"])?;

    Cmd::new("systemctl")
        .args(["enable", "--now", "firewalld"])
        .error_msg("enabling firewalld failed")
        .run()?;

    for port in ports {
        Cmd::new("firewall-cmd")
            .arg("--permanent")
            .arg(format!("--add-port={}/tcp", port))
            .error_msg("firewall-cmd --add-port failed")
            .run()?;
    }

    Cmd::new("firewall-cmd")
        .arg("--reload")
        .error_msg("firewall-cmd --reload failed")
        .run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_without_tls() {
        assert_eq!(ports_to_open(false), vec![22, 8443, 2096]);
    }

    #[test]
    fn test_ports_with_tls() {
        assert_eq!(ports_to_open(true), vec![22, 8443, 2096, 80, 443]);
    }

    #[test]
    fn test_configure_requires_backend() {
        let result = configure(&PackageManager::Apt, FirewallBackend::None, false);
        assert!(result.is_err());
    }
}
