//! The install sequence.
//!
//! `plan` computes the ordered list of steps a configuration enables;
//! `execute` runs them. The split keeps the sequencing policy testable
//! without touching the host.
//!
//! Ordering constraints baked into the sequence:
//! - the firewall runs before certificate acquisition so the standalone
//!   challenge can reach ports 80/443;
//! - the unit install follows the binary download;
//! - certificate acquisition comes last and is the only soft-failing step.

pub mod daemon;
pub mod database;
pub mod docker;
pub mod firewall;
pub mod pkg;
pub mod service;
pub mod tls;

use anyhow::Result;

use crate::config::{FirewallBackend, InstallConfig};
use crate::release;
use crate::steps::pkg::PackageManager;

/// One step of the install sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RefreshPackages,
    ConfigureFirewall,
    InstallDocker,
    DownloadDaemon,
    InstallUnit,
    InstallDatabase,
    ObtainCertificate,
}

impl Step {
    pub fn title(&self) -> &'static str {
        match self {
            Step::RefreshPackages => "refreshing system packages",
            Step::ConfigureFirewall => "configuring the firewall",
            Step::InstallDocker => "installing Docker",
            Step::DownloadDaemon => "downloading the Wings binary",
            Step::InstallUnit => "installing the systemd unit",
            Step::InstallDatabase => "installing MariaDB",
            Step::ObtainCertificate => "requesting a TLS certificate",
        }
    }
}

/// The ordered steps this configuration enables.
pub fn plan(config: &InstallConfig) -> Vec<Step> {
    let mut steps = vec![Step::RefreshPackages];
    if config.firewall != FirewallBackend::None {
        steps.push(Step::ConfigureFirewall);
    }
    steps.push(Step::InstallDocker);
    steps.push(Step::DownloadDaemon);
    steps.push(Step::InstallUnit);
    if config.install_database {
        steps.push(Step::InstallDatabase);
    }
    if config.tls.is_some() {
        steps.push(Step::ObtainCertificate);
    }
    steps
}

/// Run the install sequence for `config`.
///
/// Every step failure aborts the remainder, except certificate acquisition:
/// by that point the daemon install has already succeeded, so a certbot
/// failure is reported as a warning and the process still exits cleanly.
pub fn execute(config: &InstallConfig) -> Result<()> {
    config.validate()?;

    let pm = PackageManager::select(&config.distro, config.distro_major)?;
    let client = release::http_client()?;

    for step in plan(config) {
        println!("[install] {}...", step.title());
        match step {
            Step::RefreshPackages => pm.refresh()?,
            Step::ConfigureFirewall => {
                firewall::configure(&pm, config.firewall, config.tls.is_some())?
            }
            Step::InstallDocker => docker::install(&client)?,
            Step::DownloadDaemon => daemon::download(&client)?,
            Step::InstallUnit => service::install(&client)?,
            Step::InstallDatabase => database::install(&pm)?,
            Step::ObtainCertificate => {
                if let Some(tls) = &config.tls {
                    if let Err(err) = tls::obtain(&pm, tls) {
                        println!(
                            "[install] warning: certificate request for {} failed: {:#}",
                            tls.hostname, err
                        );
                        println!(
                            "[install] the daemon is installed; obtain a certificate manually later"
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;
    use crate::probe::Distro;

    fn base_config() -> InstallConfig {
        InstallConfig {
            distro: Distro::Ubuntu,
            distro_major: 20,
            architecture: "x86_64".to_string(),
            install_database: false,
            firewall: FirewallBackend::None,
            tls: None,
        }
    }

    #[test]
    fn test_minimal_plan() {
        // No options selected: exactly refresh, docker, binary, unit.
        assert_eq!(
            plan(&base_config()),
            vec![
                Step::RefreshPackages,
                Step::InstallDocker,
                Step::DownloadDaemon,
                Step::InstallUnit,
            ]
        );
    }

    #[test]
    fn test_full_plan_ordering() {
        let mut config = base_config();
        config.install_database = true;
        config.firewall = FirewallBackend::Ufw;
        config.tls = Some(TlsConfig {
            hostname: "node.example.com".to_string(),
            email: "admin@example.com".to_string(),
        });

        let steps = plan(&config);
        assert_eq!(
            steps,
            vec![
                Step::RefreshPackages,
                Step::ConfigureFirewall,
                Step::InstallDocker,
                Step::DownloadDaemon,
                Step::InstallUnit,
                Step::InstallDatabase,
                Step::ObtainCertificate,
            ]
        );

        // The firewall must be open before the certificate challenge runs.
        let firewall_at = steps
            .iter()
            .position(|s| *s == Step::ConfigureFirewall)
            .unwrap();
        let tls_at = steps
            .iter()
            .position(|s| *s == Step::ObtainCertificate)
            .unwrap();
        assert!(firewall_at < tls_at);
    }

    #[test]
    fn test_database_without_firewall() {
        let mut config = base_config();
        config.install_database = true;
        let steps = plan(&config);
        assert!(steps.contains(&Step::InstallDatabase));
        assert!(!steps.contains(&Step::ConfigureFirewall));
        assert!(!steps.contains(&Step::ObtainCertificate));
    }
}
