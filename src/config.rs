//! Installation configuration.
//!
//! Built once by the interactive collector, validated, then handed to the
//! orchestrator read-only.

use anyhow::{bail, Result};

use crate::probe::Distro;

/// Firewall tool to configure, selected by distro family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirewallBackend {
    None,
    Ufw,
    Firewalld,
}

impl FirewallBackend {
    /// The tool this distro family uses, or `None` when the installer has
    /// no firewall support for it.
    pub fn for_distro(distro: &Distro) -> Option<FirewallBackend> {
        match distro {
            Distro::Ubuntu | Distro::Debian => Some(FirewallBackend::Ufw),
            Distro::CentOs => Some(FirewallBackend::Firewalld),
            Distro::Other(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FirewallBackend::None => "none",
            FirewallBackend::Ufw => "ufw",
            FirewallBackend::Firewalld => "firewalld",
        }
    }
}

/// TLS certificate parameters. Both fields are non-empty by construction.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Fully-qualified domain name the certificate is issued for.
    pub hostname: String,
    /// Contact address for certificate issuance.
    pub email: String,
}

/// Everything the install orchestrator needs, collected up front.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub distro: Distro,
    pub distro_major: u32,
    pub architecture: String,
    pub install_database: bool,
    pub firewall: FirewallBackend,
    pub tls: Option<TlsConfig>,
}

impl InstallConfig {
    /// Check the cross-field invariants before orchestration begins.
    pub fn validate(&self) -> Result<()> {
        match (&self.firewall, &self.distro) {
            (FirewallBackend::Ufw, Distro::Ubuntu | Distro::Debian) => {}
            (FirewallBackend::Firewalld, Distro::CentOs) => {}
            (FirewallBackend::None, _) => {}
            (backend, distro) => bail!(
                "firewall backend '{}' does not match distro '{}'",
                backend.name(),
                distro.id()
            ),
        }

        if let Some(tls) = &self.tls {
            if tls.hostname.is_empty() || tls.email.is_empty() {
                bail!("TLS selected but hostname or email is empty");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_backend_selection_by_family() {
        assert_eq!(
            FirewallBackend::for_distro(&Distro::Ubuntu),
            Some(FirewallBackend::Ufw)
        );
        assert_eq!(
            FirewallBackend::for_distro(&Distro::Debian),
            Some(FirewallBackend::Ufw)
        );
        assert_eq!(
            FirewallBackend::for_distro(&Distro::CentOs),
            Some(FirewallBackend::Firewalld)
        );
        assert_eq!(
            FirewallBackend::for_distro(&Distro::Other("fedora".into())),
            None
        );
    }

    #[test]
    fn test_validate_rejects_ufw_on_centos() {
        let mut config = base_config();
        config.distro = Distro::CentOs;
        config.firewall = FirewallBackend::Ufw;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_firewalld_on_debian_family() {
        let mut config = base_config();
        config.firewall = FirewallBackend::Firewalld;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_matching_backend() {
        let mut config = base_config();
        config.firewall = FirewallBackend::Ufw;
        config.validate().unwrap();

        config.distro = Distro::CentOs;
        config.firewall = FirewallBackend::Firewalld;
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_tls_fields() {
        let mut config = base_config();
        config.tls = Some(TlsConfig {
            hostname: "node.example.com".to_string(),
            email: String::new(),
        });
        assert!(config.validate().is_err());
    }
}
