//! Interactive option collection.
//!
//! Walks the operator through the optional features and builds the
//! [`InstallConfig`]. The last thing it does is show a summary and ask for
//! a final go/no-go; declining is a cancellation, not an error.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::config::{FirewallBackend, InstallConfig, TlsConfig};
use crate::probe::OsIdentity;
use crate::prompt::Prompter;
use crate::steps::tls;

/// Collect all options. Returns `None` when the operator declined the
/// final confirmation.
pub fn collect<R: BufRead, W: Write>(
    identity: &OsIdentity,
    prompt: &mut Prompter<R, W>,
) -> Result<Option<InstallConfig>> {
    let install_database =
        prompt.confirm("Install MariaDB on this machine for game-server databases?", false)?;

    let firewall = match FirewallBackend::for_distro(&identity.distro) {
        Some(backend) => {
            let wanted = prompt.confirm(
                &format!("Configure {} and open the daemon ports?", backend.name()),
                false,
            )?;
            if wanted {
                backend
            } else {
                FirewallBackend::None
            }
        }
        None => FirewallBackend::None,
    };

    let tls = if prompt.confirm("Configure HTTPS with Let's Encrypt?", false)? {
        Some(collect_tls(prompt, |hostname| {
            tls::live_certificate_dir(hostname).exists()
        })?)
    } else {
        None
    };

    let config = InstallConfig {
        distro: identity.distro.clone(),
        distro_major: identity.major,
        architecture: identity.architecture.clone(),
        install_database,
        firewall,
        tls,
    };
    config.validate()?;

    print_summary(&config, prompt)?;
    if !prompt.confirm("Proceed with the installation?", false)? {
        return Ok(None);
    }

    Ok(Some(config))
}

/// Ask for the certificate hostname and contact email.
///
/// The hostname loop keeps re-prompting until the answer is non-empty and
/// either has no existing certificate or the operator explicitly confirms
/// reissuing over it.
pub fn collect_tls<R: BufRead, W: Write>(
    prompt: &mut Prompter<R, W>,
    cert_exists: impl Fn(&str) -> bool,
) -> Result<TlsConfig> {
    let hostname = loop {
        let candidate = prompt.read_nonempty("FQDN of this node (e.g. node.example.com)")?;
        if !cert_exists(&candidate) {
            break candidate;
        }
        prompt.say(&format!(
            "A certificate for '{}' already exists on this machine.",
            candidate
        ))?;
        if prompt.confirm("Request a new certificate for it anyway?", false)? {
            break candidate;
        }
    };

    let email = prompt.read_nonempty("Email address for certificate issuance")?;

    Ok(TlsConfig { hostname, email })
}

fn print_summary<R: BufRead, W: Write>(
    config: &InstallConfig,
    prompt: &mut Prompter<R, W>,
) -> Result<()> {
    prompt.say("")?;
    prompt.say("The installer will now:")?;
    prompt.say(&format!(
        "  - refresh packages on {} {}",
        config.distro.id(),
        config.distro_major
    ))?;
    if config.firewall != FirewallBackend::None {
        prompt.say(&format!("  - configure {}", config.firewall.name()))?;
    }
    prompt.say("  - install Docker and the Wings daemon")?;
    if config.install_database {
        prompt.say("  - install MariaDB")?;
    }
    match &config.tls {
        Some(tls) => prompt.say(&format!(
            "  - request a Let's Encrypt certificate for {}",
            tls.hostname
        ))?,
        None => prompt.say("  - skip TLS (configure certificates yourself later)")?,
    }
    prompt.say("")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Distro;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn ubuntu() -> OsIdentity {
        OsIdentity {
            distro: Distro::Ubuntu,
            major: 20,
            architecture: "x86_64".to_string(),
        }
    }

    #[test]
    fn test_defaults_produce_minimal_config() {
        // db? no, firewall? no, tls? no, proceed? yes
        let mut p = prompter("n\nn\nn\ny\n");
        let config = collect(&ubuntu(), &mut p).unwrap().unwrap();
        assert!(!config.install_database);
        assert_eq!(config.firewall, FirewallBackend::None);
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_final_rejection_is_cancellation() {
        let mut p = prompter("n\nn\nn\nn\n");
        assert!(collect(&ubuntu(), &mut p).unwrap().is_none());
    }

    #[test]
    fn test_firewall_follows_distro_family() {
        let mut p = prompter("n\ny\nn\ny\n");
        let config = collect(&ubuntu(), &mut p).unwrap().unwrap();
        assert_eq!(config.firewall, FirewallBackend::Ufw);

        let centos = OsIdentity {
            distro: Distro::CentOs,
            major: 8,
            architecture: "x86_64".to_string(),
        };
        let mut p = prompter("n\ny\nn\ny\n");
        let config = collect(&centos, &mut p).unwrap().unwrap();
        assert_eq!(config.firewall, FirewallBackend::Firewalld);
    }

    #[test]
    fn test_no_firewall_offered_for_unknown_distro() {
        let other = OsIdentity {
            distro: Distro::Other("fedora".to_string()),
            major: 33,
            architecture: "x86_64".to_string(),
        };
        // db? no, tls? no, proceed? yes -- no firewall question at all
        let mut p = prompter("n\nn\ny\n");
        let config = collect(&other, &mut p).unwrap().unwrap();
        assert_eq!(config.firewall, FirewallBackend::None);
    }

    #[test]
    fn test_tls_loop_rejects_provisioned_hostname() {
        // First hostname already has a certificate and the operator declines
        // reissuing; the loop must come back around to a fresh name.
        let mut p = prompter("old.example.com\nn\nnew.example.com\nadmin@example.com\n");
        let tls = collect_tls(&mut p, |host| host == "old.example.com").unwrap();
        assert_eq!(tls.hostname, "new.example.com");
        assert_eq!(tls.email, "admin@example.com");
    }

    #[test]
    fn test_tls_loop_allows_explicit_reissue() {
        let mut p = prompter("old.example.com\ny\nadmin@example.com\n");
        let tls = collect_tls(&mut p, |_| true).unwrap();
        assert_eq!(tls.hostname, "old.example.com");
    }

    #[test]
    fn test_tls_empty_email_reprompts() {
        let mut p = prompter("node.example.com\n\nadmin@example.com\n");
        let tls = collect_tls(&mut p, |_| false).unwrap();
        assert_eq!(tls.email, "admin@example.com");
    }
}
