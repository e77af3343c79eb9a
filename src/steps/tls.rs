//! TLS certificate acquisition via certbot's standalone challenge.
//!
//! The standalone authenticator binds ports 80/443 itself, so any web
//! server already listening on them is stopped for the duration of the
//! handshake and started again afterwards. Failures here are reported by
//! the orchestrator as warnings, never as a failed install.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::config::TlsConfig;
use crate::process::Cmd;
use crate::steps::pkg::PackageManager;

/// Web servers that may be holding port 80.
const WEB_SERVER_UNITS: &[&str] = &["nginx", "apache2", "httpd"];

/// The directory certbot creates for an issued certificate.
pub fn live_certificate_dir(hostname: &str) -> PathBuf {
    Path::new("/etc/letsencrypt/live").join(hostname)
}

/// Install certbot and request a certificate for the configured hostname.
pub fn obtain(pm: &PackageManager, tls: &TlsConfig) -> Result<()> {
    pm.install(&["certbot"])?;

    let stopped = stop_web_servers()?;

    let issue_result = Cmd::new("certbot")
        .args([
            "certonly",
            "--standalone",
            "--non-interactive",
            "--agree-tos",
            "--no-eff-email",
        ])
        .arg("--email")
        .arg(tls.email.as_str())
        .arg("-d")
        .arg(tls.hostname.as_str())
        .allow_fail()
        .run_streamed();

    // Bring the web servers back regardless of how certbot fared.
    for unit in &stopped {
        let _ = Cmd::new("systemctl")
            .args(["start", *unit])
            .allow_fail()
            .run();
    }

    let issued = issue_result?.success();
    let cert_path = live_certificate_dir(&tls.hostname).join("fullchain.pem");

    if !issued {
        bail!("certbot exited with a failure status");
    }
    if !cert_path.exists() {
        bail!(
            "certbot reported success but {} does not exist",
            cert_path.display()
        );
    }

    println!("  Certificate installed at {}", cert_path.display());
    Ok(())
}

/// Stop every active web server unit, returning the ones that were running.
fn stop_web_servers() -> Result<Vec<&'static str>> {
    let mut stopped = Vec::new();
    for &unit in WEB_SERVER_UNITS {
        let active = Cmd::new("systemctl")
            .args(["is-active", "--quiet", unit])
            .allow_fail()
            .run()?;
        if active.success() {
            println!("  Stopping {} for the standalone challenge", unit);
            Cmd::new("systemctl")
                .args(["stop", unit])
                .error_msg("stopping the web server failed")
                .run()?;
            stopped.push(unit);
        }
    }
    Ok(stopped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_certificate_dir() {
        assert_eq!(
            live_certificate_dir("node.example.com"),
            PathBuf::from("/etc/letsencrypt/live/node.example.com")
        );
    }
}
