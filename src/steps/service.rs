//! systemd unit installation.
//!
//! Fetches the unit file from the companion installer repository, installs
//! it, and enables the service at boot. The daemon is deliberately not
//! started: it has no configuration yet, and the operator is expected to
//! start it by hand after registering the node with the Panel.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::fs;

use crate::process::Cmd;
use crate::release;

/// Where the unit file is installed.
pub const UNIT_PATH: &str = "/etc/systemd/system/wings.service";

/// Unit file published by the companion installer repository.
pub const UNIT_URL: &str =
    "https://raw.githubusercontent.com/pterodactyl-installer/pterodactyl-installer/master/configs/wings.service";

/// Install the unit and enable the service at boot.
pub fn install(client: &Client) -> Result<()> {
    let unit = release::fetch_text(client, UNIT_URL)
        .context("fetching the wings systemd unit")?;

    fs::write(UNIT_PATH, unit)
        .with_context(|| format!("writing the unit file to {}", UNIT_PATH))?;

    Cmd::new("systemctl")
        .arg("daemon-reload")
        .error_msg("systemctl daemon-reload failed")
        .run()?;

    Cmd::new("systemctl")
        .args(["enable", "wings"])
        .error_msg("enabling the wings service failed")
        .run()?;

    println!("  Enabled wings.service (not started)");
    Ok(())
}
