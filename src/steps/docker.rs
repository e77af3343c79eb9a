//! Docker installation.
//!
//! The daemon runs every game server in a container, so Docker is the one
//! unconditional dependency. Installation goes through the upstream
//! convenience script, which handles repository setup for every distro
//! family the gate admits.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::fs;

use crate::process::{command_exists, Cmd};
use crate::release;

/// Upstream convenience installer script.
pub const INSTALL_SCRIPT_URL: &str = "https://get.docker.com";

/// Install Docker (if missing) and enable it at boot.
pub fn install(client: &Client) -> Result<()> {
    if command_exists("docker") {
        println!("  Docker is already installed, skipping the installer script");
    } else {
        run_install_script(client)?;
    }

    Cmd::new("systemctl")
        .args(["enable", "--now", "docker"])
        .error_msg("enabling the Docker service failed")
        .run()?;

    Ok(())
}

fn run_install_script(client: &Client) -> Result<()> {
    let script = release::fetch_text(client, INSTALL_SCRIPT_URL)
        .context("fetching the Docker install script")?;

    let script_path = std::env::temp_dir().join("get-docker.sh");
    fs::write(&script_path, script).with_context(|| {
        format!("writing the Docker install script to {}", script_path.display())
    })?;

    let result = Cmd::new("sh")
        .arg_path(&script_path)
        .env("CHANNEL", "stable")
        .error_msg("the Docker install script failed")
        .run_streamed();

    let _ = fs::remove_file(&script_path);
    result?;

    Ok(())
}
