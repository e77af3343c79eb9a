//! Wings binary download and installation.
//!
//! Creates the daemon's config directory, downloads the latest published
//! binary to its fixed location, verifies it against the release checksum
//! manifest when one is available, and marks it executable. The service is
//! wired up separately in [`crate::steps::service`].

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::release;

/// Where the daemon binary is installed.
pub const BINARY_PATH: &str = "/usr/local/bin/wings";

/// The daemon's configuration directory, also the marker a later run uses
/// to detect a prior installation.
pub const CONFIG_DIR: &str = "/etc/pterodactyl";

/// Download and install the daemon binary.
pub fn download(client: &Client) -> Result<()> {
    fs::create_dir_all(CONFIG_DIR)
        .with_context(|| format!("creating {}", CONFIG_DIR))?;

    match release::fetch_latest_version(client) {
        Some(version) => println!("  Latest release: {}", version),
        None => println!("  Could not determine the latest release version, continuing"),
    }

    println!("  Downloading {}...", release::BINARY_URL);
    let binary = release::fetch_bytes(client, release::BINARY_URL)?;

    verify_checksum(client, &binary)?;

    fs::write(BINARY_PATH, &binary)
        .with_context(|| format!("writing the daemon binary to {}", BINARY_PATH))?;
    make_executable(Path::new(BINARY_PATH))?;

    println!("  Installed {} ({} bytes)", BINARY_PATH, binary.len());
    Ok(())
}

/// Check the downloaded bytes against the release checksum manifest.
///
/// A manifest that can't be fetched or doesn't list the binary is a
/// warning; a digest mismatch means a corrupt or tampered download and is
/// fatal.
fn verify_checksum(client: &Client, binary: &[u8]) -> Result<()> {
    let manifest = match release::fetch_text(client, release::CHECKSUMS_URL) {
        Ok(manifest) => manifest,
        Err(_) => {
            println!("  Warning: checksum manifest unavailable, skipping verification");
            return Ok(());
        }
    };

    let Some(expected) = release::checksum_for_asset(&manifest, release::BINARY_ASSET) else {
        println!(
            "  Warning: no checksum listed for {}, skipping verification",
            release::BINARY_ASSET
        );
        return Ok(());
    };

    let actual = sha256_hex(binary);
    if actual != expected {
        bail!(
            "checksum mismatch for the daemon binary: expected {}, got {}",
            expected,
            actual
        );
    }

    println!("  Checksum verified ({})", &actual[..16]);
    Ok(())
}

/// Hex-encoded SHA-256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Make a file executable (chmod +x).
pub fn make_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sha256_hex() {
        // sha256 of the empty input.
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_make_executable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wings");
        fs::write(&path, "#!/bin/sh\n").unwrap();

        make_executable(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
