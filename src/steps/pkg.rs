//! Package-manager selection and invocation.
//!
//! The distro family decides the tool: apt for Debian/Ubuntu, dnf for
//! CentOS 8, yum for CentOS 7. apt runs with
//! `DEBIAN_FRONTEND=noninteractive` set on the child process so upgrades
//! never stop at a dpkg dialog.

use anyhow::{bail, Result};

use crate::probe::Distro;
use crate::process::Cmd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
}

impl PackageManager {
    /// Pick the package manager for a gated distro/version pair.
    pub fn select(distro: &Distro, major: u32) -> Result<PackageManager> {
        match distro {
            Distro::Ubuntu | Distro::Debian => Ok(PackageManager::Apt),
            Distro::CentOs if major >= 8 => Ok(PackageManager::Dnf),
            Distro::CentOs => Ok(PackageManager::Yum),
            Distro::Other(name) => bail!("no package manager mapping for '{}'", name),
        }
    }

    /// The binary this manager is invoked through.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
        }
    }

    /// Refresh the package index and apply pending upgrades.
    pub fn refresh(&self) -> Result<()> {
        match self {
            PackageManager::Apt => {
                self.apt(&["update"])?;
                self.apt(&["upgrade", "-y"])?;
            }
            PackageManager::Dnf => {
                Cmd::new("dnf")
                    .args(["upgrade", "-y"])
                    .error_msg("dnf upgrade failed")
                    .run_streamed()?;
            }
            PackageManager::Yum => {
                Cmd::new("yum")
                    .args(["update", "-y"])
                    .error_msg("yum update failed")
                    .run_streamed()?;
            }
        }
        Ok(())
    }

    /// Install packages by name.
    pub fn install(&self, packages: &[&str]) -> Result<()> {
        match self {
            PackageManager::Apt => {
                let mut args = vec!["install", "-y"];
                args.extend_from_slice(packages);
                self.apt(&args)?;
            }
            PackageManager::Dnf | PackageManager::Yum => {
                let mut cmd = Cmd::new(self.command()).args(["install", "-y"]);
                for package in packages {
                    cmd = cmd.arg(*package);
                }
                cmd.error_msg("package install failed").run_streamed()?;
            }
        }
        Ok(())
    }

    fn apt(&self, args: &[&str]) -> Result<()> {
        Cmd::new("apt-get")
            .args(args.iter().copied())
            .env("DEBIAN_FRONTEND", "noninteractive")
            .error_msg("apt-get failed")
            .run_streamed()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_by_family_and_version() {
        assert_eq!(
            PackageManager::select(&Distro::Ubuntu, 20).unwrap(),
            PackageManager::Apt
        );
        assert_eq!(
            PackageManager::select(&Distro::Debian, 10).unwrap(),
            PackageManager::Apt
        );
        assert_eq!(
            PackageManager::select(&Distro::CentOs, 8).unwrap(),
            PackageManager::Dnf
        );
        assert_eq!(
            PackageManager::select(&Distro::CentOs, 7).unwrap(),
            PackageManager::Yum
        );
        assert!(PackageManager::select(&Distro::Other("fedora".into()), 33).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(PackageManager::Apt.command(), "apt-get");
        assert_eq!(PackageManager::Dnf.command(), "dnf");
        assert_eq!(PackageManager::Yum.command(), "yum");
    }
}
