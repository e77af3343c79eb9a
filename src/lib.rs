//! Provisioning library for the Pterodactyl Wings daemon.
//!
//! Turns a bare supported Linux host into a Wings node: validates the
//! machine, collects the optional features interactively, then runs the
//! install sequence against the system package manager, systemd, and the
//! upstream release artifacts.
//!
//! # Pipeline
//!
//! ```text
//! preflight (root, host tools, prior install)
//!     │
//! probe ──► compat gate ──► collect ──► steps::execute ──► report
//! (os identity)  (support     (install     (ordered install
//!                 matrix,      config)      sequence)
//!                 virt denylist)
//! ```
//!
//! The pipeline runs once per invocation, strictly in order, and the
//! `InstallConfig` built by `collect` is the only state carried across it.

pub mod collect;
pub mod compat;
pub mod config;
pub mod preflight;
pub mod probe;
pub mod process;
pub mod prompt;
pub mod release;
pub mod report;
pub mod steps;

pub use config::{FirewallBackend, InstallConfig, TlsConfig};
pub use probe::{Distro, OsIdentity};

/// How a full installer run ended, when it didn't fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All enabled steps ran.
    Completed,
    /// The operator declined one of the confirmations; nothing to undo.
    Cancelled,
}
