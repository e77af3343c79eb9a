//! Completion report printed after a successful install.

use crate::config::{FirewallBackend, InstallConfig};
use crate::steps::daemon::{BINARY_PATH, CONFIG_DIR};
use crate::steps::firewall;

/// Print the follow-up instructions for the operator.
pub fn print_completion(config: &InstallConfig) {
    println!();
    println!("==============================================");
    println!(" Wings installed successfully");
    println!("==============================================");
    println!();
    println!("What was set up:");
    println!("  - Docker (enabled at boot)");
    println!("  - daemon binary at {}", BINARY_PATH);
    println!("  - wings.service (enabled, NOT started)");
    if config.firewall != FirewallBackend::None {
        let ports = firewall::ports_to_open(config.tls.is_some())
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  - {} with ports {} open", config.firewall.name(), ports);
    }
    if config.install_database {
        println!("  - MariaDB (enabled and running)");
    }
    if let Some(tls) = &config.tls {
        println!("  - TLS certificate for {}", tls.hostname);
    }
    println!();
    println!("Next steps:");
    println!("  1. Create the node in your Panel and copy its configuration");
    println!("     into {}/config.yml", CONFIG_DIR);
    println!("  2. Start the daemon and watch it come up:");
    println!("       systemctl start wings");
    println!("       systemctl status wings");
    println!();
}
