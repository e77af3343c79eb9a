//! Optional MariaDB server installation.
//!
//! Game servers frequently want a local database; the Panel manages the
//! schemas itself, so all this step does is install the server and enable
//! it at boot.

use anyhow::Result;

use crate::process::Cmd;
use crate::steps::pkg::PackageManager;

pub fn install(pm: &PackageManager) -> Result<()> {
    pm.install(&["mariadb-server"])?;

    Cmd::new("systemctl")
        .args(["enable", "--now", "mariadb"])
        .error_msg("enabling the MariaDB service failed")
        .run()?;

    Ok(())
}
