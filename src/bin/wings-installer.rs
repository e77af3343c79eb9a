use std::io::{BufRead, Write};

use anyhow::Result;

use wings_installer::prompt::{self, Prompter};
use wings_installer::{collect, compat, preflight, probe, report, steps, Outcome};

fn main() -> Result<()> {
    match run() {
        Ok(Outcome::Completed) => Ok(()),
        Ok(Outcome::Cancelled) => {
            println!("Installation aborted. Nothing was changed.");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn run() -> Result<Outcome> {
    println!("Wings installer");
    println!();

    preflight::check_root()?;
    preflight::check_host_tools()?;

    let identity = probe::detect()?;
    println!(
        "Detected {} {} on {}",
        identity.distro.id(),
        identity.major,
        identity.architecture
    );

    let mut prompter = prompt::stdio();

    if !compat::gate(&identity, &mut prompter)? {
        return Ok(Outcome::Cancelled);
    }

    let pm = steps::pkg::PackageManager::select(&identity.distro, identity.major)?;
    preflight::check_package_manager(&pm)?;

    if !confirm_prior_install(&mut prompter)? {
        return Ok(Outcome::Cancelled);
    }

    let Some(config) = collect::collect(&identity, &mut prompter)? else {
        return Ok(Outcome::Cancelled);
    };

    steps::execute(&config)?;
    report::print_completion(&config);

    Ok(Outcome::Completed)
}

/// A provisioned host needs an explicit override before reinstalling.
fn confirm_prior_install<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<bool> {
    if !preflight::prior_install_exists() {
        return Ok(true);
    }
    prompter.say(&format!(
        "Warning: {} already exists; this machine looks provisioned.",
        steps::daemon::CONFIG_DIR
    ))?;
    prompter.say("Re-running the installer over an existing node is unsupported.")?;
    prompter.confirm("Continue anyway?", false)
}
