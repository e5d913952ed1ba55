//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here have no side effects beyond printing.

use console::style;
use std::collections::BTreeMap;

use crate::domain::StepLocation;
use crate::git::Revision;
use crate::runner::RunReport;
use crate::warning::DeployWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a deploy warning to the user.
pub fn display_warning(warning: &DeployWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Formats the progress line for one step, e.g. `[3/10] remote  Build executable`.
pub fn format_step(index: usize, total: usize, location: StepLocation, description: &str) -> String {
    format!("[{}/{}] {:<6} {}", index, total, location.name(), description)
}

/// Display the step about to run and its rendered command.
pub fn display_step(
    index: usize,
    total: usize,
    location: StepLocation,
    description: &str,
    command: &str,
) {
    println!(
        "{} {}",
        style("→").yellow(),
        style(format_step(index, total, location, description)).bold()
    );
    println!("    {}", style(command).cyan());
}

/// Display the role-to-host mapping.
///
/// # Arguments
/// * `roles` - Role names and their hosts
pub fn display_roles(roles: &BTreeMap<String, Vec<String>>) {
    println!("{}", style("Configured roles:").bold());
    for (role, hosts) in roles {
        println!("  - {}: {}", role, hosts.join(", "));
    }
}

/// Display the outcome of a finished deploy.
///
/// # Arguments
/// * `role` - Role that was deployed
/// * `branch` - Branch name that was archived
/// * `revision` - Commit the branch resolved to, if known
/// * `reports` - One report per host
/// * `dry_run` - Whether commands were only printed
pub fn display_summary(
    role: &str,
    branch: &str,
    revision: Option<&Revision>,
    reports: &[RunReport],
    dry_run: bool,
) {
    let what = match revision {
        Some(rev) => format!("{} ({} {})", branch, rev.short_hash(), rev.summary),
        None => branch.to_string(),
    };
    let hosts: Vec<&str> = reports.iter().map(|r| r.host.as_str()).collect();

    if dry_run {
        println!(
            "\n{} Dry run: would deploy {} to {} [{}]\n",
            style("→").yellow(),
            what,
            role,
            hosts.join(", ")
        );
    } else {
        println!(
            "\n{} Deployed {} to {} [{}]\n",
            style("✓").green(),
            what,
            role,
            hosts.join(", ")
        );
    }
}
