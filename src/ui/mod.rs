//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_roles, display_status, display_step, display_success,
    display_summary, display_warning, format_step,
};

/// Prompts user for yes/no confirmation.
///
/// # Arguments
/// * `prompt` - The prompt message to display (without the "(y/N): " suffix)
///
/// # Returns
/// * `Ok(true)` - If user entered "y" or "yes"
/// * `Ok(false)` - Otherwise (including Enter, or "n"/"no")
/// * `Err` - If input error occurs
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}

/// Asks before touching the hosts of a role.
///
/// # Arguments
/// * `role` - Role about to be deployed
/// * `hosts` - Hosts the role maps to
/// * `branch` - Branch that will be archived
pub fn confirm_deploy(role: &str, hosts: &[String], branch: &str) -> Result<bool> {
    confirm_action(&format!(
        "Deploy branch '{}' to {} [{}]?",
        branch,
        role,
        hosts.join(", ")
    ))
}

fn is_affirmative(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}
