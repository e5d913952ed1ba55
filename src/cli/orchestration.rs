//! Main workflow orchestration logic
//!
//! Sits between CLI argument parsing and the [Deployer]: picks the role,
//! gathers warnings, asks for confirmation and runs the deploy. Taking the
//! runner, source repository and prompt as parameters lets the workflow be
//! driven programmatically without clap, ssh or a terminal.

use anyhow::{Context, Result};

use crate::config::DeployConfig;
use crate::deploy::Deployer;
use crate::domain::Role;
use crate::exec::CommandRunner;
use crate::git::{Revision, SourceRepository};
use crate::runner::RunReport;
use crate::ui;
use crate::warning::DeployWarning;

/// Arguments for the deploy workflow
///
/// Mirrors the CLI Args in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployWorkflowArgs {
    /// Requested roles; only the first is deployed
    pub roles: Vec<String>,

    /// Branch to archive and build
    pub branch_name: String,

    /// Skip the confirmation prompt
    pub force: bool,

    /// Print commands without running them
    pub dry_run: bool,
}

/// Result of a finished deploy workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub role: Role,
    pub branch: String,
    /// Commit the branch resolved to locally, if it could be resolved
    pub revision: Option<Revision>,
    /// One report per host, in deploy order
    pub reports: Vec<RunReport>,
    pub warnings: Vec<DeployWarning>,
}

/// How the workflow ended when it did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    Completed(WorkflowResult),
    /// The user declined the confirmation prompt
    Cancelled,
}

/// Confirmation callback: role, hosts, branch name
pub type ConfirmFn<'a> = &'a dyn Fn(Role, &[String], &str) -> Result<bool>;

/// Warnings worth showing before a deploy starts.
pub fn collect_warnings(
    role: Role,
    ignored_roles: &[String],
    config: &DeployConfig,
    revision_error: Option<String>,
    branch_name: &str,
) -> Vec<DeployWarning> {
    let mut warnings = Vec::new();

    if !ignored_roles.is_empty() {
        warnings.push(DeployWarning::IgnoredRoles {
            selected: role.name().to_string(),
            ignored: ignored_roles.to_vec(),
        });
    }

    if let Some(reason) = revision_error {
        warnings.push(DeployWarning::UnresolvedRevision {
            branch: branch_name.to_string(),
            reason,
        });
    }

    if role == Role::Staging && config.project.migration_env != role.name() {
        warnings.push(DeployWarning::MigrationEnvMismatch {
            role: role.name().to_string(),
            migration_env: config.project.migration_env.clone(),
        });
    }

    warnings
}

/// Main deploy workflow
///
/// 1. Select the role (first of the requested roles)
/// 2. Resolve the branch locally for the summary (staging only)
/// 3. Display warnings
/// 4. Confirm a staging deploy, unless forced or dry-running. Production
///    only prints its status line, so it never asks
/// 5. Dispatch to the role's deploy procedure
///
/// # Returns
/// * `Ok(Completed)` - Every step succeeded on every host
/// * `Ok(Cancelled)` - The user declined the prompt
/// * `Err` - Role selection, configuration or any deploy step failed
pub fn run_deploy_workflow(
    args: &DeployWorkflowArgs,
    config: &DeployConfig,
    runner: &dyn CommandRunner,
    source: Option<&dyn SourceRepository>,
    confirm: ConfirmFn<'_>,
) -> Result<WorkflowOutcome> {
    let (role, ignored_roles) = Role::select(&args.roles)?;
    let hosts = config.hosts_for(role)?;

    let (revision, revision_error) = match (role, source) {
        (Role::Staging, Some(source)) => match source.resolve(&args.branch_name) {
            Ok(rev) => (Some(rev), None),
            Err(e) => (None, Some(e.to_string())),
        },
        (Role::Staging, None) => (None, Some("not inside a git repository".to_string())),
        (Role::Production, _) => (None, None),
    };

    let warnings = collect_warnings(
        role,
        &ignored_roles,
        config,
        revision_error,
        &args.branch_name,
    );
    for warning in &warnings {
        ui::display_warning(warning);
    }

    let ask = role == Role::Staging && !args.force && !args.dry_run;
    if ask && !confirm(role, hosts, &args.branch_name)? {
        return Ok(WorkflowOutcome::Cancelled);
    }

    tracing::info!(role = %role, branch = %args.branch_name, dry_run = args.dry_run, "starting deploy");

    let reports = Deployer::new(config, runner)
        .dry_run(args.dry_run)
        .deploy(role, &args.branch_name)
        .with_context(|| format!("{} deploy of '{}' failed", role, args.branch_name))?;

    Ok(WorkflowOutcome::Completed(WorkflowResult {
        role,
        branch: args.branch_name.clone(),
        revision,
        reports,
        warnings,
    }))
}
