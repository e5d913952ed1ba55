//! Role dispatch and the per-role deploy procedures.

use crate::config::DeployConfig;
use crate::domain::{DeployPlan, Role, TemplateContext};
use crate::error::{DeployError, Result};
use crate::exec::CommandRunner;
use crate::runner::{RunReport, StepRunner};

/// Runs deploys for one configuration through one command runner
pub struct Deployer<'a> {
    config: &'a DeployConfig,
    runner: &'a dyn CommandRunner,
    dry_run: bool,
}

impl<'a> Deployer<'a> {
    pub fn new(config: &'a DeployConfig, runner: &'a dyn CommandRunner) -> Self {
        Deployer {
            config,
            runner,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Deploys `branch_name` to every host of `role`.
    ///
    /// The branch name is passed through unvalidated. Any failure from the
    /// role's procedure is returned as is.
    pub fn deploy(&self, role: Role, branch_name: &str) -> Result<Vec<RunReport>> {
        match role {
            Role::Staging => self.deploy_staging(branch_name),
            Role::Production => self.deploy_production(branch_name),
        }
    }

    /// Archives, uploads, builds, migrates and restarts on each staging host.
    ///
    /// Hosts are handled one after another; the first failing step stops
    /// the whole deploy and later hosts are not touched.
    pub fn deploy_staging(&self, branch_name: &str) -> Result<Vec<RunReport>> {
        let plan = DeployPlan::staging();
        let mut reports = Vec::new();

        for host in self.config.hosts_for(Role::Staging)? {
            let context = self.context(Role::Staging, host, branch_name);
            let report = StepRunner::new(self.runner)
                .dry_run(self.dry_run)
                .run(&plan, &context)?;
            reports.push(report.into_result()?);
        }

        Ok(reports)
    }

    /// Prints the status line for the first production host and stops.
    ///
    /// Production deploys are not available yet; this always returns
    /// [DeployError::NotImplemented] without running any command.
    pub fn deploy_production(&self, branch_name: &str) -> Result<Vec<RunReport>> {
        let plan = DeployPlan::production();
        let hosts = self.config.hosts_for(Role::Production)?;

        if let Some(host) = hosts.first() {
            let context = self.context(Role::Production, host, branch_name);
            StepRunner::new(self.runner)
                .dry_run(self.dry_run)
                .run(&plan, &context)?;
        }

        Err(DeployError::not_implemented(
            "production deploy (copy the staging build, migrate, restart)",
        ))
    }

    /// Template values for one host.
    pub fn context(&self, role: Role, host: &str, branch_name: &str) -> TemplateContext {
        let env = &self.config.env;
        let project = &self.config.project;

        TemplateContext::new()
            .with("role", role.name())
            .with("host", host)
            .with("user", &env.user)
            .with("shell", &env.shell)
            .with("branch", branch_name)
            .with("code_dir", &project.code_dir)
            .with("archive_path", &project.archive_path)
            .with("archive_name", project.archive_name())
            .with("binary_name", &project.binary_name)
            .with("database", &project.database)
            .with("migration_tool", &project.migration_tool)
            .with("migration_env", &project.migration_env)
            .with("service", &project.service)
    }
}
