//! Ordered deployment steps for each role.

use super::template::CommandTemplate;

/// Where a step's command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepLocation {
    Local,
    Remote,
}

impl StepLocation {
    pub fn name(&self) -> &'static str {
        match self {
            StepLocation::Local => "local",
            StepLocation::Remote => "remote",
        }
    }
}

/// What a step does when executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Print the status line for the current host
    Announce,
    /// Run a shell command
    Run(CommandTemplate),
}

/// A single deployment step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployStep {
    pub description: String,
    pub location: StepLocation,
    pub action: StepAction,
    /// Re-running the step leaves the host in the same state
    pub idempotent: bool,
}

impl DeployStep {
    pub fn announce() -> Self {
        DeployStep {
            description: "Report target host and user".to_string(),
            location: StepLocation::Local,
            action: StepAction::Announce,
            idempotent: true,
        }
    }

    pub fn local(description: impl Into<String>, command: impl Into<String>) -> Self {
        DeployStep {
            description: description.into(),
            location: StepLocation::Local,
            action: StepAction::Run(CommandTemplate::new(command)),
            idempotent: false,
        }
    }

    pub fn remote(description: impl Into<String>, command: impl Into<String>) -> Self {
        DeployStep {
            description: description.into(),
            location: StepLocation::Remote,
            action: StepAction::Run(CommandTemplate::new(command)),
            idempotent: false,
        }
    }

    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    /// Command template, if this step runs one
    pub fn command(&self) -> Option<&CommandTemplate> {
        match &self.action {
            StepAction::Run(template) => Some(template),
            StepAction::Announce => None,
        }
    }
}

/// Ordered list of steps executed once per host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    steps: Vec<DeployStep>,
}

impl DeployPlan {
    pub fn new(steps: Vec<DeployStep>) -> Self {
        DeployPlan { steps }
    }

    /// Build-from-source deploy used for the staging host.
    ///
    /// The archive path and the remote upload path are fixed, so two
    /// concurrent runs against the same host race on them.
    pub fn staging() -> Self {
        DeployPlan::new(vec![
            DeployStep::announce(),
            DeployStep::remote(
                "Recreate code directory",
                "rm -rf {code_dir} && mkdir -p {code_dir}",
            )
            .idempotent(),
            DeployStep::local(
                "Archive branch",
                "git archive --format=tar --output={archive_path} {branch}",
            ),
            DeployStep::local(
                "Upload archive",
                "scp {archive_path} {user}@{host}:{archive_name}",
            ),
            DeployStep::local("Remove local archive", "rm -f {archive_path}").idempotent(),
            DeployStep::remote(
                "Extract archive",
                "mv ~/{archive_name} {code_dir}/ && cd {code_dir} && tar -xf {archive_name}",
            ),
            DeployStep::remote(
                "Build executable",
                "cd {code_dir} && go build -o ~/{binary_name}",
            ),
            DeployStep::remote(
                "Ensure database exists",
                "mysql -u root -e 'CREATE DATABASE IF NOT EXISTS {database}'",
            )
            .idempotent(),
            DeployStep::remote(
                "Run database migrations",
                "go get -u {migration_tool} && cd {code_dir} && goose -env {migration_env} up",
            ),
            DeployStep::remote("Restart service", "supervisorctl restart {service}"),
        ])
    }

    /// Production deploy: only the status line exists so far.
    // TODO: copy the staging binary to production, run migrations, restart,
    // and record the deployed commit hash for rollback.
    pub fn production() -> Self {
        DeployPlan::new(vec![DeployStep::announce()])
    }

    pub fn steps(&self) -> &[DeployStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
