//! Executes a [DeployPlan] against one host, step by step.

use crate::domain::{DeployPlan, StepLocation, TemplateContext};
use crate::error::{DeployError, Result};
use crate::exec::{CommandRunner, Invocation};
use crate::ui;

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Status line printed
    Announced(String),
    Succeeded,
    Failed { code: i32, stderr: String },
    /// Not executed because of a dry run
    Skipped,
}

/// Outcome of one step of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// 1-based position in the plan
    pub index: usize,
    pub description: String,
    /// Rendered command, `None` for the status step
    pub command: Option<String>,
    pub status: StepStatus,
}

/// Outcomes of a plan run on one host, in execution order.
///
/// Execution stops at the first failure, so a failed step is always last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub host: String,
    pub outcomes: Vec<StepOutcome>,
}

impl RunReport {
    /// The step that stopped the run, if any
    pub fn failure(&self) -> Option<&StepOutcome> {
        self.outcomes
            .iter()
            .find(|o| matches!(o.status, StepStatus::Failed { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// Converts a failed report into [DeployError::StepFailed].
    pub fn into_result(self) -> Result<RunReport> {
        let failed = self.failure().and_then(|outcome| match &outcome.status {
            StepStatus::Failed { code, stderr } => Some(DeployError::StepFailed {
                index: outcome.index,
                description: outcome.description.clone(),
                host: self.host.clone(),
                code: *code,
                stderr: stderr.trim().to_string(),
            }),
            _ => None,
        });

        match failed {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Formats the status line printed before a host is deployed.
pub fn status_line(role: &str, host: &str, user: &str) -> String {
    format!("[{}] Executing on {} as {}", role, host, user)
}

/// Runs plans through a [CommandRunner]
pub struct StepRunner<'a> {
    runner: &'a dyn CommandRunner,
    dry_run: bool,
}

impl<'a> StepRunner<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        StepRunner {
            runner,
            dry_run: false,
        }
    }

    /// Render and report each command without running it
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs every step of `plan` in order on the host named in `context`.
    ///
    /// `context` must hold `role`, `host`, `user` and `shell` plus whatever
    /// the plan's templates reference. Every template is rendered before the
    /// first command runs, so a bad placeholder never leaves a host half
    /// deployed.
    ///
    /// # Returns
    /// * `Ok(RunReport)` - Outcomes up to and including the first failure,
    ///   which may be a command that could not be started
    /// * `Err` - If a template cannot be rendered
    pub fn run(&self, plan: &DeployPlan, context: &TemplateContext) -> Result<RunReport> {
        let field = |key: &str| {
            context
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| DeployError::template(format!("missing context value '{}'", key)))
        };
        let role = field("role")?;
        let host = field("host")?;
        let user = field("user")?;
        let shell = field("shell")?;

        let rendered = plan
            .steps()
            .iter()
            .map(|step| step.command().map(|t| t.render(context)).transpose())
            .collect::<Result<Vec<Option<String>>>>()?;

        let total = plan.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, (step, command)) in plan.steps().iter().zip(rendered).enumerate() {
            let index = i + 1;

            let status = match command.as_deref() {
                None => {
                    let line = status_line(&role, &host, &user);
                    ui::display_status(&line);
                    StepStatus::Announced(line)
                }
                Some(command) => {
                    ui::display_step(index, total, step.location, &step.description, command);

                    if self.dry_run {
                        StepStatus::Skipped
                    } else {
                        let invocation = match step.location {
                            StepLocation::Local => Invocation::local(command),
                            StepLocation::Remote => {
                                Invocation::remote(&host, &user, &shell, command)
                            }
                        };

                        tracing::info!(step = index, host = %host, command = %command, "running step");
                        match self.runner.run(&invocation) {
                            Ok(output) if output.is_success() => StepStatus::Succeeded,
                            Ok(output) => {
                                tracing::warn!(step = index, code = ?output.code, "step failed");
                                StepStatus::Failed {
                                    code: output.code.unwrap_or(-1),
                                    stderr: output.stderr,
                                }
                            }
                            // Command never started, e.g. ssh missing from PATH
                            Err(e) => {
                                tracing::warn!(step = index, error = %e, "step could not start");
                                StepStatus::Failed {
                                    code: -1,
                                    stderr: e.to_string(),
                                }
                            }
                        }
                    }
                }
            };

            let failed = matches!(status, StepStatus::Failed { .. });
            outcomes.push(StepOutcome {
                index,
                description: step.description.clone(),
                command,
                status,
            });

            if failed {
                break;
            }
        }

        Ok(RunReport { host, outcomes })
    }
}
