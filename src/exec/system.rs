use std::process::Command;

use crate::error::{DeployError, Result};
use crate::exec::{CommandOutput, CommandRunner, Invocation};

/// Runs invocations as real processes, blocking until each exits.
///
/// No timeout is applied; a hung ssh session hangs the deploy.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let argv = invocation.argv();
        let Some((program, args)) = argv.split_first() else {
            return Err(DeployError::config("empty command line"));
        };

        tracing::debug!(program = %program, args = ?args, "spawning command");

        let output = Command::new(program).args(args).output()?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(code = ?result.code, stdout = %result.stdout.trim_end(), "command finished");

        Ok(result)
    }
}
