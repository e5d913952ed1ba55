//! Command execution abstraction layer
//!
//! Deploy steps never spawn processes themselves. They hand an [Invocation]
//! to a [CommandRunner], which allows for multiple implementations:
//!
//! - [system::SystemRunner]: runs local commands through `sh -c` and remote
//!   commands through `ssh`
//! - [mock::MockRunner]: records invocations for testing

pub mod mock;
pub mod system;

pub use mock::MockRunner;
pub use system::SystemRunner;

use crate::error::Result;

/// Where and how a rendered command is run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Local,
    Remote {
        host: String,
        user: String,
        /// Login shell prefix, e.g. `/bin/bash -l -c`
        shell: String,
    },
}

/// A rendered command bound to its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub target: Target,
    pub command: String,
}

impl Invocation {
    pub fn local(command: impl Into<String>) -> Self {
        Invocation {
            target: Target::Local,
            command: command.into(),
        }
    }

    pub fn remote(
        host: impl Into<String>,
        user: impl Into<String>,
        shell: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Invocation {
            target: Target::Remote {
                host: host.into(),
                user: user.into(),
                shell: shell.into(),
            },
            command: command.into(),
        }
    }

    /// Program and arguments that carry out this invocation.
    ///
    /// Remote commands are passed to ssh as one string so the remote login
    /// shell, not the local one, expands variables like `$GOPATH`.
    pub fn argv(&self) -> Vec<String> {
        match &self.target {
            Target::Local => vec!["sh".to_string(), "-c".to_string(), self.command.clone()],
            Target::Remote { host, user, shell } => vec![
                "ssh".to_string(),
                format!("{}@{}", user, host),
                format!("{} {}", shell, shell_quote(&self.command)),
            ],
        }
    }
}

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        CommandOutput {
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs rendered commands
///
/// Implementations return `Err` only when the command could not be started;
/// a command that ran and exited non-zero is reported through
/// [CommandOutput::code].
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Wraps `s` in single quotes for a POSIX shell.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
