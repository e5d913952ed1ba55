use std::sync::Mutex;

use crate::error::Result;
use crate::exec::{CommandOutput, CommandRunner, Invocation};

/// Mock runner for testing without spawning processes
///
/// Every invocation is recorded. A command containing a configured failure
/// pattern exits with the configured code; everything else succeeds.
#[derive(Debug, Default)]
pub struct MockRunner {
    invocations: Mutex<Vec<Invocation>>,
    failures: Vec<(String, i32)>,
}

impl MockRunner {
    /// Create a mock where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make commands containing `pattern` exit with `code`
    pub fn fail_on(mut self, pattern: impl Into<String>, code: i32) -> Self {
        self.failures.push((pattern.into(), code));
        self
    }

    /// Invocations received so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    /// Commands received so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|inv| inv.command)
            .collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        if let Ok(mut recorded) = self.invocations.lock() {
            recorded.push(invocation.clone());
        }

        let failure = self
            .failures
            .iter()
            .find(|(pattern, _)| invocation.command.contains(pattern.as_str()));

        Ok(match failure {
            Some((pattern, code)) => {
                CommandOutput::failure(*code, format!("mock failure on '{}'", pattern))
            }
            None => CommandOutput::success(),
        })
    }
}
