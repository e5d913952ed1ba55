use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

/// Deployment target selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Staging,
    Production,
}

impl Role {
    /// Name used as the key in the role-to-host mapping
    pub fn name(&self) -> &'static str {
        match self {
            Role::Staging => "staging",
            Role::Production => "production",
        }
    }

    /// Picks the role that drives a deploy: the first of the supplied list.
    ///
    /// Returns the selected role together with the names that were ignored.
    pub fn select(roles: &[String]) -> Result<(Role, Vec<String>), DeployError> {
        let (first, rest) = roles
            .split_first()
            .ok_or_else(|| DeployError::config("no role selected; pass -R staging or -R production"))?;

        Ok((first.parse()?, rest.to_vec()))
    }
}

impl FromStr for Role {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "staging" => Ok(Role::Staging),
            "production" => Ok(Role::Production),
            other => Err(DeployError::UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
