use std::fmt;

/// Non-fatal conditions noticed while preparing a deploy.
/// These are reported to the user; the deploy carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployWarning {
    /// More than one role was passed; only the first is deployed
    IgnoredRoles { selected: String, ignored: Vec<String> },
    /// The branch could not be resolved in the local repository
    UnresolvedRevision { branch: String, reason: String },
    /// Migrations target an environment named differently from the role
    MigrationEnvMismatch { role: String, migration_env: String },
}

impl fmt::Display for DeployWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployWarning::IgnoredRoles { selected, ignored } => {
                write!(
                    f,
                    "Deploying role '{}' only; ignoring {}",
                    selected,
                    ignored.join(", ")
                )
            }
            DeployWarning::UnresolvedRevision { branch, reason } => {
                write!(
                    f,
                    "Cannot resolve branch '{}' locally ({}); git archive may fail",
                    branch, reason
                )
            }
            DeployWarning::MigrationEnvMismatch {
                role,
                migration_env,
            } => {
                write!(
                    f,
                    "Role '{}' runs migrations against environment '{}'",
                    role, migration_env
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_roles_display() {
        let warning = DeployWarning::IgnoredRoles {
            selected: "staging".to_string(),
            ignored: vec!["production".to_string(), "qa".to_string()],
        };
        assert_eq!(
            warning.to_string(),
            "Deploying role 'staging' only; ignoring production, qa"
        );
    }

    #[test]
    fn test_migration_env_mismatch_display() {
        let warning = DeployWarning::MigrationEnvMismatch {
            role: "staging".to_string(),
            migration_env: "production".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("'staging'"));
        assert!(msg.contains("'production'"));
    }
}
