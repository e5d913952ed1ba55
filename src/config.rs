use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::Role;
use crate::error::{DeployError, Result};

/// Represents the complete configuration for solebtc-deploy.
///
/// Replaces the process-wide shell/user/role settings with one value that is
/// passed into every deploy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DeployConfig {
    #[serde(default)]
    pub env: EnvConfig,

    #[serde(default = "default_roles")]
    pub roles: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub project: ProjectConfig,
}

/// Connection settings shared by every remote command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EnvConfig {
    /// Login shell remote commands are wrapped in
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Remote user name
    #[serde(default = "default_user")]
    pub user: String,
}

fn default_shell() -> String {
    "/bin/bash -l -c".to_string()
}

fn default_user() -> String {
    "d".to_string()
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            shell: default_shell(),
            user: default_user(),
        }
    }
}

/// Returns the default role-to-host mapping.
fn default_roles() -> BTreeMap<String, Vec<String>> {
    let mut roles = BTreeMap::new();
    roles.insert(
        "staging".to_string(),
        vec!["staging.solebtc.com".to_string()],
    );
    roles.insert("production".to_string(), vec!["solebtc.com".to_string()]);
    roles
}

/// Paths and names of the deployed project.
///
/// Values may reference remote environment variables such as `$GOPATH`;
/// they are expanded by the remote login shell, not locally.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_code_dir")]
    pub code_dir: String,

    #[serde(default = "default_archive_path")]
    pub archive_path: String,

    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_migration_tool")]
    pub migration_tool: String,

    #[serde(default = "default_migration_env")]
    pub migration_env: String,

    #[serde(default = "default_service")]
    pub service: String,
}

fn default_code_dir() -> String {
    "$GOPATH/src/github.com/freeusd/solebtc".to_string()
}

fn default_archive_path() -> String {
    "/tmp/solebtc.tar".to_string()
}

fn default_binary_name() -> String {
    "solebtc".to_string()
}

fn default_database() -> String {
    "solebtc_prod".to_string()
}

fn default_migration_tool() -> String {
    "bitbucket.org/liamstask/goose/cmd/goose".to_string()
}

fn default_migration_env() -> String {
    "production".to_string()
}

fn default_service() -> String {
    "solebtc".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            code_dir: default_code_dir(),
            archive_path: default_archive_path(),
            binary_name: default_binary_name(),
            database: default_database(),
            migration_tool: default_migration_tool(),
            migration_env: default_migration_env(),
            service: default_service(),
        }
    }
}

impl ProjectConfig {
    /// File name of the uploaded archive, i.e. the last component of `archive_path`.
    pub fn archive_name(&self) -> &str {
        self.archive_path.rsplit('/').next().unwrap_or_default()
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            env: EnvConfig::default(),
            roles: default_roles(),
            project: ProjectConfig::default(),
        }
    }
}

impl DeployConfig {
    /// Hosts configured for a role.
    ///
    /// # Returns
    /// * `Ok(&[String])` - Non-empty host list
    /// * `Err(NoHosts)` - If the role is missing from the mapping or maps to nothing
    pub fn hosts_for(&self, role: Role) -> Result<&[String]> {
        match self.roles.get(role.name()) {
            Some(hosts) if !hosts.is_empty() => Ok(hosts.as_slice()),
            _ => Err(DeployError::NoHosts(role.name().to_string())),
        }
    }

    /// Checks the fields every deploy relies on.
    pub fn validate(&self) -> Result<()> {
        if self.env.user.trim().is_empty() {
            return Err(DeployError::config("env.user must not be empty"));
        }
        if self.env.shell.trim().is_empty() {
            return Err(DeployError::config("env.shell must not be empty"));
        }
        if self.project.code_dir.trim().is_empty() {
            return Err(DeployError::config("project.code_dir must not be empty"));
        }
        if self.project.archive_name().is_empty() {
            return Err(DeployError::config("project.archive_path must name a file"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `deploy.toml` in current directory
/// 3. `.solebtc-deploy.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(DeployConfig)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<DeployConfig> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./deploy.toml").exists() {
        fs::read_to_string("./deploy.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".solebtc-deploy.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(DeployConfig::default());
        }
    } else {
        return Ok(DeployConfig::default());
    };

    let config: DeployConfig = toml::from_str(&config_str)?;
    config.validate()?;
    tracing::debug!(roles = ?config.roles.keys().collect::<Vec<_>>(), "loaded configuration");
    Ok(config)
}
