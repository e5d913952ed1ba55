use solebtc_deploy::config::DeployConfig;
use solebtc_deploy::deploy::Deployer;
use solebtc_deploy::domain::Role;
use std::io;
use std::sync::Mutex;

use solebtc_deploy::exec::{CommandOutput, CommandRunner, Invocation, MockRunner, Target};
use solebtc_deploy::runner::StepStatus;
use solebtc_deploy::DeployError;

/// Runner that cannot start commands beginning with a given program
struct MissingProgram {
    program: &'static str,
    seen: Mutex<Vec<String>>,
}

impl CommandRunner for MissingProgram {
    fn run(&self, invocation: &Invocation) -> solebtc_deploy::Result<CommandOutput> {
        self.seen.lock().unwrap().push(invocation.command.clone());
        if invocation.command.starts_with(self.program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "No such file or directory").into());
        }
        Ok(CommandOutput::success())
    }
}

// ============================================================================
// Staging
// ============================================================================

#[test]
fn test_staging_master_issues_commands_in_order() {
    let config = DeployConfig::default();
    let mock = MockRunner::new();

    let reports = Deployer::new(&config, &mock)
        .deploy(Role::Staging, "master")
        .unwrap();

    let code_dir = "$GOPATH/src/github.com/freeusd/solebtc";
    assert_eq!(
        mock.commands(),
        vec![
            format!("rm -rf {0} && mkdir -p {0}", code_dir),
            "git archive --format=tar --output=/tmp/solebtc.tar master".to_string(),
            "scp /tmp/solebtc.tar d@staging.solebtc.com:solebtc.tar".to_string(),
            "rm -f /tmp/solebtc.tar".to_string(),
            format!(
                "mv ~/solebtc.tar {0}/ && cd {0} && tar -xf solebtc.tar",
                code_dir
            ),
            format!("cd {} && go build -o ~/solebtc", code_dir),
            "mysql -u root -e 'CREATE DATABASE IF NOT EXISTS solebtc_prod'".to_string(),
            format!(
                "go get -u bitbucket.org/liamstask/goose/cmd/goose && cd {} && goose -env production up",
                code_dir
            ),
            "supervisorctl restart solebtc".to_string(),
        ]
    );

    let report = &reports[0];
    assert_eq!(report.host, "staging.solebtc.com");
    assert_eq!(report.outcomes.len(), 10);
    assert_eq!(
        report.outcomes[0].status,
        StepStatus::Announced("[staging] Executing on staging.solebtc.com as d".to_string())
    );
    assert!(report.outcomes[1..]
        .iter()
        .all(|o| o.status == StepStatus::Succeeded));
}

#[test]
fn test_staging_targets_local_and_remote() {
    let config = DeployConfig::default();
    let mock = MockRunner::new();
    Deployer::new(&config, &mock)
        .deploy(Role::Staging, "master")
        .unwrap();

    let invocations = mock.invocations();
    let remote = Target::Remote {
        host: "staging.solebtc.com".to_string(),
        user: "d".to_string(),
        shell: "/bin/bash -l -c".to_string(),
    };

    let targets: Vec<bool> = invocations.iter().map(|i| i.target == remote).collect();
    assert_eq!(
        targets,
        vec![true, false, false, false, true, true, true, true, true]
    );
    assert!(invocations
        .iter()
        .all(|i| i.target == remote || i.target == Target::Local));
}

#[test]
fn test_staging_branch_content_does_not_change_order() {
    let config = DeployConfig::default();

    for branch in ["master", "feature/withdrawals", "v1.2.3"] {
        let mock = MockRunner::new();
        Deployer::new(&config, &mock)
            .deploy(Role::Staging, branch)
            .unwrap();

        let commands = mock.commands();
        assert_eq!(commands.len(), 9);
        assert!(commands[1].ends_with(branch));
        assert!(commands[0].starts_with("rm -rf "));
        assert_eq!(commands[8], "supervisorctl restart solebtc");
    }
}

#[test]
fn test_staging_rerun_issues_identical_commands() {
    let config = DeployConfig::default();
    let mock = MockRunner::new();
    let deployer = Deployer::new(&config, &mock);

    deployer.deploy(Role::Staging, "master").unwrap();
    deployer.deploy(Role::Staging, "master").unwrap();

    let invocations = mock.invocations();
    assert_eq!(invocations.len(), 18);
    assert_eq!(invocations[..9], invocations[9..]);
}

#[test]
fn test_staging_failure_stops_and_reports_step() {
    let config = DeployConfig::default();
    let mock = MockRunner::new().fail_on("go build", 2);

    let err = Deployer::new(&config, &mock)
        .deploy(Role::Staging, "master")
        .unwrap_err();

    match err {
        DeployError::StepFailed {
            index,
            description,
            host,
            code,
            ..
        } => {
            assert_eq!(index, 7);
            assert_eq!(description, "Build executable");
            assert_eq!(host, "staging.solebtc.com");
            assert_eq!(code, 2);
        }
        other => panic!("expected StepFailed, got {:?}", other),
    }

    // Nothing after the build ran, and nothing was cleaned up
    let commands = mock.commands();
    assert_eq!(commands.len(), 6);
    assert!(commands.iter().all(|c| !c.contains("supervisorctl")));
}

#[test]
fn test_staging_unstartable_command_reports_step() {
    let config = DeployConfig::default();
    let runner = MissingProgram {
        program: "scp",
        seen: Mutex::new(Vec::new()),
    };

    let err = Deployer::new(&config, &runner)
        .deploy(Role::Staging, "master")
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(4));
    match err {
        DeployError::StepFailed {
            description,
            host,
            code,
            stderr,
            ..
        } => {
            assert_eq!(description, "Upload archive");
            assert_eq!(host, "staging.solebtc.com");
            assert_eq!(code, -1);
            assert!(stderr.contains("No such file or directory"));
        }
        other => panic!("expected StepFailed, got {:?}", other),
    }

    let seen = runner.seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen[2].starts_with("scp "));
}

#[test]
fn test_staging_multiple_hosts_run_sequentially() {
    let mut config = DeployConfig::default();
    config.roles.insert(
        "staging".to_string(),
        vec!["a.example.com".to_string(), "b.example.com".to_string()],
    );
    let mock = MockRunner::new();

    let reports = Deployer::new(&config, &mock)
        .deploy(Role::Staging, "master")
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].host, "a.example.com");
    assert_eq!(reports[1].host, "b.example.com");
    assert_eq!(mock.commands().len(), 18);
    assert_eq!(
        mock.commands()[2],
        "scp /tmp/solebtc.tar d@a.example.com:solebtc.tar"
    );
    assert_eq!(
        mock.commands()[11],
        "scp /tmp/solebtc.tar d@b.example.com:solebtc.tar"
    );
}

#[test]
fn test_staging_failure_on_first_host_skips_second() {
    let mut config = DeployConfig::default();
    config.roles.insert(
        "staging".to_string(),
        vec!["a.example.com".to_string(), "b.example.com".to_string()],
    );
    let mock = MockRunner::new().fail_on("supervisorctl", 1);

    let err = Deployer::new(&config, &mock)
        .deploy(Role::Staging, "master")
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(10));
    assert!(mock
        .invocations()
        .iter()
        .all(|i| !matches!(&i.target, Target::Remote { host, .. } if host == "b.example.com")));
}

#[test]
fn test_staging_dry_run_executes_nothing() {
    let config = DeployConfig::default();
    let mock = MockRunner::new();

    let reports = Deployer::new(&config, &mock)
        .dry_run(true)
        .deploy(Role::Staging, "master")
        .unwrap();

    assert!(mock.invocations().is_empty());
    assert_eq!(reports[0].outcomes.len(), 10);
    assert!(reports[0].outcomes[1..]
        .iter()
        .all(|o| o.status == StepStatus::Skipped));
}

#[test]
fn test_staging_uses_configured_migration_env() {
    let mut config = DeployConfig::default();
    config.project.migration_env = "staging".to_string();
    let mock = MockRunner::new();

    Deployer::new(&config, &mock)
        .deploy(Role::Staging, "master")
        .unwrap();

    assert!(mock.commands()[7].ends_with("goose -env staging up"));
}

// ============================================================================
// Production
// ============================================================================

#[test]
fn test_production_only_announces() {
    let config = DeployConfig::default();
    let mock = MockRunner::new();

    let err = Deployer::new(&config, &mock)
        .deploy(Role::Production, "master")
        .unwrap_err();

    assert!(matches!(err, DeployError::NotImplemented(_)));
    assert!(mock.invocations().is_empty());
}

#[test]
fn test_production_ignores_branch_name() {
    let config = DeployConfig::default();
    for branch in ["master", ""] {
        let mock = MockRunner::new();
        let result = Deployer::new(&config, &mock).deploy(Role::Production, branch);
        assert!(matches!(result, Err(DeployError::NotImplemented(_))));
        assert!(mock.invocations().is_empty());
    }
}
