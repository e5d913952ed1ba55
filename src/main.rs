use anyhow::Result;
use clap::Parser;
use std::process::exit;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use solebtc_deploy::cli::{run_deploy_workflow, DeployWorkflowArgs, WorkflowOutcome};
use solebtc_deploy::config;
use solebtc_deploy::exec::SystemRunner;
use solebtc_deploy::git::{Git2Source, SourceRepository};
use solebtc_deploy::ui;

#[derive(clap::Parser)]
#[command(
    name = "solebtc-deploy",
    about = "Build and deploy solebtc to staging or production hosts",
    version
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short = 'R',
        long = "roles",
        value_delimiter = ',',
        help = "Roles to deploy to; only the first is used"
    )]
    roles: Vec<String>,

    #[arg(long, help = "Show configured roles and hosts and exit")]
    list: bool,

    #[arg(short, long, help = "Skip confirmation prompt")]
    force: bool,

    #[arg(long, help = "Print the commands without running them")]
    dry_run: bool,

    #[arg(short, long, help = "Log every command and its output")]
    verbose: bool,

    #[command(subcommand)]
    task: Option<Task>,
}

#[derive(clap::Subcommand)]
enum Task {
    /// Archive, upload, build, migrate and restart
    Deploy {
        #[arg(short, long, help = "Branch to deploy")]
        branch_name: String,
    },
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(error) = run(args) {
        ui::display_error(&format!("{:#}", error));
        exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    if args.list {
        ui::display_roles(&config.roles);
        return Ok(());
    }

    let Some(Task::Deploy { branch_name }) = args.task else {
        anyhow::bail!("no task given; try: solebtc-deploy -R staging deploy --branch-name master");
    };

    let source = match Git2Source::open(".") {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::debug!(error = %e, "no local repository");
            None
        }
    };

    let workflow_args = DeployWorkflowArgs {
        roles: args.roles,
        branch_name,
        force: args.force,
        dry_run: args.dry_run,
    };

    let outcome = run_deploy_workflow(
        &workflow_args,
        &config,
        &SystemRunner::new(),
        source.as_ref().map(|s| s as &dyn SourceRepository),
        &|role, hosts, branch| ui::confirm_deploy(role.name(), hosts, branch),
    )?;

    match outcome {
        WorkflowOutcome::Completed(result) => {
            ui::display_summary(
                result.role.name(),
                &result.branch,
                result.revision.as_ref(),
                &result.reports,
                workflow_args.dry_run,
            );
        }
        WorkflowOutcome::Cancelled => {
            println!("Deploy cancelled by user.");
        }
    }

    Ok(())
}
