//! Workflow layer driven by the command-line binary

pub mod orchestration;

pub use orchestration::{
    run_deploy_workflow, DeployWorkflowArgs, WorkflowOutcome, WorkflowResult,
};
