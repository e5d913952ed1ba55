//! Domain logic - roles, step plans and command templates, independent of execution

pub mod plan;
pub mod role;
pub mod template;

pub use plan::{DeployPlan, DeployStep, StepAction, StepLocation};
pub use role::Role;
pub use template::{CommandTemplate, TemplateContext};
