pub mod command_runner;
pub mod nix_evaluator;
pub mod pull_request;
pub mod update_helper;
pub mod version_control;

pub mod update;

pub use command_runner::{CommandRunner, SystemRunner};
pub use nix_evaluator::NixEvaluatorAgent;
pub use update::{PackageUpdater, UpdateResult, UpdateStatus};
pub use version_control::VersionControlAgent;
