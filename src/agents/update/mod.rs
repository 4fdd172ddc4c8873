// Per-package update orchestration
//
// - result: UpdateResult / UpdateStatus records
// - classifier: helper output -> UpdateResult
// - branch: scoped `update/<package>` branch
// - updater: PackageUpdater, one package at a time
// - interaction: local-mode confirmation prompt
pub mod branch;
pub mod classifier;
pub mod interaction;
pub mod result;
pub mod updater;

pub use result::{UpdateResult, UpdateStatus};
pub use updater::PackageUpdater;
