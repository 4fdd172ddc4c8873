use crate::agents::pull_request::{PrState, PullRequestAgent};
use crate::agents::version_control::{VersionControlAgent, update_branch_name};
use crate::error::Result;
use crate::output;

/// The checked-out update branch of one package.
///
/// Opening it moves the working tree off the base branch; dropping it always
/// moves it back, so packages must be processed one at a time.
pub struct UpdateBranch<'g, 'a> {
    git: &'g VersionControlAgent<'a>,
    base: &'g str,
    name: String,
}

impl<'g, 'a> UpdateBranch<'g, 'a> {
    /// Start a fresh `update/<package>` branch from the base branch,
    /// replacing any stale local branch of the same name.
    pub fn open(git: &'g VersionControlAgent<'a>, base: &'g str, package: &str) -> Result<Option<Self>> {
        let name = update_branch_name(package);

        git.checkout(base)?;
        git.delete_branch(&name)?;
        if !git.create_branch(&name)? {
            git.checkout(base)?;
            return Ok(None);
        }

        Ok(Some(Self { git, base, name }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drop the local branch after an update that produced nothing to
    /// publish. When the package is up to date, an open PR left over from a
    /// previous run is closed together with its remote branch.
    pub fn discard(self, package: &str, up_to_date: bool, prs: &PullRequestAgent<'_>) -> Result<()> {
        self.git.checkout(self.base)?;
        self.git.delete_branch(&self.name)?;

        if up_to_date && prs.state(&self.name) == PrState::Open {
            output::info(format!("Closing obsolete PR for {package}"));
            prs.close(&self.name)?;
        }
        Ok(())
    }
}

impl Drop for UpdateBranch<'_, '_> {
    fn drop(&mut self) {
        let _ = self.git.checkout(self.base);
    }
}
