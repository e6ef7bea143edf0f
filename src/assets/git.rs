//! libgit2 implementation of the mirror backend.

use git2::{build::CheckoutBuilder, build::RepoBuilder, AnnotatedCommit, Repository, Signature};
use std::path::Path;
use tracing::debug;

use super::errors::MirrorError;
use super::mirror::{MirrorBackend, SyncResult};

/// Identity used for merge commits; the mirror never pushes
const LOCAL_NAME: &str = "Local";
const LOCAL_EMAIL: &str = "local@local.host";

pub struct GitMirrorBackend {
    branch: String,
}

impl GitMirrorBackend {
    pub fn new(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
        }
    }

    fn merge_with_local_identity(
        &self,
        repo: &Repository,
        fetched: &AnnotatedCommit,
    ) -> Result<SyncResult, MirrorError> {
        repo.merge(&[fetched], None, None)?;

        let mut index = repo.index()?;
        if index.has_conflicts() {
            repo.cleanup_state()?;
            return Err(MirrorError::Conflict(self.branch.clone()));
        }

        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = Signature::now(LOCAL_NAME, LOCAL_EMAIL)?;
        let head_commit = repo.head()?.peel_to_commit()?;
        let remote_commit = repo.find_commit(fetched.id())?;
        let message = format!("Merge remote-tracking branch 'origin/{}'", self.branch);

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &tree,
            &[&head_commit, &remote_commit],
        )?;
        repo.cleanup_state()?;

        Ok(SyncResult::Merged {
            commit: oid.to_string(),
        })
    }
}

impl MirrorBackend for GitMirrorBackend {
    fn clone_into(&self, url: &str, dest: &Path) -> Result<SyncResult, MirrorError> {
        RepoBuilder::new().branch(&self.branch).clone(url, dest)?;
        Ok(SyncResult::Cloned)
    }

    fn pull(&self, dest: &Path) -> Result<SyncResult, MirrorError> {
        let repo = Repository::open(dest)?;

        let mut remote = repo.find_remote("origin")?;
        remote.fetch(&[self.branch.as_str()], None, None)?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetched = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetched])?;

        if analysis.is_up_to_date() {
            return Ok(SyncResult::UpToDate);
        }

        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", self.branch);
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetched.id(), "mirror: fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

            debug!(commit = %fetched.id(), "Fast-forwarded asset mirror");
            return Ok(SyncResult::FastForwarded {
                commit: fetched.id().to_string(),
            });
        }

        self.merge_with_local_identity(&repo, &fetched)
    }
}
