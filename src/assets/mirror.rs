use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use super::errors::MirrorError;

pub const DEFAULT_ASSET_REPO_URL: &str = "https://github.com/Mar-7th/StarRailRes.git";
/// Public raw-file host for the same repository, used for links in responses
pub const DEFAULT_ASSET_URL_BASE: &str =
    "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    Absent,
    Present,
    Syncing,
    /// A sync failed; the directory is deleted before the state moves on to `Absent`
    Corrupt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    Cloned,
    UpToDate,
    /// `commit` is the hex id of the new HEAD in both variants
    FastForwarded { commit: String },
    Merged { commit: String },
}

/// Blocking clone/pull operations against the remote asset repository
pub trait MirrorBackend: Send + Sync {
    fn clone_into(&self, url: &str, dest: &Path) -> Result<SyncResult, MirrorError>;
    fn pull(&self, dest: &Path) -> Result<SyncResult, MirrorError>;
}

/// Local read-only copy of the static asset repository
pub struct AssetMirror {
    root: PathBuf,
    remote_url: String,
    backend: Arc<dyn MirrorBackend>,
    syncing: Arc<AtomicBool>,
}

impl AssetMirror {
    pub fn new(root: PathBuf, remote_url: &str, backend: Arc<dyn MirrorBackend>) -> Self {
        Self {
            root,
            remote_url: remote_url.to_string(),
            backend,
            syncing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of an asset given its `/`-separated repository path.
    ///
    /// The file may not exist; readers must tolerate that.
    pub fn resolve_asset(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    pub fn state(&self) -> MirrorState {
        if self.syncing.load(Ordering::SeqCst) {
            MirrorState::Syncing
        } else if self.root.is_dir() {
            MirrorState::Present
        } else {
            MirrorState::Absent
        }
    }

    /// Clones or pulls the mirror, deleting it if anything goes wrong.
    ///
    /// Returns the state after the sync; errors never leave this method.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn sync(&self) -> MirrorState {
        self.syncing.store(true, Ordering::SeqCst);

        let root = self.root.clone();
        let url = self.remote_url.clone();
        let backend = Arc::clone(&self.backend);
        let outcome = tokio::task::spawn_blocking(move || sync_blocking(backend.as_ref(), &url, &root))
            .await
            .map_err(|e| MirrorError::Join(e.to_string()))
            .and_then(|result| result);

        let state = match outcome {
            Ok(result) => {
                log_sync_result(&result);
                MirrorState::Present
            }
            Err(e) => {
                error!(error = %e, "Asset mirror sync failed");
                self.discard_corrupt().await;
                MirrorState::Absent
            }
        };

        self.syncing.store(false, Ordering::SeqCst);
        state
    }

    async fn discard_corrupt(&self) {
        warn!(state = ?MirrorState::Corrupt, "Deleting asset mirror so the next sync clones afresh");
        let root = self.root.clone();
        match tokio::task::spawn_blocking(move || remove_mirror(&root)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Failed to delete corrupt asset mirror"),
            Err(e) => error!(error = %e, "Asset mirror deletion task panicked"),
        }
    }
}

fn remove_mirror(root: &Path) -> std::io::Result<()> {
    if root.exists() {
        std::fs::remove_dir_all(root)?;
    }
    Ok(())
}

/// Public URL of an asset path, or `None` when the path is blank
pub fn asset_url(base: &str, relative: &str) -> Option<String> {
    let relative = relative.trim().trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }
    Some(format!("{}/{}", base.trim_end_matches('/'), relative))
}

fn sync_blocking(
    backend: &dyn MirrorBackend,
    url: &str,
    root: &Path,
) -> Result<SyncResult, MirrorError> {
    let started = Instant::now();
    let result = if root.is_dir() {
        info!(url = %url, "Pulling asset repository");
        backend.pull(root)?
    } else {
        info!(url = %url, "Cloning asset repository");
        backend.clone_into(url, root)?
    };
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "Asset repository sync finished");
    Ok(result)
}

fn log_sync_result(result: &SyncResult) {
    match result {
        SyncResult::Cloned => info!("Asset mirror cloned"),
        SyncResult::UpToDate => info!("Asset mirror already up to date"),
        SyncResult::FastForwarded { commit } => {
            info!(commit = %commit, "Asset mirror fast-forwarded")
        }
        SyncResult::Merged { commit } => info!(commit = %commit, "Asset mirror merged"),
    }
}
