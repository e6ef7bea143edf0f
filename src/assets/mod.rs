pub mod git;
pub mod mirror;

mod errors;

pub use errors::MirrorError;
pub use git::GitMirrorBackend;
pub use mirror::{
    asset_url, AssetMirror, MirrorBackend, MirrorState, SyncResult, DEFAULT_ASSET_REPO_URL,
    DEFAULT_ASSET_URL_BASE,
};
