//! NPC use cases.
//!
//! Generation pipeline (prompt, provider, normalizer) plus the record lifecycle:
//! listing, editing, trash and restore, favorites, and summaries.

use std::sync::Arc;

use npcforge_domain::DomainError;

use crate::infrastructure::ports::RepoError;

mod cleanup;
mod generation;
mod lifecycle;
pub mod normalizer;
pub mod prompt;
pub mod schema;

pub use cleanup::{run_cleanup_scheduler, sweep_expired};
pub use generation::NpcGenerator;
pub use lifecycle::NpcLifecycle;

/// Container for NPC use cases.
pub struct NpcUseCases {
    pub lifecycle: Arc<NpcLifecycle>,
}

impl NpcUseCases {
    pub fn new(lifecycle: Arc<NpcLifecycle>) -> Self {
        Self { lifecycle }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NpcError {
    #[error("{0}")]
    Validation(String),
    #[error("NPC not found")]
    NotFound,
    #[error("Restore window has expired")]
    Expired,
    /// The provider has no credential configured.
    #[error("Generation is not configured: {0}")]
    Configuration(String),
    /// Provider call failed or returned unusable output.
    #[error("Generation provider error: {0}")]
    Provider(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for NpcError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg)
            | DomainError::InvalidId(msg)
            | DomainError::Parse(msg)
            | DomainError::InvalidStateTransition(msg) => NpcError::Validation(msg),
        }
    }
}
