//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across ports to fulfill user stories.

pub mod campaign;
pub mod npc;

// Re-export main types
pub use campaign::{CampaignError, CampaignUseCases};
pub use npc::{NpcError, NpcUseCases};
