//! NPC Forge domain layer.
//!
//! Pure data types and invariants for generated NPC records and the campaigns they
//! belong to. Nothing in this crate performs I/O; time is always passed in by the caller.

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{
    Ability, AbilityScores, Campaign, CreativityLevel, DesiredTraits, GeneratedNpc,
    GeneratedNpcPatch, GenerationRequest, GenerationSettings, NpcPatch, NpcRecord, NpcStats,
    SavingThrow, SettingStyle, SkillBonus, Tone, UserRole, DEFAULT_RESTORE_WINDOW_DAYS,
    FAVORITE_TAG,
};
pub use error::DomainError;
pub use ids::{CampaignId, NpcId, UserId};
