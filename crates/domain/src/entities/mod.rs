//! Domain entities.

mod campaign;
mod generation;
mod npc;
mod stats;
mod user;

pub use campaign::Campaign;
pub use generation::{
    CreativityLevel, DesiredTraits, GenerationRequest, GenerationSettings, SettingStyle, Tone,
};
pub use npc::{
    GeneratedNpc, GeneratedNpcPatch, NpcPatch, NpcRecord, DEFAULT_RESTORE_WINDOW_DAYS,
    FAVORITE_TAG,
};
pub use stats::{Ability, AbilityScores, NpcStats, SavingThrow, SkillBonus};
pub use user::UserRole;
