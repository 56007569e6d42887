//! NpcRecord entity - a generated NPC together with the request that produced it.
//!
//! Records are owned by exactly one user. Deleting a record first moves it to the
//! trash (`is_active = false`) where it can be restored until `permanent_delete_at`;
//! after that point only the cleanup sweep touches it.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::generation::{GenerationRequest, GenerationSettings};
use super::stats::NpcStats;
use crate::common::{clean_list, clean_text};
use crate::{CampaignId, DomainError, NpcId, UserId};

/// Tag that marks a record as one of the owner's favorites.
pub const FAVORITE_TAG: &str = "favorite";

/// How long a soft-deleted record stays restorable.
pub const DEFAULT_RESTORE_WINDOW_DAYS: i64 = 30;

/// The NPC the generator came up with, plus provenance of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNpc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub alternative_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_in_story: Option<String>,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonds: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flaws: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mannerisms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<NpcStats>,
    /// Prompt sent to the provider for this generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_prompt_used: Option<String>,
    /// Raw provider output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_timestamp: Option<DateTime<Utc>>,
}

impl GeneratedNpc {
    pub fn with_provenance(
        mut self,
        prompt: impl Into<String>,
        raw_response: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        self.ai_prompt_used = Some(prompt.into());
        self.ai_response = Some(raw_response.into());
        self.generation_timestamp = Some(generated_at);
        self
    }

    /// Drop the large provenance text fields (used for list views).
    pub fn without_provenance(mut self) -> Self {
        self.ai_prompt_used = None;
        self.ai_response = None;
        self
    }

    /// Whether at least one ability score was captured.
    pub fn has_stats(&self) -> bool {
        self.stats
            .as_ref()
            .is_some_and(|s| !s.ability_scores.is_empty())
    }
}

/// A persisted NPC generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcRecord {
    pub id: NpcId,
    pub generation_request: GenerationRequest,
    pub generated_npc: GeneratedNpc,
    pub generation_settings: GenerationSettings,
    pub created_by: UserId,
    pub campaign_id: Option<CampaignId>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub permanent_delete_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NpcRecord {
    pub fn new(
        created_by: UserId,
        generation_request: GenerationRequest,
        generation_settings: GenerationSettings,
        generated_npc: GeneratedNpc,
        campaign_id: Option<CampaignId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NpcId::new(),
            generation_request,
            generated_npc,
            generation_settings,
            created_by,
            campaign_id,
            is_active: true,
            deleted_at: None,
            permanent_delete_at: None,
            tags: Vec::new(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// In the trash and still inside the restore window.
    pub fn is_restorable(&self, now: DateTime<Utc>) -> bool {
        !self.is_active && self.permanent_delete_at.is_some_and(|deadline| now < deadline)
    }

    /// In the trash with the restore window elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.is_active && self.permanent_delete_at.is_some_and(|deadline| deadline <= now)
    }

    /// Move the record to the trash for `window`.
    pub fn soft_delete(&mut self, now: DateTime<Utc>, window: Duration) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::invalid_state_transition(
                "NPC is already deleted",
            ));
        }
        self.is_active = false;
        self.deleted_at = Some(now);
        self.permanent_delete_at = Some(now + window);
        self.updated_at = now;
        Ok(())
    }

    /// Bring the record back out of the trash.
    pub fn restore(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_active {
            return Err(DomainError::invalid_state_transition("NPC is not deleted"));
        }
        if !self.is_restorable(now) {
            return Err(DomainError::invalid_state_transition(
                "Restore window has expired",
            ));
        }
        self.is_active = true;
        self.deleted_at = None;
        self.permanent_delete_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Replace the generated content wholesale (regeneration).
    pub fn replace_generated(&mut self, generated: GeneratedNpc, now: DateTime<Utc>) {
        self.generated_npc = generated;
        self.updated_at = now;
    }

    pub fn is_favorite(&self) -> bool {
        self.tags.iter().any(|t| t == FAVORITE_TAG)
    }

    /// Flip the favorite tag; returns the new state.
    pub fn toggle_favorite(&mut self, now: DateTime<Utc>) -> bool {
        let favorite = if self.is_favorite() {
            self.tags.retain(|t| t != FAVORITE_TAG);
            false
        } else {
            self.tags.push(FAVORITE_TAG.to_string());
            true
        };
        self.updated_at = now;
        favorite
    }

    /// Merge a partial update into the record.
    ///
    /// The patch is validated as a whole before anything is written, so a rejected
    /// patch leaves the record untouched. Stats only live on records whose request
    /// asks for them; switching `includeStats` off drops the stored block.
    pub fn apply_patch(&mut self, patch: NpcPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        let request = patch
            .generation_request
            .map(GenerationRequest::validated)
            .transpose()?;
        let include_stats = request
            .as_ref()
            .map_or(self.generation_request.include_stats, |r| r.include_stats);
        if let Some(npc_patch) = &patch.generated_npc {
            npc_patch.validate(include_stats)?;
        }

        if let Some(request) = request {
            self.generation_request = request;
        }
        if let Some(settings) = patch.generation_settings {
            self.generation_settings = settings;
        }
        if let Some(npc_patch) = patch.generated_npc {
            npc_patch.apply_to(&mut self.generated_npc);
        }
        if !include_stats {
            self.generated_npc.stats = None;
        }
        if let Some(campaign_id) = patch.campaign_id {
            self.campaign_id = campaign_id;
        }
        if let Some(tags) = patch.tags {
            let mut seen = HashSet::new();
            let mut tags = clean_list(tags);
            tags.retain(|t| seen.insert(t.clone()));
            self.tags = tags;
        }
        if let Some(notes) = patch.notes {
            self.notes = clean_text(notes);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Strip provenance text for list projections.
    pub fn into_list_projection(mut self) -> Self {
        self.generated_npc = self.generated_npc.without_provenance();
        self
    }

    /// Lower-cased text searched by free-text NPC search.
    pub fn search_text(&self) -> String {
        [
            self.generated_npc.name.as_deref(),
            Some(self.generation_request.role.as_str()),
            self.generated_npc.race.as_deref(),
            self.generated_npc.occupation.as_deref(),
            self.generated_npc.location.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
    }
}

/// Partial update for an NPC record. Unknown fields are rejected.
///
/// Nested `Option<Option<_>>` fields distinguish "leave alone" (absent) from
/// "clear" (`null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NpcPatch {
    #[serde(default)]
    pub generation_request: Option<GenerationRequest>,
    #[serde(default)]
    pub generation_settings: Option<GenerationSettings>,
    #[serde(default)]
    pub generated_npc: Option<GeneratedNpcPatch>,
    #[serde(default, deserialize_with = "present")]
    pub campaign_id: Option<Option<CampaignId>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Field-level edits to the generated content. Provenance is not editable.
///
/// Like [`NpcPatch`], `null` clears a field and an absent key leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratedNpcPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    pub alternative_names: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub race: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub class: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub background: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub occupation: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub role_in_story: Option<Option<String>>,
    pub personality_traits: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub ideals: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub bonds: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub flaws: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub appearance: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub mannerisms: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub stats: Option<Option<NpcStats>>,
}

impl GeneratedNpcPatch {
    fn validate(&self, include_stats: bool) -> Result<(), DomainError> {
        if let Some(Some(stats)) = &self.stats {
            if !include_stats {
                return Err(DomainError::validation(
                    "Stats cannot be set when includeStats is false",
                ));
            }
            stats.ability_scores.validate()?;
        }
        Ok(())
    }

    fn apply_to(self, npc: &mut GeneratedNpc) {
        fn set(target: &mut Option<String>, value: Option<Option<String>>) {
            if let Some(value) = value {
                *target = clean_text(value);
            }
        }

        set(&mut npc.name, self.name);
        set(&mut npc.race, self.race);
        set(&mut npc.class, self.class);
        set(&mut npc.background, self.background);
        set(&mut npc.occupation, self.occupation);
        set(&mut npc.location, self.location);
        set(&mut npc.role_in_story, self.role_in_story);
        set(&mut npc.ideals, self.ideals);
        set(&mut npc.bonds, self.bonds);
        set(&mut npc.flaws, self.flaws);
        set(&mut npc.appearance, self.appearance);
        set(&mut npc.mannerisms, self.mannerisms);

        if let Some(names) = self.alternative_names {
            npc.alternative_names = clean_list(names);
        }
        if let Some(traits) = self.personality_traits {
            npc.personality_traits = clean_list(traits);
        }
        if let Some(stats) = self.stats {
            npc.stats = stats.filter(|s| !s.is_empty());
        }
    }
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0)
            .single()
            .expect("valid date")
    }

    fn record() -> NpcRecord {
        let request = GenerationRequest::new("merchant", "quest giver").expect("valid");
        let npc = GeneratedNpc {
            name: Some("Elda".to_string()),
            race: Some("Human".to_string()),
            ..Default::default()
        };
        NpcRecord::new(
            UserId::new(),
            request,
            GenerationSettings::default(),
            npc,
            None,
            now(),
        )
    }

    #[test]
    fn new_record_is_active() {
        let npc = record();
        assert!(npc.is_active);
        assert!(npc.deleted_at.is_none());
        assert!(npc.campaign_id.is_none());
        assert_eq!(npc.created_at, npc.updated_at);
    }

    #[test]
    fn soft_delete_sets_window() {
        let mut npc = record();
        npc.soft_delete(now(), Duration::days(DEFAULT_RESTORE_WINDOW_DAYS))
            .expect("delete");
        assert!(!npc.is_active);
        assert_eq!(npc.deleted_at, Some(now()));
        assert_eq!(npc.permanent_delete_at, Some(now() + Duration::days(30)));
        assert!(npc.soft_delete(now(), Duration::days(30)).is_err());
    }

    #[test]
    fn restore_respects_deadline() {
        let window = Duration::days(DEFAULT_RESTORE_WINDOW_DAYS);
        let deadline = now() + window;

        let mut npc = record();
        npc.soft_delete(now(), window).expect("delete");
        assert!(npc.is_restorable(deadline - Duration::milliseconds(1)));
        assert!(!npc.is_restorable(deadline));
        assert!(npc.is_expired(deadline));

        let mut late = npc.clone();
        assert!(late.restore(deadline).is_err());
        assert!(!late.is_active);

        npc.restore(deadline - Duration::seconds(1)).expect("restore");
        assert!(npc.is_active);
        assert!(npc.deleted_at.is_none());
        assert!(npc.permanent_delete_at.is_none());
    }

    #[test]
    fn delete_then_restore_round_trips() {
        let original = record();
        let mut npc = original.clone();
        npc.soft_delete(now(), Duration::days(30)).expect("delete");
        npc.restore(now() + Duration::hours(1)).expect("restore");

        npc.updated_at = original.updated_at;
        assert_eq!(npc, original);
    }

    #[test]
    fn restore_of_active_record_fails() {
        let mut npc = record();
        assert!(npc.restore(now()).is_err());
    }

    #[test]
    fn favorite_toggles() {
        let mut npc = record();
        assert!(npc.toggle_favorite(now()));
        assert!(npc.is_favorite());
        assert!(!npc.toggle_favorite(now()));
        assert!(npc.tags.is_empty());
    }

    #[test]
    fn patch_merges_fields() {
        let mut npc = record();
        let campaign = CampaignId::new();
        let patch: NpcPatch = serde_json::from_value(serde_json::json!({
            "generatedNpc": { "name": " Elda Brightwater ", "personalityTraits": ["kind", " "] },
            "campaignId": campaign,
            "tags": ["ally", "ally", " "],
            "notes": "Owes the party a favor"
        }))
        .expect("parse patch");

        npc.apply_patch(patch, now()).expect("apply");
        assert_eq!(npc.generated_npc.name.as_deref(), Some("Elda Brightwater"));
        assert_eq!(npc.generated_npc.race.as_deref(), Some("Human"));
        assert_eq!(npc.generated_npc.personality_traits, vec!["kind"]);
        assert_eq!(npc.campaign_id, Some(campaign));
        assert_eq!(npc.tags, vec!["ally"]);
        assert_eq!(npc.notes.as_deref(), Some("Owes the party a favor"));
    }

    #[test]
    fn patch_null_clears_optional_fields() {
        let mut npc = record();
        npc.campaign_id = Some(CampaignId::new());
        let patch: NpcPatch =
            serde_json::from_str(r#"{"campaignId": null}"#).expect("parse patch");
        npc.apply_patch(patch, now()).expect("apply");
        assert_eq!(npc.campaign_id, None);
    }

    #[test]
    fn patch_null_clears_generated_text() {
        let mut npc = record();
        let patch: NpcPatch =
            serde_json::from_str(r#"{"generatedNpc": {"race": null}}"#).expect("parse patch");
        npc.apply_patch(patch, now()).expect("apply");
        assert_eq!(npc.generated_npc.race, None);
        assert_eq!(npc.generated_npc.name.as_deref(), Some("Elda"));
    }

    fn stats_record() -> NpcRecord {
        let mut npc = record();
        npc.generation_request = npc.generation_request.clone().with_stats(true);
        let mut stats = NpcStats {
            armor_class: Some(12),
            ..Default::default()
        };
        stats
            .ability_scores
            .set(crate::Ability::Strength, 14)
            .expect("in range");
        npc.generated_npc.stats = Some(stats);
        npc
    }

    #[test]
    fn patch_rejects_stats_when_not_requested() {
        let mut npc = record();
        assert!(!npc.generation_request.include_stats);
        let before = npc.clone();
        let patch: NpcPatch = serde_json::from_value(serde_json::json!({
            "generatedNpc": { "stats": { "abilityScores": { "strength": 12 }, "armorClass": 15 } }
        }))
        .expect("parse patch");

        assert!(matches!(
            npc.apply_patch(patch, now()),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(npc, before);
    }

    #[test]
    fn patch_rejects_out_of_range_ability_scores() {
        let mut npc = stats_record();
        let before = npc.clone();
        let patch: NpcPatch = serde_json::from_value(serde_json::json!({
            "generatedNpc": { "stats": { "abilityScores": { "strength": 99 } } }
        }))
        .expect("parse patch");

        assert!(matches!(
            npc.apply_patch(patch, now()),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(npc, before);
    }

    #[test]
    fn patch_accepts_valid_stats_when_requested() {
        let mut npc = stats_record();
        let patch: NpcPatch = serde_json::from_value(serde_json::json!({
            "generatedNpc": { "stats": { "abilityScores": { "dexterity": 16 }, "armorClass": 14 } }
        }))
        .expect("parse patch");

        npc.apply_patch(patch, now()).expect("apply");
        let stats = npc.generated_npc.stats.expect("stats kept");
        assert_eq!(stats.ability_scores.dexterity, Some(16));
        assert_eq!(stats.armor_class, Some(14));
    }

    #[test]
    fn switching_include_stats_off_drops_stats() {
        let mut npc = stats_record();
        let patch: NpcPatch = serde_json::from_value(serde_json::json!({
            "generationRequest": { "role": "merchant", "storyFit": "quest giver", "includeStats": false }
        }))
        .expect("parse patch");

        npc.apply_patch(patch, now()).expect("apply");
        assert!(!npc.generation_request.include_stats);
        assert!(npc.generated_npc.stats.is_none());
    }

    #[test]
    fn patch_rejects_unknown_and_protected_fields() {
        assert!(serde_json::from_str::<NpcPatch>(r#"{"isActive": false}"#).is_err());
        assert!(serde_json::from_str::<NpcPatch>(r#"{"createdBy": "x"}"#).is_err());
        assert!(serde_json::from_str::<NpcPatch>(
            r#"{"generatedNpc": {"aiResponse": "forged"}}"#
        )
        .is_err());
    }

    #[test]
    fn invalid_request_patch_leaves_record_untouched() {
        let mut npc = record();
        let before = npc.clone();
        let patch: NpcPatch = serde_json::from_value(serde_json::json!({
            "generationRequest": { "role": " ", "storyFit": "x" },
            "notes": "should not land"
        }))
        .expect("parse patch");
        assert!(npc.apply_patch(patch, now()).is_err());
        assert_eq!(npc, before);
    }

    #[test]
    fn list_projection_drops_provenance() {
        let mut npc = record();
        npc.generated_npc = npc
            .generated_npc
            .clone()
            .with_provenance("prompt", "raw", now());
        let projected = npc.into_list_projection();
        assert!(projected.generated_npc.ai_prompt_used.is_none());
        assert!(projected.generated_npc.ai_response.is_none());
        assert_eq!(projected.generated_npc.generation_timestamp, Some(now()));
    }

    #[test]
    fn campaign_id_serializes_as_null() {
        let json = serde_json::to_value(record()).expect("serialize");
        assert!(json["campaignId"].is_null());
        assert_eq!(json["generationRequest"]["role"], "merchant");
    }
}
