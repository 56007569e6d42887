//! NPC record lifecycle: create, read, edit, trash, restore, purge.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use npcforge_domain::{
    CampaignId, GenerationRequest, GenerationSettings, NpcId, NpcPatch, NpcRecord, UserId,
};
use npcforge_shared::{
    CampaignCount, CampaignNpcSummary, CampaignNpcs, FavoriteToggled, NpcPage, NpcStatsSummary,
    PaginationInfo, RoleCount,
};

use super::{NpcError, NpcGenerator};
use crate::infrastructure::ports::{CampaignRepo, ClockPort, NpcFilter, NpcRepo, PageRequest};

pub struct NpcLifecycle {
    npcs: Arc<dyn NpcRepo>,
    campaigns: Arc<dyn CampaignRepo>,
    generator: Arc<NpcGenerator>,
    clock: Arc<dyn ClockPort>,
    restore_window: Duration,
}

fn page_of(records: Vec<NpcRecord>, total: u64, page: PageRequest) -> NpcPage {
    NpcPage {
        npcs: records
            .into_iter()
            .map(NpcRecord::into_list_projection)
            .collect(),
        pagination: PaginationInfo::new(page.page, page.limit, total),
    }
}

impl NpcLifecycle {
    pub fn new(
        npcs: Arc<dyn NpcRepo>,
        campaigns: Arc<dyn CampaignRepo>,
        generator: Arc<NpcGenerator>,
        clock: Arc<dyn ClockPort>,
        restore_window: Duration,
    ) -> Self {
        Self {
            npcs,
            campaigns,
            generator,
            clock,
            restore_window,
        }
    }

    async fn active_owned(&self, id: NpcId, owner: UserId) -> Result<NpcRecord, NpcError> {
        self.npcs
            .get_owned(id, owner)
            .await?
            .filter(|record| record.is_active)
            .ok_or(NpcError::NotFound)
    }

    /// Generate and persist a new NPC. Nothing is stored when any step fails.
    pub async fn generate(
        &self,
        owner: UserId,
        request: GenerationRequest,
        settings: GenerationSettings,
        campaign_id: Option<CampaignId>,
    ) -> Result<NpcRecord, NpcError> {
        let request = request.validated()?;
        let now = self.clock.now();
        let generated = self.generator.generate(&request, &settings, now).await?;

        let record = NpcRecord::new(owner, request, settings, generated, campaign_id, now);
        self.npcs.save(&record).await?;

        tracing::info!(
            npc_id = %record.id,
            user_id = %owner,
            role = %record.generation_request.role,
            "NPC generated"
        );
        Ok(record)
    }

    pub async fn get(&self, id: NpcId, owner: UserId) -> Result<NpcRecord, NpcError> {
        self.active_owned(id, owner).await
    }

    pub async fn list(
        &self,
        owner: UserId,
        filter: NpcFilter,
        page: PageRequest,
    ) -> Result<NpcPage, NpcError> {
        let (records, total) = self.npcs.list_active(owner, &filter, page).await?;
        Ok(page_of(records, total, page))
    }

    pub async fn update(
        &self,
        id: NpcId,
        owner: UserId,
        patch: NpcPatch,
    ) -> Result<NpcRecord, NpcError> {
        let mut record = self.active_owned(id, owner).await?;
        record.apply_patch(patch, self.clock.now())?;
        self.npcs.save(&record).await?;

        tracing::info!(npc_id = %id, "NPC updated");
        Ok(record)
    }

    /// Move to the trash; restorable until `permanent_delete_at`.
    pub async fn soft_delete(&self, id: NpcId, owner: UserId) -> Result<NpcRecord, NpcError> {
        let mut record = self.active_owned(id, owner).await?;
        record.soft_delete(self.clock.now(), self.restore_window)?;
        self.npcs.save(&record).await?;

        tracing::info!(
            npc_id = %id,
            permanent_delete_at = ?record.permanent_delete_at,
            "NPC moved to trash"
        );
        Ok(record)
    }

    pub async fn hard_delete(&self, id: NpcId, owner: UserId) -> Result<(), NpcError> {
        let record = self.active_owned(id, owner).await?;
        if !self.npcs.delete(record.id).await? {
            return Err(NpcError::NotFound);
        }

        tracing::info!(npc_id = %id, "NPC permanently deleted");
        Ok(())
    }

    pub async fn restore(&self, id: NpcId, owner: UserId) -> Result<NpcRecord, NpcError> {
        let now = self.clock.now();
        let mut record = self
            .npcs
            .get_owned(id, owner)
            .await?
            .filter(|record| !record.is_active)
            .ok_or(NpcError::NotFound)?;
        if !record.is_restorable(now) {
            return Err(NpcError::Expired);
        }

        record.restore(now)?;
        self.npcs.save(&record).await?;

        tracing::info!(npc_id = %id, "NPC restored");
        Ok(record)
    }

    /// Rerun generation with the stored request and settings, replacing the NPC in place.
    pub async fn regenerate(&self, id: NpcId, owner: UserId) -> Result<NpcRecord, NpcError> {
        let mut record = self.active_owned(id, owner).await?;
        let generated = self
            .generator
            .generate(
                &record.generation_request,
                &record.generation_settings,
                self.clock.now(),
            )
            .await?;

        record.replace_generated(generated, self.clock.now());
        self.npcs.save(&record).await?;

        tracing::info!(npc_id = %id, "NPC regenerated");
        Ok(record)
    }

    /// Purge every trashed record whose restore window has passed.
    pub async fn cleanup_expired(&self) -> Result<u64, NpcError> {
        let deleted = self.npcs.delete_expired(self.clock.now()).await?;
        if deleted > 0 {
            tracing::info!(deleted_count = deleted, "Purged expired NPCs");
        } else {
            tracing::debug!("No expired NPCs to purge");
        }
        Ok(deleted)
    }

    pub async fn list_deleted(&self, owner: UserId, page: PageRequest) -> Result<NpcPage, NpcError> {
        let (records, total) = self
            .npcs
            .list_deleted(owner, self.clock.now(), page)
            .await?;
        Ok(page_of(records, total, page))
    }

    pub async fn list_by_campaign(
        &self,
        owner: UserId,
        campaign_id: CampaignId,
    ) -> Result<CampaignNpcs, NpcError> {
        let records = self.npcs.list_by_campaign(owner, campaign_id).await?;
        let campaign_name = self
            .campaigns
            .get_owned(campaign_id, owner)
            .await?
            .map(|campaign| campaign.name);

        Ok(CampaignNpcs {
            campaign_id,
            campaign_name,
            npcs: records.iter().map(CampaignNpcSummary::from).collect(),
        })
    }

    pub async fn search(
        &self,
        owner: UserId,
        query: &str,
        campaign_id: Option<CampaignId>,
        page: PageRequest,
    ) -> Result<NpcPage, NpcError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NpcError::Validation("Search query is required".to_string()));
        }

        let needle = query.to_lowercase();
        let (records, total) = self.npcs.search(owner, &needle, campaign_id, page).await?;
        Ok(page_of(records, total, page))
    }

    pub async fn toggle_favorite(
        &self,
        id: NpcId,
        owner: UserId,
    ) -> Result<FavoriteToggled, NpcError> {
        let mut record = self.active_owned(id, owner).await?;
        let is_favorite = record.toggle_favorite(self.clock.now());
        self.npcs.save(&record).await?;

        Ok(FavoriteToggled {
            id,
            is_favorite,
            tags: record.tags,
        })
    }

    pub async fn stats_summary(&self, owner: UserId) -> Result<NpcStatsSummary, NpcError> {
        let counts = self.npcs.count_summary(owner).await?;
        let names: HashMap<CampaignId, String> = self
            .campaigns
            .list_for_owner(owner)
            .await?
            .into_iter()
            .map(|campaign| (campaign.id, campaign.name))
            .collect();

        Ok(NpcStatsSummary {
            total_npcs: counts.total,
            by_role: counts
                .by_role
                .into_iter()
                .map(|(role, count)| RoleCount { role, count })
                .collect(),
            by_campaign: counts
                .by_campaign
                .into_iter()
                .filter_map(|(campaign_id, count)| {
                    let campaign_name = names.get(&campaign_id)?.clone();
                    Some(CampaignCount {
                        campaign_id,
                        campaign_name,
                        count,
                    })
                })
                .collect(),
            with_stats: counts.with_stats,
            without_stats: counts.total.saturating_sub(counts.with_stats),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        FinishReason, LlmError, LlmResponse, MockCampaignRepo, MockClockPort, MockLlmPort,
        MockNpcRepo, NpcCounts,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use npcforge_domain::{Campaign, GeneratedNpc, GeneratedNpcPatch};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn idle_llm() -> MockLlmPort {
        let mut llm = MockLlmPort::new();
        llm.expect_supports_structured_output().return_const(true);
        llm
    }

    fn answering_llm(content: &'static str) -> MockLlmPort {
        let mut llm = idle_llm();
        llm.expect_generate().returning(move |_| {
            Ok(LlmResponse {
                content: content.to_string(),
                finish_reason: FinishReason::Stop,
                usage: None,
            })
        });
        llm
    }

    fn lifecycle(npcs: MockNpcRepo, campaigns: MockCampaignRepo, llm: MockLlmPort) -> NpcLifecycle {
        NpcLifecycle::new(
            Arc::new(npcs),
            Arc::new(campaigns),
            Arc::new(NpcGenerator::new(Arc::new(llm))),
            Arc::new(FixedClock(now())),
            Duration::days(30),
        )
    }

    fn record(owner: UserId) -> NpcRecord {
        let npc = GeneratedNpc {
            name: Some("Elda".to_string()),
            ..Default::default()
        }
        .with_provenance("prompt", "raw", now());
        NpcRecord::new(
            owner,
            GenerationRequest::new("merchant", "quest giver").unwrap(),
            GenerationSettings::default(),
            npc,
            None,
            now() - Duration::days(2),
        )
    }

    fn returning_record(npcs: &mut MockNpcRepo, stored: NpcRecord) {
        let id = stored.id;
        let owner = stored.created_by;
        npcs.expect_get_owned()
            .withf(move |i, o| *i == id && *o == owner)
            .returning(move |_, _| Ok(Some(stored.clone())));
    }

    #[tokio::test]
    async fn generate_persists_trimmed_request() {
        let owner = UserId::new();
        let mut npcs = MockNpcRepo::new();
        npcs.expect_save()
            .withf(move |r: &NpcRecord| {
                r.created_by == owner
                    && r.generation_request.role == "merchant"
                    && r.generation_request.story_fit == "quest giver"
            })
            .times(1)
            .returning(|_| Ok(()));

        let uc = lifecycle(
            npcs,
            MockCampaignRepo::new(),
            answering_llm(r#"{"name": "Elda", "race": "Human", "stats": null}"#),
        );
        let request = GenerationRequest {
            role: "  merchant ".to_string(),
            story_fit: " quest giver\n".to_string(),
            ..GenerationRequest::new("x", "y").unwrap()
        };

        let record = uc
            .generate(owner, request, GenerationSettings::default(), None)
            .await
            .unwrap();
        assert!(record.is_active);
        assert_eq!(record.generated_npc.name.as_deref(), Some("Elda"));
        assert_eq!(record.generated_npc.race.as_deref(), Some("Human"));
        assert!(record.generated_npc.stats.is_none());
        assert!(record.campaign_id.is_none());
        assert_eq!(record.created_at, now());
    }

    #[tokio::test]
    async fn generate_stamps_one_instant() {
        let mut clock = MockClockPort::new();
        let mut tick = now();
        clock.expect_now().returning(move || {
            tick += Duration::seconds(1);
            tick
        });
        let mut npcs = MockNpcRepo::new();
        npcs.expect_save().times(1).returning(|_| Ok(()));

        let uc = NpcLifecycle::new(
            Arc::new(npcs),
            Arc::new(MockCampaignRepo::new()),
            Arc::new(NpcGenerator::new(Arc::new(answering_llm(
                r#"{"name": "Elda", "stats": null}"#,
            )))),
            Arc::new(clock),
            Duration::days(30),
        );

        let record = uc
            .generate(
                UserId::new(),
                GenerationRequest::new("merchant", "quest giver").unwrap(),
                GenerationSettings::default(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(record.generated_npc.generation_timestamp, Some(record.created_at));
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn generate_rejects_blank_role_without_calling_provider() {
        let uc = lifecycle(MockNpcRepo::new(), MockCampaignRepo::new(), idle_llm());
        let request = GenerationRequest {
            role: "   ".to_string(),
            ..GenerationRequest::new("x", "quest giver").unwrap()
        };

        let result = uc
            .generate(UserId::new(), request, GenerationSettings::default(), None)
            .await;
        assert!(matches!(result, Err(NpcError::Validation(_))));
    }

    #[tokio::test]
    async fn generate_persists_nothing_when_provider_fails() {
        let mut llm = idle_llm();
        llm.expect_generate()
            .returning(|_| Err(LlmError::NotConfigured("OPENAI_API_KEY is not set".into())));
        let uc = lifecycle(MockNpcRepo::new(), MockCampaignRepo::new(), llm);

        let result = uc
            .generate(
                UserId::new(),
                GenerationRequest::new("merchant", "quest giver").unwrap(),
                GenerationSettings::default(),
                None,
            )
            .await;
        assert!(matches!(result, Err(NpcError::Configuration(_))));
    }

    #[tokio::test]
    async fn get_hides_trashed_and_foreign_records() {
        let owner = UserId::new();
        let mut trashed = record(owner);
        trashed.soft_delete(now(), Duration::days(30)).unwrap();
        let trashed_id = trashed.id;

        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, trashed);
        npcs.expect_get_owned().returning(|_, _| Ok(None));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        assert!(matches!(uc.get(trashed_id, owner).await, Err(NpcError::NotFound)));
        assert!(matches!(
            uc.get(trashed_id, UserId::new()).await,
            Err(NpcError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_strips_provenance_and_paginates() {
        let owner = UserId::new();
        let stored = record(owner);
        let mut npcs = MockNpcRepo::new();
        npcs.expect_list_active()
            .withf(|_, filter, page| {
                filter.role.as_deref() == Some("merch") && page.page == 2 && page.limit == 1
            })
            .returning(move |_, _, _| Ok((vec![stored.clone()], 3)));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        let page = uc
            .list(
                owner,
                NpcFilter {
                    campaign_id: None,
                    role: Some("merch".to_string()),
                },
                PageRequest::new(Some(2), Some(1)),
            )
            .await
            .unwrap();
        assert_eq!(page.npcs.len(), 1);
        assert!(page.npcs[0].generated_npc.ai_prompt_used.is_none());
        assert!(page.npcs[0].generated_npc.ai_response.is_none());
        assert_eq!(page.pagination.current, 2);
        assert_eq!(page.pagination.total, 3);
        assert!(page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[tokio::test]
    async fn update_merges_patch() {
        let owner = UserId::new();
        let stored = record(owner);
        let id = stored.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, stored);
        npcs.expect_save()
            .withf(|r: &NpcRecord| r.generated_npc.race.as_deref() == Some("Dwarf"))
            .times(1)
            .returning(|_| Ok(()));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        let patch = NpcPatch {
            generated_npc: Some(GeneratedNpcPatch {
                race: Some(Some("Dwarf".to_string())),
                ..Default::default()
            }),
            ..Default::default()
        };
        let updated = uc.update(id, owner, patch).await.unwrap();
        assert_eq!(updated.generated_npc.name.as_deref(), Some("Elda"));
        assert_eq!(updated.updated_at, now());
    }

    #[tokio::test]
    async fn update_rejects_blank_replacement_request() {
        let owner = UserId::new();
        let stored = record(owner);
        let id = stored.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, stored);
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        let patch = NpcPatch {
            generation_request: Some(GenerationRequest {
                role: " ".to_string(),
                ..GenerationRequest::new("x", "y").unwrap()
            }),
            ..Default::default()
        };
        assert!(matches!(
            uc.update(id, owner, patch).await,
            Err(NpcError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn soft_delete_opens_thirty_day_window() {
        let owner = UserId::new();
        let stored = record(owner);
        let id = stored.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, stored);
        npcs.expect_save().times(1).returning(|_| Ok(()));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        let deleted = uc.soft_delete(id, owner).await.unwrap();
        assert!(!deleted.is_active);
        assert_eq!(deleted.deleted_at, Some(now()));
        assert_eq!(deleted.permanent_delete_at, Some(now() + Duration::days(30)));
    }

    #[tokio::test]
    async fn hard_delete_removes_active_record_only() {
        let owner = UserId::new();
        let stored = record(owner);
        let id = stored.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, stored);
        npcs.expect_delete()
            .withf(move |i| *i == id)
            .times(1)
            .returning(|_| Ok(true));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());
        uc.hard_delete(id, owner).await.unwrap();

        let mut trashed = record(owner);
        trashed.soft_delete(now(), Duration::days(30)).unwrap();
        let trashed_id = trashed.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, trashed);
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());
        assert!(matches!(
            uc.hard_delete(trashed_id, owner).await,
            Err(NpcError::NotFound)
        ));
    }

    #[tokio::test]
    async fn restore_inside_window_clears_deletion() {
        let owner = UserId::new();
        let mut trashed = record(owner);
        trashed
            .soft_delete(now() - Duration::days(29), Duration::days(30))
            .unwrap();
        let id = trashed.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, trashed);
        npcs.expect_save()
            .withf(|r: &NpcRecord| r.is_active)
            .times(1)
            .returning(|_| Ok(()));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        let restored = uc.restore(id, owner).await.unwrap();
        assert!(restored.is_active);
        assert!(restored.deleted_at.is_none());
        assert!(restored.permanent_delete_at.is_none());
    }

    #[tokio::test]
    async fn restore_at_deadline_is_expired() {
        let owner = UserId::new();
        let mut trashed = record(owner);
        trashed
            .soft_delete(now() - Duration::days(30), Duration::days(30))
            .unwrap();
        let id = trashed.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, trashed);
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        assert!(matches!(uc.restore(id, owner).await, Err(NpcError::Expired)));
    }

    #[tokio::test]
    async fn restore_of_active_record_is_not_found() {
        let owner = UserId::new();
        let stored = record(owner);
        let id = stored.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, stored);
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        assert!(matches!(uc.restore(id, owner).await, Err(NpcError::NotFound)));
    }

    #[tokio::test]
    async fn regenerate_replaces_generated_npc_in_place() {
        let owner = UserId::new();
        let stored = record(owner);
        let id = stored.id;
        let created_at = stored.created_at;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, stored);
        npcs.expect_save().times(1).returning(|_| Ok(()));
        let uc = lifecycle(
            npcs,
            MockCampaignRepo::new(),
            answering_llm(r#"{"name": "Borin", "race": "Dwarf"}"#),
        );

        let regenerated = uc.regenerate(id, owner).await.unwrap();
        assert_eq!(regenerated.id, id);
        assert_eq!(regenerated.created_at, created_at);
        assert_eq!(regenerated.generated_npc.name.as_deref(), Some("Borin"));
        assert_eq!(regenerated.generation_request.role, "merchant");
    }

    #[tokio::test]
    async fn cleanup_passes_current_time() {
        let mut npcs = MockNpcRepo::new();
        npcs.expect_delete_expired()
            .withf(|at| *at == now())
            .times(1)
            .returning(|_| Ok(4));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        assert_eq!(uc.cleanup_expired().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn search_requires_query_and_lowercases_it() {
        let owner = UserId::new();
        let mut npcs = MockNpcRepo::new();
        npcs.expect_search()
            .times(1)
            .returning(|_, query, _, _| {
                assert_eq!(query, "elda");
                Ok((Vec::new(), 0))
            });
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        assert!(matches!(
            uc.search(owner, "   ", None, PageRequest::default()).await,
            Err(NpcError::Validation(_))
        ));
        let page = uc
            .search(owner, " ELDA ", None, PageRequest::default())
            .await
            .unwrap();
        assert!(page.npcs.is_empty());
        assert_eq!(page.pagination.total, 0);
    }

    #[tokio::test]
    async fn toggle_favorite_flips_tag() {
        let owner = UserId::new();
        let stored = record(owner);
        let id = stored.id;
        let mut npcs = MockNpcRepo::new();
        returning_record(&mut npcs, stored);
        npcs.expect_save().times(1).returning(|_| Ok(()));
        let uc = lifecycle(npcs, MockCampaignRepo::new(), idle_llm());

        let toggled = uc.toggle_favorite(id, owner).await.unwrap();
        assert!(toggled.is_favorite);
        assert_eq!(toggled.tags, vec!["favorite"]);
    }

    #[tokio::test]
    async fn campaign_listing_includes_campaign_name() {
        let owner = UserId::new();
        let campaign = Campaign::new(owner, "Lost Mine", None, now()).unwrap();
        let campaign_id = campaign.id;
        let mut stored = record(owner);
        stored.campaign_id = Some(campaign_id);

        let mut npcs = MockNpcRepo::new();
        npcs.expect_list_by_campaign()
            .returning(move |_, _| Ok(vec![stored.clone()]));
        let mut campaigns = MockCampaignRepo::new();
        campaigns
            .expect_get_owned()
            .returning(move |_, _| Ok(Some(campaign.clone())));
        let uc = lifecycle(npcs, campaigns, idle_llm());

        let listed = uc.list_by_campaign(owner, campaign_id).await.unwrap();
        assert_eq!(listed.campaign_name.as_deref(), Some("Lost Mine"));
        assert_eq!(listed.npcs.len(), 1);
        assert_eq!(listed.npcs[0].name.as_deref(), Some("Elda"));
        assert_eq!(listed.npcs[0].role, "merchant");
    }

    #[tokio::test]
    async fn stats_summary_names_campaigns() {
        let owner = UserId::new();
        let campaign = Campaign::new(owner, "Lost Mine", None, now()).unwrap();
        let campaign_id = campaign.id;
        let missing_campaign = CampaignId::new();

        let mut npcs = MockNpcRepo::new();
        npcs.expect_count_summary().returning(move |_| {
            Ok(NpcCounts {
                total: 5,
                by_role: vec![("merchant".to_string(), 3), ("guard".to_string(), 2)],
                by_campaign: vec![(campaign_id, 3), (missing_campaign, 1)],
                with_stats: 2,
            })
        });
        let mut campaigns = MockCampaignRepo::new();
        campaigns
            .expect_list_for_owner()
            .returning(move |_| Ok(vec![campaign.clone()]));
        let uc = lifecycle(npcs, campaigns, idle_llm());

        let summary = uc.stats_summary(owner).await.unwrap();
        assert_eq!(summary.total_npcs, 5);
        assert_eq!(summary.with_stats, 2);
        assert_eq!(summary.without_stats, 3);
        assert_eq!(summary.by_role[0].role, "merchant");
        assert_eq!(summary.by_campaign.len(), 1);
        assert_eq!(summary.by_campaign[0].campaign_id, campaign_id);
        assert_eq!(summary.by_campaign[0].campaign_name, "Lost Mine");
        assert_eq!(summary.by_campaign[0].count, 3);
    }
}
