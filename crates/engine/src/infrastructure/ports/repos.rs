//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use npcforge_domain::{Campaign, CampaignId, NpcId, NpcRecord, UserId};

use super::error::RepoError;

// =============================================================================
// Query types
// =============================================================================

/// 1-based page with a bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Missing values fall back to page 1 / 10 items; out-of-range values are clamped.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Optional filters for the active NPC listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpcFilter {
    pub campaign_id: Option<CampaignId>,
    /// Case-insensitive substring of the requested role
    pub role: Option<String>,
}

/// Aggregate counts over a user's active NPCs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpcCounts {
    pub total: u64,
    /// Most common roles first, at most ten
    pub by_role: Vec<(String, u64)>,
    /// Only NPCs assigned to a campaign
    pub by_campaign: Vec<(CampaignId, u64)>,
    pub with_stats: u64,
}

// =============================================================================
// Database Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NpcRepo: Send + Sync {
    /// Fetch a record owned by `owner`, active or in the trash.
    async fn get_owned(&self, id: NpcId, owner: UserId) -> Result<Option<NpcRecord>, RepoError>;

    /// Insert or replace.
    async fn save(&self, record: &NpcRecord) -> Result<(), RepoError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: NpcId) -> Result<bool, RepoError>;

    /// Active records, newest first, plus the total match count.
    async fn list_active(
        &self,
        owner: UserId,
        filter: &NpcFilter,
        page: PageRequest,
    ) -> Result<(Vec<NpcRecord>, u64), RepoError>;

    /// Trashed records still restorable at `now`, most recently deleted first.
    async fn list_deleted(
        &self,
        owner: UserId,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<(Vec<NpcRecord>, u64), RepoError>;

    async fn list_by_campaign(
        &self,
        owner: UserId,
        campaign_id: CampaignId,
    ) -> Result<Vec<NpcRecord>, RepoError>;

    /// Case-insensitive substring search over name, role, race, occupation and location.
    async fn search(
        &self,
        owner: UserId,
        query: &str,
        campaign_id: Option<CampaignId>,
        page: PageRequest,
    ) -> Result<(Vec<NpcRecord>, u64), RepoError>;

    /// Remove every trashed record whose restore deadline is at or before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;

    async fn count_summary(&self, owner: UserId) -> Result<NpcCounts, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepo: Send + Sync {
    async fn save(&self, campaign: &Campaign) -> Result<(), RepoError>;
    async fn get_owned(
        &self,
        id: CampaignId,
        owner: UserId,
    ) -> Result<Option<Campaign>, RepoError>;
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Campaign>, RepoError>;
}
