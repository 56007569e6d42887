//! Response envelope and read models returned by the HTTP routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use npcforge_domain::{
    CampaignId, GeneratedNpc, GenerationRequest, GenerationSettings, NpcId, NpcRecord,
};

// =============================================================================
// Envelope
// =============================================================================

/// `{ success, message?, data? }` wrapper used by every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// `total` is the number of pages, not the number of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current: u32,
    pub total: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationInfo {
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        let limit = u64::from(limit.max(1));
        let total = u32::try_from(total_items.div_ceil(limit)).unwrap_or(u32::MAX);
        Self {
            current: page,
            total,
            has_next: page < total,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcPage {
    pub npcs: Vec<NpcRecord>,
    pub pagination: PaginationInfo,
}

// =============================================================================
// NPC read models
// =============================================================================

/// Payload of a successful generation or regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub id: NpcId,
    pub npc: GeneratedNpc,
    pub request: GenerationRequest,
    pub settings: GenerationSettings,
    pub campaign_id: Option<CampaignId>,
}

impl From<NpcRecord> for GenerationResult {
    fn from(record: NpcRecord) -> Self {
        Self {
            id: record.id,
            npc: record.generated_npc,
            request: record.generation_request,
            settings: record.generation_settings,
            campaign_id: record.campaign_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggled {
    pub id: NpcId,
    pub is_favorite: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub deleted_count: u64,
}

/// Compact row used by the per-campaign listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignNpcSummary {
    pub id: NpcId,
    pub name: Option<String>,
    pub race: Option<String>,
    pub occupation: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&NpcRecord> for CampaignNpcSummary {
    fn from(record: &NpcRecord) -> Self {
        Self {
            id: record.id,
            name: record.generated_npc.name.clone(),
            race: record.generated_npc.race.clone(),
            occupation: record.generated_npc.occupation.clone(),
            role: record.generation_request.role.clone(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignNpcs {
    pub campaign_id: CampaignId,
    pub campaign_name: Option<String>,
    pub npcs: Vec<CampaignNpcSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCount {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcStatsSummary {
    pub total_npcs: u64,
    pub by_role: Vec<RoleCount>,
    pub by_campaign: Vec<CampaignCount>,
    pub with_stats: u64,
    pub without_stats: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
