//! Campaign entity - the minimal record NPCs can be associated with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::clean_text;
use crate::{CampaignId, DomainError, UserId};

/// A campaign owned by a Dungeon Master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub owner_id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub const MAX_NAME_LEN: usize = 100;

    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Campaign name cannot be empty"));
        }
        if name.chars().count() > Self::MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "Campaign name cannot exceed {} characters",
                Self::MAX_NAME_LEN
            )));
        }

        Ok(Self {
            id: CampaignId::new(),
            owner_id,
            name,
            description: clean_text(description),
            created_at: now,
        })
    }
}
