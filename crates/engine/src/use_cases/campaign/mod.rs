//! Campaign use cases.

use std::sync::Arc;

use npcforge_domain::{Campaign, CampaignId, DomainError, UserId};

use crate::infrastructure::ports::{CampaignRepo, ClockPort, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Campaign not found")]
    NotFound,
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for CampaignError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg)
            | DomainError::InvalidId(msg)
            | DomainError::Parse(msg)
            | DomainError::InvalidStateTransition(msg) => CampaignError::InvalidInput(msg),
        }
    }
}

/// Container for campaign use cases.
pub struct CampaignUseCases {
    campaigns: Arc<dyn CampaignRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CampaignUseCases {
    pub fn new(campaigns: Arc<dyn CampaignRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { campaigns, clock }
    }

    pub async fn create(
        &self,
        owner: UserId,
        name: &str,
        description: Option<String>,
    ) -> Result<Campaign, CampaignError> {
        let campaign = Campaign::new(owner, name, description, self.clock.now())?;
        self.campaigns.save(&campaign).await?;

        tracing::info!(campaign_id = %campaign.id, user_id = %owner, "Campaign created");
        Ok(campaign)
    }

    pub async fn get(&self, owner: UserId, id: CampaignId) -> Result<Campaign, CampaignError> {
        self.campaigns
            .get_owned(id, owner)
            .await?
            .ok_or(CampaignError::NotFound)
    }

    /// Newest first.
    pub async fn list(&self, owner: UserId) -> Result<Vec<Campaign>, CampaignError> {
        Ok(self.campaigns.list_for_owner(owner).await?)
    }
}
