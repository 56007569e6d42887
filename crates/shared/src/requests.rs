//! Request bodies and query strings accepted by the HTTP routes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use npcforge_domain::{
    CampaignId, DesiredTraits, DomainError, GenerationRequest, GenerationSettings,
};

/// Body of `POST /api/npc-generator/generate`.
///
/// Generation fields sit at the top level next to the optional campaign and
/// style settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateNpcBody {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub story_fit: String,
    #[serde(default)]
    pub desired_traits: Option<DesiredTraits>,
    #[serde(default)]
    pub include_stats: bool,
    #[serde(default)]
    pub campaign_context: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
    #[serde(default)]
    pub generation_settings: Option<GenerationSettings>,
}

impl GenerateNpcBody {
    /// Split the body into validated domain parts.
    pub fn into_parts(
        self,
    ) -> Result<(GenerationRequest, GenerationSettings, Option<CampaignId>), DomainError> {
        let request = GenerationRequest::new(self.role, self.story_fit)?
            .with_desired_traits(self.desired_traits.unwrap_or_default())
            .with_stats(self.include_stats)
            .with_campaign_context(self.campaign_context);

        Ok((
            request,
            self.generation_settings.unwrap_or_default(),
            self.campaign_id.map(CampaignId::from_uuid),
        ))
    }
}

/// `?page=&limit=`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Query string of `GET /my-npcs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNpcsQuery {
    pub campaign_id: Option<Uuid>,
    pub role: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Query string of `GET /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub campaign_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Query string of `DELETE /{id}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub permanent: bool,
}

/// Body of `POST /api/campaigns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCampaignBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
