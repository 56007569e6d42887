//! HTTP routes.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use npcforge_domain::{CampaignId, DomainError, NpcId, NpcPatch};
use npcforge_shared::{
    ApiResponse, CleanupReport, CreateCampaignBody, DeleteQuery, GenerateNpcBody,
    GenerationResult, HealthStatus, ListNpcsQuery, PageQuery, SearchQuery,
};

use super::auth::Auth;
use crate::app::App;
use crate::infrastructure::ports::{NpcFilter, PageRequest};
use crate::use_cases::{CampaignError, NpcError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/npc-generator", npc_routes())
        .route("/api/campaigns", get(list_campaigns).post(create_campaign))
        .route("/api/campaigns/{id}", get(get_campaign))
}

fn npc_routes() -> Router<Arc<App>> {
    Router::new()
        .route("/generate", post(generate_npc))
        .route("/my-npcs", get(list_npcs))
        .route("/trash/deleted", get(list_deleted))
        .route("/admin/cleanup", post(cleanup_expired))
        .route("/search", get(search_npcs))
        .route("/stats/summary", get(stats_summary))
        .route("/campaign/{campaign_id}", get(list_by_campaign))
        .route("/{id}", get(get_npc).put(update_npc).delete(delete_npc))
        .route("/{id}/restore", post(restore_npc))
        .route("/{id}/regenerate", post(regenerate_npc))
        .route("/{id}/favorite", post(toggle_favorite))
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {what} id")))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(q)| q)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn health() -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::ok(HealthStatus::ok()))
}

// =============================================================================
// NPC generation and lifecycle
// =============================================================================

async fn generate_npc(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    payload: Result<Json<GenerateNpcBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<GenerationResult>>), ApiError> {
    let (request, settings, campaign_id) = json_body(payload)?.into_parts()?;
    let record = app
        .use_cases
        .npc
        .lifecycle
        .generate(user.user_id, request, settings, campaign_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "NPC generated successfully",
            GenerationResult::from(record),
        )),
    ))
}

async fn list_npcs(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    params: Result<Query<ListNpcsQuery>, QueryRejection>,
) -> ApiResult<npcforge_shared::NpcPage> {
    let params = query(params)?;
    let filter = NpcFilter {
        campaign_id: params.campaign_id.map(CampaignId::from_uuid),
        role: params
            .role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
    };
    let page = app
        .use_cases
        .npc
        .lifecycle
        .list(user.user_id, filter, PageRequest::new(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn get_npc(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult<npcforge_domain::NpcRecord> {
    let id: NpcId = parse_id(&id, "NPC")?;
    let record = app.use_cases.npc.lifecycle.get(id, user.user_id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

async fn update_npc(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(id): Path<String>,
    payload: Result<Json<NpcPatch>, JsonRejection>,
) -> ApiResult<npcforge_domain::NpcRecord> {
    let id: NpcId = parse_id(&id, "NPC")?;
    let patch = json_body(payload)?;
    let record = app
        .use_cases
        .npc
        .lifecycle
        .update(id, user.user_id, patch)
        .await?;
    Ok(Json(ApiResponse::ok_with_message(
        "NPC updated successfully",
        record,
    )))
}

async fn delete_npc(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(id): Path<String>,
    params: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<()> {
    let id: NpcId = parse_id(&id, "NPC")?;
    let lifecycle = &app.use_cases.npc.lifecycle;

    if query(params)?.permanent {
        lifecycle.hard_delete(id, user.user_id).await?;
        return Ok(Json(ApiResponse::message("NPC permanently deleted")));
    }

    let record = lifecycle.soft_delete(id, user.user_id).await?;
    let message = match record.permanent_delete_at {
        Some(deadline) => format!(
            "NPC moved to trash. It can be restored until {}",
            deadline.to_rfc3339()
        ),
        None => "NPC moved to trash".to_string(),
    };
    Ok(Json(ApiResponse::message(message)))
}

async fn list_deleted(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    params: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<npcforge_shared::NpcPage> {
    let params = query(params)?;
    let page = app
        .use_cases
        .npc
        .lifecycle
        .list_deleted(user.user_id, PageRequest::new(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn restore_npc(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult<npcforge_domain::NpcRecord> {
    let id: NpcId = parse_id(&id, "NPC")?;
    let record = app.use_cases.npc.lifecycle.restore(id, user.user_id).await?;
    Ok(Json(ApiResponse::ok_with_message(
        "NPC restored successfully",
        record,
    )))
}

async fn regenerate_npc(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult<GenerationResult> {
    let id: NpcId = parse_id(&id, "NPC")?;
    let record = app
        .use_cases
        .npc
        .lifecycle
        .regenerate(id, user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok_with_message(
        "NPC regenerated successfully",
        GenerationResult::from(record),
    )))
}

async fn cleanup_expired(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
) -> ApiResult<CleanupReport> {
    user.require_admin()?;
    let deleted_count = app.use_cases.npc.lifecycle.cleanup_expired().await?;
    tracing::info!(user_id = %user.user_id, deleted_count, "Manual NPC cleanup");
    Ok(Json(ApiResponse::ok_with_message(
        format!("Cleaned up {deleted_count} expired NPCs"),
        CleanupReport { deleted_count },
    )))
}

async fn list_by_campaign(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(campaign_id): Path<String>,
) -> ApiResult<npcforge_shared::CampaignNpcs> {
    let campaign_id: CampaignId = parse_id(&campaign_id, "campaign")?;
    let npcs = app
        .use_cases
        .npc
        .lifecycle
        .list_by_campaign(user.user_id, campaign_id)
        .await?;
    Ok(Json(ApiResponse::ok(npcs)))
}

async fn search_npcs(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<npcforge_shared::NpcPage> {
    let params = query(params)?;
    let page = app
        .use_cases
        .npc
        .lifecycle
        .search(
            user.user_id,
            &params.q,
            params.campaign_id.map(CampaignId::from_uuid),
            PageRequest::new(params.page, params.limit),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

async fn toggle_favorite(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult<npcforge_shared::FavoriteToggled> {
    let id: NpcId = parse_id(&id, "NPC")?;
    let toggled = app
        .use_cases
        .npc
        .lifecycle
        .toggle_favorite(id, user.user_id)
        .await?;
    let message = if toggled.is_favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(Json(ApiResponse::ok_with_message(message, toggled)))
}

async fn stats_summary(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
) -> ApiResult<npcforge_shared::NpcStatsSummary> {
    let summary = app
        .use_cases
        .npc
        .lifecycle
        .stats_summary(user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

// =============================================================================
// Campaigns
// =============================================================================

async fn create_campaign(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    payload: Result<Json<CreateCampaignBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<npcforge_domain::Campaign>>), ApiError> {
    let body = json_body(payload)?;
    let campaign = app
        .use_cases
        .campaign
        .create(user.user_id, &body.name, body.description)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message("Campaign created", campaign)),
    ))
}

async fn list_campaigns(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
) -> ApiResult<Vec<npcforge_domain::Campaign>> {
    let campaigns = app.use_cases.campaign.list(user.user_id).await?;
    Ok(Json(ApiResponse::ok(campaigns)))
}

async fn get_campaign(
    State(app): State<Arc<App>>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult<npcforge_domain::Campaign> {
    let id: CampaignId = parse_id(&id, "campaign")?;
    let campaign = app.use_cases.campaign.get(user.user_id, id).await?;
    Ok(Json(ApiResponse::ok(campaign)))
}

// =============================================================================
// Errors
// =============================================================================

/// Route-level error. Messages are stable; provider and database details only go to the log.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    Forbidden,
    NotFound,
    CampaignNotFound,
    Expired,
    GenerationNotConfigured,
    GenerationFailed,
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound | ApiError::CampaignNotFound => StatusCode::NOT_FOUND,
            ApiError::Expired => StatusCode::GONE,
            ApiError::GenerationNotConfigured
            | ApiError::GenerationFailed
            | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unauthorized => "Authentication required".to_string(),
            ApiError::Forbidden => "Admin access required".to_string(),
            ApiError::NotFound => "NPC not found".to_string(),
            ApiError::CampaignNotFound => "Campaign not found".to_string(),
            ApiError::Expired => "NPC can no longer be restored".to_string(),
            ApiError::GenerationNotConfigured => "NPC generation is not configured".to_string(),
            ApiError::GenerationFailed => "Failed to generate NPC".to_string(),
            ApiError::Internal => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::error(self.message()))).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        NpcError::from(e).into()
    }
}

impl From<NpcError> for ApiError {
    fn from(e: NpcError) -> Self {
        match e {
            NpcError::Validation(msg) => ApiError::BadRequest(msg),
            NpcError::NotFound => ApiError::NotFound,
            NpcError::Expired => ApiError::Expired,
            NpcError::Configuration(msg) => {
                tracing::error!(error = %msg, "NPC generation is not configured");
                ApiError::GenerationNotConfigured
            }
            NpcError::Provider(msg) => {
                tracing::warn!(error = %msg, "NPC generation provider failed");
                ApiError::GenerationFailed
            }
            NpcError::Repo(e) => {
                tracing::error!(error = %e, "NPC repository failure");
                ApiError::Internal
            }
        }
    }
}

impl From<CampaignError> for ApiError {
    fn from(e: CampaignError) -> Self {
        match e {
            CampaignError::InvalidInput(msg) => ApiError::BadRequest(msg),
            CampaignError::NotFound => ApiError::CampaignNotFound,
            CampaignError::Repo(e) => {
                tracing::error!(error = %e, "Campaign repository failure");
                ApiError::Internal
            }
        }
    }
}
