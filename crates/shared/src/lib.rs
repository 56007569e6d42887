//! NPC Forge Shared - Wire types for the HTTP API
//!
//! Request bodies and query strings the routes accept, and the envelope and read
//! models they return. Nothing here performs I/O.
//!
//! # Design Principles
//!
//! 1. **No business logic** - request types only convert into domain vocabulary
//! 2. **Strict inputs** - JSON bodies reject unknown fields
//! 3. **camelCase on the wire**

pub mod requests;
pub mod responses;

pub use requests::{
    CreateCampaignBody, DeleteQuery, GenerateNpcBody, ListNpcsQuery, PageQuery, SearchQuery,
};
pub use responses::{
    ApiResponse, CampaignCount, CampaignNpcSummary, CampaignNpcs, CleanupReport,
    FavoriteToggled, GenerationResult, HealthStatus, NpcPage, NpcStatsSummary, PaginationInfo,
    RoleCount,
};
