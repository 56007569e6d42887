//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::config::TrashConfig;
use crate::infrastructure::ports::{CampaignRepo, ClockPort, LlmPort, NpcRepo};
use crate::use_cases;
use crate::use_cases::npc::{NpcGenerator, NpcLifecycle};

/// Main application state.
///
/// Holds the use cases; passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub npc: use_cases::NpcUseCases,
    pub campaign: use_cases::CampaignUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        npc_repo: Arc<dyn NpcRepo>,
        campaign_repo: Arc<dyn CampaignRepo>,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        trash: &TrashConfig,
    ) -> Self {
        let generator = Arc::new(NpcGenerator::new(llm));
        tracing::info!(output_mode = ?generator.output_mode(), "NPC generator ready");

        let lifecycle = Arc::new(NpcLifecycle::new(
            npc_repo,
            campaign_repo.clone(),
            generator,
            clock.clone(),
            trash.retention(),
        ));

        let use_cases = UseCases {
            npc: use_cases::NpcUseCases::new(lifecycle),
            campaign: use_cases::CampaignUseCases::new(campaign_repo, clock),
        };

        Self { use_cases }
    }
}
