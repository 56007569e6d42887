//! Generation pipeline: prompt, provider call, normalization.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use npcforge_domain::{CreativityLevel, GeneratedNpc, GenerationRequest, GenerationSettings};

use super::normalizer::{normalizer_for, NormalizeError, ResponseNormalizer};
use super::prompt::{build_npc_prompt, OutputMode, SYSTEM_PROMPT};
use super::schema::npc_schema;
use super::NpcError;
use crate::infrastructure::ports::{ChatMessage, LlmError, LlmPort, LlmRequest};

const MAX_TOKENS_WITH_STATS: u32 = 2000;
const MAX_TOKENS_WITHOUT_STATS: u32 = 1200;

impl From<LlmError> for NpcError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured(msg) => NpcError::Configuration(msg),
            other => NpcError::Provider(other.to_string()),
        }
    }
}

impl From<NormalizeError> for NpcError {
    fn from(err: NormalizeError) -> Self {
        NpcError::Provider(err.to_string())
    }
}

/// Wraps the LLM port with the NPC prompt, token budget and output strategy.
pub struct NpcGenerator {
    llm: Arc<dyn LlmPort>,
    normalizer: Arc<dyn ResponseNormalizer>,
    structured: bool,
}

impl NpcGenerator {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        let structured = llm.supports_structured_output();
        Self {
            llm,
            normalizer: normalizer_for(structured),
            structured,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        self.normalizer.output_mode()
    }

    /// Send one prompt to the provider and return its raw text.
    pub async fn complete(
        &self,
        prompt: &str,
        include_stats: bool,
        creativity: CreativityLevel,
    ) -> Result<String, NpcError> {
        let max_tokens = if include_stats {
            MAX_TOKENS_WITH_STATS
        } else {
            MAX_TOKENS_WITHOUT_STATS
        };

        let mut request = LlmRequest::new(vec![ChatMessage::user(prompt)])
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(creativity.temperature())
            .with_max_tokens(Some(max_tokens));
        if self.structured {
            request = request.with_response_format(npc_schema(include_stats));
        }

        let response = self.llm.generate(request).await?;
        if response.content.trim().is_empty() {
            return Err(NpcError::Provider("provider returned no content".to_string()));
        }

        tracing::debug!(
            finish_reason = ?response.finish_reason,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "NPC generation completed"
        );
        Ok(response.content)
    }

    /// Full pipeline for one request. The result carries prompt and raw output as provenance.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        settings: &GenerationSettings,
        now: DateTime<Utc>,
    ) -> Result<GeneratedNpc, NpcError> {
        let prompt = build_npc_prompt(request, settings, self.output_mode());
        let raw = self
            .complete(&prompt, request.include_stats, settings.creativity_level)
            .await?;
        let npc = self.normalizer.normalize(&raw, request.include_stats)?;
        Ok(npc.with_provenance(prompt, raw, now))
    }
}
