//! AI gateway: prompts the generation service and recovers typed records.
//!
//! Discovery is tolerant: anything short of a transport or service failure
//! yields a (possibly empty) list. Drafting is strict: a response that does
//! not carry all four draft fields is a [`GatewayError::Draft`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{PersonaConfig, ROLE_DISCOVERY, ROLE_OUTREACH};
use crate::model::{OutreachDraft, Prospect, ProspectId, SearchFilters};
use crate::providers::router::ModelRouter;
use crate::providers::{CompletionRequest, GroundingHint, StopReason};

pub mod prompts;
pub mod repair;

pub use prompts::DiscoverySettings;

/// Output budget for a draft response.
const DRAFT_MAX_TOKENS: u32 = 2048;

/// Errors surfaced by the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Filters were unusable; the service was not called.
    #[error("invalid discovery request: {0}")]
    InvalidRequest(String),

    /// The service could not be asked (auth, quota, timeout, transport).
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// A single draft could not be produced.
    #[error("draft failed for prospect {prospect_id}: {reason}")]
    Draft {
        /// Prospect the draft was for.
        prospect_id: ProspectId,
        /// What went wrong.
        reason: String,
    },
}

/// What the orchestrators need from the gateway.
#[async_trait]
pub trait ProspectGateway: Send + Sync {
    /// Discover prospects for the given filters.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Discovery`] when the service could not be reached;
    /// an empty `Ok` when it answered with nothing usable.
    async fn discover(&self, filters: &SearchFilters) -> Result<Vec<Prospect>, GatewayError>;

    /// Draft outreach for one prospect.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Draft`] naming the prospect on any failure.
    async fn draft(&self, prospect: &Prospect) -> Result<OutreachDraft, GatewayError>;
}

/// Gateway backed by the configured generation-service providers.
#[derive(Debug, Clone)]
pub struct AiGateway {
    router: Arc<ModelRouter>,
    persona: PersonaConfig,
    settings: DiscoverySettings,
}

impl AiGateway {
    /// Create a gateway.
    pub fn new(router: Arc<ModelRouter>, persona: PersonaConfig, settings: DiscoverySettings) -> Self {
        Self {
            router,
            persona,
            settings,
        }
    }

    /// Ask the service for businesses matching the filters.
    ///
    /// # Errors
    ///
    /// [`GatewayError::InvalidRequest`] for blank industry or location,
    /// [`GatewayError::Discovery`] when the service call fails.
    pub async fn discover_prospects(
        &self,
        industry: &str,
        location: &str,
        pain_points: &[String],
    ) -> Result<Vec<Prospect>, GatewayError> {
        if industry.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("industry is empty".to_owned()));
        }
        if location.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("location is empty".to_owned()));
        }
        let filters = SearchFilters {
            industry: industry.trim().to_owned(),
            location: location.trim().to_owned(),
            pain_points: pain_points.to_vec(),
        };

        let provider = self
            .router
            .resolve(Some(ROLE_DISCOVERY))
            .map_err(|e| GatewayError::Discovery(e.to_string()))?;

        let mut request = CompletionRequest::prompt(prompts::discovery_prompt(
            &filters,
            &self.persona,
            &self.settings,
        ));
        request.temperature = Some(self.settings.temperature);
        if provider.supports_grounding(GroundingHint::Maps) {
            request.grounding.push(GroundingHint::Maps);
        }

        info!(
            model = %provider.model_id(),
            industry = %filters.industry,
            location = %filters.location,
            "discovering prospects"
        );

        let response = provider.complete(request).await.map_err(|e| {
            warn!(error = %e, "discovery call failed");
            GatewayError::Discovery(e.to_string())
        })?;
        debug!(
            text_len = response.text.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "discovery response received"
        );
        if response.stop_reason != StopReason::EndTurn {
            warn!(
                stop_reason = ?response.stop_reason,
                text_len = response.text.len(),
                "discovery response was cut short"
            );
        }

        let prospects = repair::parse_prospects(&response.text, &filters);
        info!(count = prospects.len(), "discovery complete");
        Ok(prospects)
    }

    /// Draft persona-bound outreach for one prospect.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Draft`] when the call fails or the response lacks any
    /// of the four required fields.
    pub async fn draft_outreach(&self, prospect: &Prospect) -> Result<OutreachDraft, GatewayError> {
        let fail = |reason: String| GatewayError::Draft {
            prospect_id: prospect.id().clone(),
            reason,
        };

        let provider = self
            .router
            .resolve(Some(ROLE_OUTREACH))
            .map_err(|e| fail(e.to_string()))?;

        let mut request =
            CompletionRequest::prompt(prompts::outreach_prompt(prospect, &self.persona));
        request.system = Some(prompts::outreach_system(&self.persona));
        if provider.supports_structured_output() {
            request.response_schema = Some(prompts::outreach_schema());
        }
        request.max_tokens = Some(DRAFT_MAX_TOKENS);

        debug!(
            prospect_id = %prospect.id(),
            model = %provider.model_id(),
            "drafting outreach"
        );

        let response = provider
            .complete(request)
            .await
            .map_err(|e| fail(e.to_string()))?;

        repair::parse_draft(&response.text).map_err(|reason| {
            if response.stop_reason == StopReason::EndTurn {
                fail(reason)
            } else {
                warn!(
                    prospect_id = %prospect.id(),
                    stop_reason = ?response.stop_reason,
                    "draft response was cut short"
                );
                fail(format!("{reason} (stopped early: {:?})", response.stop_reason))
            }
        })
    }
}

#[async_trait]
impl ProspectGateway for AiGateway {
    async fn discover(&self, filters: &SearchFilters) -> Result<Vec<Prospect>, GatewayError> {
        self.discover_prospects(&filters.industry, &filters.location, &filters.pain_points)
            .await
    }

    async fn draft(&self, prospect: &Prospect) -> Result<OutreachDraft, GatewayError> {
        self.draft_outreach(prospect).await
    }
}
