//! Construction of the configured generation service

use super::gemini::IMPLICIT_KEY;
use super::{GeminiService, LlmError, LlmResponse, LlmService, LoggingService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the generation service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Gateway URL; when set the gateway handles authentication
    pub gateway: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            gateway: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl LlmConfig {
    /// Build from an arbitrary variable lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: var("GEMINI_API_KEY"),
            gateway: var("LLM_GATEWAY"),
            model: var("SAATHI_MODEL").unwrap_or(defaults.model),
            request_timeout: var("SAATHI_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map_or(defaults.request_timeout, Duration::from_secs),
        }
    }

    /// Whether a real service can be built from this configuration
    pub fn is_configured(&self) -> bool {
        self.gateway.is_some() || self.api_key.is_some()
    }
}

/// Create the service for this configuration, wrapped with logging.
///
/// Without a credential the returned service fails every call, so the
/// session degrades to its failure reply instead of refusing to start.
pub fn create_service(config: &LlmConfig) -> Arc<dyn LlmService> {
    let api_key = if config.gateway.is_some() {
        Some(IMPLICIT_KEY.to_string())
    } else {
        config.api_key.clone()
    };

    let inner: Arc<dyn LlmService> = match api_key {
        Some(key) => match GeminiService::new(
            key,
            config.model.clone(),
            config.gateway.as_deref(),
        ) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create Gemini service");
                Arc::new(UnconfiguredService::new(&config.model, e.message))
            }
        },
        None => Arc::new(UnconfiguredService::new(
            &config.model,
            "No API key configured. Set GEMINI_API_KEY or LLM_GATEWAY.",
        )),
    };

    Arc::new(LoggingService::new(inner))
}

/// Stand-in service used when no usable credential is available
pub struct UnconfiguredService {
    model_id: String,
    reason: String,
}

impl UnconfiguredService {
    pub fn new(model_id: &str, reason: impl Into<String>) -> Self {
        Self {
            model_id: model_id.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LlmService for UnconfiguredService {
    async fn generate(&self, _prompt: &str) -> Result<LlmResponse, LlmError> {
        Err(LlmError::auth(self.reason.clone()))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
