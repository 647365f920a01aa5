//! Model router resolving providers by role and default settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::warn;

use crate::config::{all_model_specs, ModelsConfig};
use crate::credentials::Credentials;

use super::gemini::GeminiProvider;
use super::ollama::OllamaProvider;
use super::LlmProvider;

/// Provider routing errors.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Model spec is not in `<provider>/<model>` format.
    #[error("invalid model spec '{spec}', expected '<provider>/<model>'")]
    InvalidModelSpec {
        /// Invalid raw spec.
        spec: String,
    },
    /// The requested provider spec is not available.
    #[error("provider not available for model spec '{spec}'")]
    UnavailableProvider {
        /// Unavailable spec.
        spec: String,
    },
    /// Default provider spec could not be created.
    #[error("default provider '{spec}' is unavailable")]
    DefaultUnavailable {
        /// Missing default spec.
        spec: String,
    },
    /// Unsupported provider type in spec prefix.
    #[error("unsupported provider '{provider}'")]
    UnsupportedProvider {
        /// Unsupported provider prefix.
        provider: String,
    },
    /// Required API credential missing for selected provider.
    #[error("missing credential for provider '{provider}': {key}")]
    MissingCredential {
        /// Provider name.
        provider: String,
        /// Missing credential key.
        key: String,
    },
}

/// Model router resolving `role -> default`.
#[derive(Clone)]
pub struct ModelRouter {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    default: String,
    role_overrides: HashMap<String, String>,
}

impl std::fmt::Debug for ModelRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRouter")
            .field("default", &self.default)
            .field("available", &self.available_specs())
            .finish()
    }
}

impl ModelRouter {
    /// Build a router from model config and loaded credentials.
    ///
    /// Role models whose provider cannot be created are skipped (the role
    /// falls back to the default).
    ///
    /// # Errors
    ///
    /// Returns an error if a spec is malformed or the default provider cannot
    /// be instantiated.
    pub fn from_config(models: &ModelsConfig, credentials: &Credentials) -> anyhow::Result<Self> {
        let mut providers: HashMap<String, Arc<dyn LlmProvider>> = HashMap::new();
        let timeout = Duration::from_secs(models.request_timeout_secs);

        for spec in all_model_specs(models) {
            let parsed = parse_model_spec(&spec)
                .with_context(|| format!("failed to parse model spec '{spec}'"))?;
            match instantiate_provider(&spec, &parsed, models, credentials, timeout) {
                Ok(provider) => {
                    providers.insert(spec.clone(), provider);
                }
                Err(e) if spec == models.default => {
                    return Err(anyhow::Error::new(e).context(RouterError::DefaultUnavailable {
                        spec: spec.clone(),
                    }));
                }
                Err(e) => warn!(spec = %spec, error = %e, "skipping unavailable role model"),
            }
        }

        if !providers.contains_key(&models.default) {
            return Err(RouterError::DefaultUnavailable {
                spec: models.default.clone(),
            }
            .into());
        }

        Ok(Self {
            providers,
            default: models.default.clone(),
            role_overrides: models.roles.clone(),
        })
    }

    /// Create a router backed by a single provider for tests and embedding.
    #[doc(hidden)]
    pub fn for_testing(default_spec: String, provider: Arc<dyn LlmProvider>) -> Self {
        let mut providers = HashMap::new();
        providers.insert(default_spec.clone(), provider);
        Self {
            providers,
            default: default_spec,
            role_overrides: HashMap::new(),
        }
    }

    /// Register an extra provider bound to a role.
    #[doc(hidden)]
    #[must_use]
    pub fn with_role_provider(
        mut self,
        role: &str,
        spec: String,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        self.providers.insert(spec.clone(), provider);
        self.role_overrides.insert(role.to_owned(), spec);
        self
    }

    /// Resolve a provider by optional role.
    ///
    /// Resolution order: `role -> default`.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider can be resolved.
    pub fn resolve(&self, role: Option<&str>) -> Result<Arc<dyn LlmProvider>, RouterError> {
        let selected = self.resolve_spec(role);
        self.providers
            .get(&selected)
            .cloned()
            .ok_or(RouterError::UnavailableProvider { spec: selected })
    }

    /// Resolve a model spec string by optional role.
    pub fn resolve_spec(&self, role: Option<&str>) -> String {
        if let Some(spec) = role
            .and_then(|r| self.role_overrides.get(r))
            .filter(|spec| self.providers.contains_key(*spec))
        {
            return spec.clone();
        }
        self.default.clone()
    }

    /// Returns true when a specific model spec is available.
    pub fn has_model(&self, spec: &str) -> bool {
        self.providers.contains_key(spec)
    }

    /// Returns the number of loaded providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns all available provider specs in sorted order.
    pub fn available_specs(&self) -> Vec<String> {
        let mut values: Vec<String> = self.providers.keys().cloned().collect();
        values.sort();
        values
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedModelSpec {
    provider: String,
    model: String,
}

fn parse_model_spec(spec: &str) -> Result<ParsedModelSpec, RouterError> {
    let (provider, model) = spec.split_once('/').unwrap_or((spec, ""));
    if provider.is_empty() || model.is_empty() {
        return Err(RouterError::InvalidModelSpec {
            spec: spec.to_owned(),
        });
    }
    Ok(ParsedModelSpec {
        provider: provider.to_owned(),
        model: model.to_owned(),
    })
}

fn instantiate_provider(
    model_spec: &str,
    parsed: &ParsedModelSpec,
    models: &ModelsConfig,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<Arc<dyn LlmProvider>, RouterError> {
    match parsed.provider.as_str() {
        "gemini" => {
            let key = credentials
                .gemini_api_key()
                .ok_or_else(|| RouterError::MissingCredential {
                    provider: parsed.provider.clone(),
                    key: "GEMINI_API_KEY".to_owned(),
                })?;
            Ok(Arc::new(
                GeminiProvider::new(model_spec.to_owned(), parsed.model.clone(), key.to_owned())
                    .with_timeout(timeout),
            ))
        }
        "ollama" => Ok(Arc::new(
            OllamaProvider::new(model_spec.to_owned(), parsed.model.clone())
                .with_base_url(models.ollama_url.clone())
                .with_timeout(timeout),
        )),
        _ => Err(RouterError::UnsupportedProvider {
            provider: parsed.provider.clone(),
        }),
    }
}
