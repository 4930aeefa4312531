use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::{EngineSources, RecommendationEngine},
};

/// Request limits for `top_n`
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            max_top_n: 10,
        }
    }
}

impl Limits {
    /// Applies the default and rejects out-of-range counts
    pub fn resolve(&self, requested: Option<usize>) -> AppResult<usize> {
        let top_n = requested.unwrap_or(self.default_top_n);
        if top_n == 0 || top_n > self.max_top_n {
            return Err(AppError::InvalidInput(format!(
                "top_n must be between 1 and {}, got {}",
                self.max_top_n, top_n
            )));
        }
        Ok(top_n)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Build-once engine plus request limits
pub struct AppStateInner {
    engine: OnceCell<RecommendationEngine>,
    sources: Option<EngineSources>,
    pub limits: Limits,
}

impl AppState {
    /// State whose engine is built from `sources` on first use
    pub fn new(sources: EngineSources, limits: Limits) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                engine: OnceCell::new(),
                sources: Some(sources),
                limits,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            EngineSources {
                catalog_path: config.catalog_path.clone(),
                rules_path: config.rules_path.clone(),
            },
            Limits {
                default_top_n: config.default_top_n,
                max_top_n: config.max_top_n,
            },
        )
    }

    /// State around an already built engine
    pub fn with_engine(engine: RecommendationEngine, limits: Limits) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                engine: OnceCell::new_with(Some(engine)),
                sources: None,
                limits,
            }),
        }
    }

    pub fn limits(&self) -> Limits {
        self.inner.limits
    }

    /// Returns the engine, building it on the first call
    ///
    /// Concurrent first callers wait on the same build.
    pub async fn engine(&self) -> AppResult<&RecommendationEngine> {
        self.inner
            .engine
            .get_or_try_init(|| async {
                let sources = self
                    .inner
                    .sources
                    .clone()
                    .ok_or_else(|| AppError::Internal("no engine sources configured".to_string()))?;

                tracing::info!(
                    catalog = %sources.catalog_path.display(),
                    rules = %sources.rules_path.display(),
                    "Building recommendation engine"
                );

                tokio::task::spawn_blocking(move || RecommendationEngine::from_sources(&sources))
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))
            })
            .await
    }
}
