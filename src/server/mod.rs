//! HTTP surface of the portal.
//!
//! Loaded data is swapped wholesale on reload; handlers take an `Arc`
//! snapshot so a reload never blocks a request that is waiting on the
//! translator.

mod dto;
mod error;
mod handlers;
mod routes;

pub use dto::FinderQuery;
pub use error::ApiError;
pub use routes::router;

use crate::assessment::AssessmentData;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::i18n::TranslationMetrics;
use crate::session::SessionStore;
use crate::translation::TranslationClient;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};

/// Dataset and assessment document as of the last (re)load. A component
/// that failed to load is empty and carries its error.
#[derive(Debug, Default)]
pub struct LoadedData {
    /// Bumped on every reload; sessions compare it to spot stale chats.
    pub generation: u64,
    pub catalog: Catalog,
    pub catalog_error: Option<String>,
    pub assessment: AssessmentData,
    pub assessment_error: Option<String>,
}

impl LoadedData {
    pub fn load(config: &Config) -> Self {
        let mut data = LoadedData::default();

        match Catalog::load(&config.universities_file) {
            Ok(catalog) => {
                info!("Loaded {} universities from {}", catalog.len(), config.universities_file);
                data.catalog = catalog;
            }
            Err(e) => {
                error!("University dataset unavailable: {:#}", e);
                data.catalog_error = Some(format!("{:#}", e));
            }
        }

        match AssessmentData::load(&config.assessment_file) {
            Ok(assessment) => {
                info!(
                    "Loaded {} questions across {} categories from {}",
                    assessment.questions().len(),
                    assessment.mapping().len(),
                    config.assessment_file
                );
                data.assessment = assessment;
            }
            Err(e) => {
                error!("Assessment document unavailable: {:#}", e);
                data.assessment_error = Some(format!("{:#}", e));
            }
        }

        data
    }

    pub fn load_errors(&self) -> Vec<String> {
        self.catalog_error
            .iter()
            .chain(self.assessment_error.iter())
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<TranslationClient>,
    pub sessions: SessionStore,
    data: Arc<RwLock<Arc<LoadedData>>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let data = LoadedData::load(&config);
        Self::with_data(config, data)
    }

    pub fn with_data(config: Config, data: LoadedData) -> Result<Self> {
        let translator = TranslationClient::new(&config, Arc::new(TranslationMetrics::new()))?;
        if config.translator_key.is_none() {
            info!("AZURE_TRANSLATOR_KEY not set; non-English pages will fall back to English");
        }

        let sessions = SessionStore::new(config.session_ttl());
        Ok(Self {
            config: Arc::new(config),
            translator: Arc::new(translator),
            sessions,
            data: Arc::new(RwLock::new(Arc::new(data))),
        })
    }

    pub fn snapshot(&self) -> Arc<LoadedData> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace_data(&self, mut data: LoadedData) {
        let mut current = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.generation = current.generation + 1;
        *current = Arc::new(data);
    }
}

/// Bind `0.0.0.0:{port}` and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config)?;

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sessions.ttl());
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_expired().await;
            if evicted > 0 {
                debug!("Evicted {} idle sessions", evicted);
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("HTTP server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> Config {
        Config {
            port: 0,
            universities_file: dir.path().join("universities.csv").display().to_string(),
            assessment_file: dir.path().join("assessment.json").display().to_string(),
            translator_key: None,
            translator_endpoint: "http://invalid-url-should-not-be-called.test".to_string(),
            translator_region: None,
            translation_timeout_secs: 1,
            top_categories: 3,
            top_subjects: 5,
            universities_per_subject: 5,
            session_ttl_secs: 3600,
            admin_api_key: None,
        }
    }

    #[test]
    fn test_missing_files_load_as_empty_with_errors() {
        let dir = TempDir::new().unwrap();
        let data = LoadedData::load(&config_for(&dir));

        assert!(data.catalog.is_empty());
        assert!(data.assessment.is_empty());
        assert_eq!(data.load_errors().len(), 2);
    }

    #[test]
    fn test_replace_data_swaps_snapshot() {
        let dir = TempDir::new().unwrap();
        let state = AppState::with_data(config_for(&dir), LoadedData::default()).unwrap();

        let before = state.snapshot();
        state.replace_data(LoadedData {
            catalog_error: Some("gone".to_string()),
            ..Default::default()
        });

        assert!(before.catalog_error.is_none());
        assert_eq!(state.snapshot().catalog_error.as_deref(), Some("gone"));
    }

    #[test]
    fn test_replace_data_bumps_generation() {
        let dir = TempDir::new().unwrap();
        let state = AppState::with_data(config_for(&dir), LoadedData::default()).unwrap();
        assert_eq!(state.snapshot().generation, 0);

        state.replace_data(LoadedData::default());
        state.replace_data(LoadedData::default());
        assert_eq!(state.snapshot().generation, 2);
    }
}
