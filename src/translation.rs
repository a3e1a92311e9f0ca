use crate::config::Config;
use crate::i18n::{Language, TranslationMetrics};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Azure Translator v3 request item
#[derive(Debug, Serialize)]
struct TranslateItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResult {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
}

/// HTTP client for the Azure Translator text API.
pub struct TranslationClient {
    http: reqwest::Client,
    endpoint: String,
    key: Option<String>,
    region: Option<String>,
    metrics: Arc<TranslationMetrics>,
}

impl TranslationClient {
    pub fn new(config: &Config, metrics: Arc<TranslationMetrics>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.translation_timeout_secs))
            .build()
            .context("Failed to build translation HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.translator_endpoint.trim_end_matches('/').to_string(),
            key: config.translator_key.clone(),
            region: config.translator_region.clone(),
            metrics,
        })
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    /// Translate `text` from the canonical language into `target`.
    ///
    /// Always performs a request; callers go through [`translate_text`] for
    /// the identity and caching rules.
    pub async fn translate(&self, text: &str, target: Language) -> Result<String> {
        let key = self
            .key
            .as_deref()
            .context("AZURE_TRANSLATOR_KEY is not configured")?;

        let url = format!(
            "{}/translate?api-version=3.0&from={}&to={}",
            self.endpoint,
            Language::canonical().code(),
            target.code()
        );

        let mut request = self
            .http
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", key)
            .json(&[TranslateItem { text }]);
        if let Some(region) = &self.region {
            request = request.header("Ocp-Apim-Subscription-Region", region);
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to Azure Translator")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("Azure Translator error ({}): {}", status, body);
        }

        let results: Vec<TranslateResult> = response
            .json()
            .await
            .context("Failed to parse Azure Translator response")?;

        results
            .into_iter()
            .next()
            .and_then(|r| r.translations.into_iter().next())
            .map(|t| t.text)
            .context("Azure Translator response contained no translations")
    }
}

/// Outcome of translating one UI string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Canonical target language or empty text; no request made.
    Original(String),
    Translated(String),
    /// The translation failed; `original` is what the user sees.
    Fallback { original: String, error: String },
}

impl Translation {
    /// The text to display.
    pub fn text(&self) -> &str {
        match self {
            Translation::Original(text) | Translation::Translated(text) => text,
            Translation::Fallback { original, .. } => original,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Translation::Original(text) | Translation::Translated(text) => text,
            Translation::Fallback { original, .. } => original,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Translation::Fallback { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Translated(String),
    Failed(String),
}

/// Per-session translations keyed by `(text, language)`.
///
/// Failures are cached too, so a failing string is requested once per
/// session rather than on every render.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<(String, Language), CacheEntry>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Translate through the session cache, falling back to the original text.
///
/// Never fails: errors come back as [`Translation::Fallback`].
pub async fn translate_text(
    client: &TranslationClient,
    cache: &mut TranslationCache,
    text: &str,
    target: Language,
) -> Translation {
    if target.is_canonical() || text.is_empty() {
        return Translation::Original(text.to_string());
    }

    let key = (text.to_string(), target);
    if let Some(entry) = cache.entries.get(&key) {
        client.metrics.record_cache_hit();
        debug!("Translation cache hit for {} ({} chars)", target.code(), text.len());
        return match entry {
            CacheEntry::Translated(translated) => Translation::Translated(translated.clone()),
            CacheEntry::Failed(error) => Translation::Fallback {
                original: text.to_string(),
                error: error.clone(),
            },
        };
    }
    client.metrics.record_cache_miss();

    client.metrics.record_api_call();
    match client.translate(text, target).await {
        Ok(translated) => {
            cache
                .entries
                .insert(key, CacheEntry::Translated(translated.clone()));
            Translation::Translated(translated)
        }
        Err(e) => {
            client.metrics.record_api_failure();
            let error = format!("{:#}", e);
            warn!(
                "Translation to {} ({}) failed, showing original text: {}",
                target.name(),
                target.code(),
                error
            );
            cache.entries.insert(key, CacheEntry::Failed(error.clone()));
            Translation::Fallback {
                original: text.to_string(),
                error,
            }
        }
    }
}

/// Translates a page's worth of strings for one session and collects the
/// distinct failure warnings to show alongside the page.
pub struct Localizer<'a> {
    client: &'a TranslationClient,
    cache: &'a mut TranslationCache,
    language: Language,
    warnings: Vec<String>,
}

impl<'a> Localizer<'a> {
    pub fn new(
        client: &'a TranslationClient,
        cache: &'a mut TranslationCache,
        language: Language,
    ) -> Self {
        Self {
            client,
            cache,
            language,
            warnings: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub async fn text(&mut self, source: &str) -> String {
        let translation = translate_text(self.client, self.cache, source, self.language).await;
        if let Some(error) = translation.error() {
            let warning = format!(
                "Translation failed: {}. Please check the Azure Translator credentials.",
                error
            );
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
        translation.into_text()
    }

    pub async fn texts<S: AsRef<str>>(&mut self, sources: &[S]) -> Vec<String> {
        let mut out = Vec::with_capacity(sources.len());
        for source in sources {
            out.push(self.text(source.as_ref()).await);
        }
        out
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}
