use crate::assessment::RecommendationLimits;
use anyhow::{bail, Context, Result};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Data files
    pub universities_file: String,
    pub assessment_file: String,

    // Azure Translator
    pub translator_key: Option<String>,
    pub translator_endpoint: String,
    pub translator_region: Option<String>,
    pub translation_timeout_secs: u64,

    // Recommendations
    pub top_categories: usize,
    pub top_subjects: usize,
    pub universities_per_subject: usize,

    // Sessions idle longer than this are dropped
    pub session_ttl_secs: u64,

    // Admin
    pub admin_api_key: Option<String>,
}

/// Parse an optional numeric variable, failing on garbage instead of
/// silently falling back to the default.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

/// Read a variable that may be unset; blank counts as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            port: parse_var("PORT", 8080)?,

            universities_file: std::env::var("UNIVERSITIES_FILE")
                .unwrap_or_else(|_| "data/universities.csv".to_string()),
            assessment_file: std::env::var("ASSESSMENT_FILE")
                .unwrap_or_else(|_| "data/assessment_questions.json".to_string()),

            // Azure Translator (translation degrades to English when the key is missing)
            translator_key: optional_var("AZURE_TRANSLATOR_KEY"),
            translator_endpoint: std::env::var("AZURE_TRANSLATOR_ENDPOINT")
                .unwrap_or_else(|_| "https://api.cognitive.microsofttranslator.com".to_string()),
            translator_region: optional_var("AZURE_TRANSLATOR_REGION"),
            translation_timeout_secs: parse_var("TRANSLATION_TIMEOUT_SECS", 10)?,

            top_categories: parse_var("TOP_CATEGORIES", 3)?,
            top_subjects: parse_var("TOP_SUBJECTS", 5)?,
            universities_per_subject: parse_var("UNIVERSITIES_PER_SUBJECT", 5)?,

            session_ttl_secs: parse_var("SESSION_TTL_SECS", 3600)?,

            admin_api_key: optional_var("ADMIN_API_KEY"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_categories == 0 {
            bail!("TOP_CATEGORIES must be at least 1");
        }
        if self.top_subjects == 0 {
            bail!("TOP_SUBJECTS must be at least 1");
        }
        if self.universities_per_subject == 0 {
            bail!("UNIVERSITIES_PER_SUBJECT must be at least 1");
        }
        if self.session_ttl_secs == 0 {
            bail!("SESSION_TTL_SECS must be at least 1");
        }
        if self.translation_timeout_secs == 0 {
            bail!("TRANSLATION_TIMEOUT_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn recommendation_limits(&self) -> RecommendationLimits {
        RecommendationLimits {
            top_categories: self.top_categories,
            top_subjects: self.top_subjects,
        }
    }
}
