//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is built once on first access (`OnceLock`) and is immutable
//! afterwards.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language code as understood by the translation service (e.g., "id", "zh-Hans")
    pub code: &'static str,

    /// Label shown in the language selector (e.g., "Indonesian", "Mandarin")
    pub name: &'static str,

    /// Native name of the language (e.g., "Bahasa Indonesia", "中文")
    pub native_name: &'static str,

    /// Whether this is the canonical/source language (only one should be true)
    pub is_canonical: bool,

    /// Whether this language is offered in the selector
    pub enabled: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get a language configuration by its selector label, ignoring case.
    pub fn get_by_name(&self, name: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.name.eq_ignore_ascii_case(name))
    }

    /// Get all enabled languages, in selector order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the canonical language configuration.
    ///
    /// The canonical language is the source language of every UI string
    /// and dataset value.
    ///
    /// # Panics
    /// Panics if the built-in table does not define exactly one canonical
    /// language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Check if a language code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

/// English (canonical), Indonesian and Mandarin (Simplified Chinese).
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_canonical: true,
            enabled: true,
        },
        LanguageConfig {
            code: "id",
            name: "Indonesian",
            native_name: "Bahasa Indonesia",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "zh-Hans",
            name: "Mandarin",
            native_name: "中文",
            is_canonical: false,
            enabled: true,
        },
    ]
}
