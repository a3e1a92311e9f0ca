//! English source text for the portal's pages and UI labels.
//!
//! Everything here is handed to the translator as-is, so each string is a
//! complete sentence or label rather than a fragment.

use crate::translation::Localizer;
use serde::Serialize;

pub const SITE_NAME: &str = "Gerbang Kampus";
pub const CONTACT_EMAIL: &str = "contact@gerbangkampus.com";

/// Fixed labels used by the finder and the assessment.
pub mod labels {
    pub const FILTER_OPTIONS: &str = "Filter Options";
    pub const CONTINENT: &str = "Continent";
    pub const SUBJECT: &str = "Subject";
    pub const DEGREE_LEVEL: &str = "Degree Level";
    pub const SEARCH_PLACEHOLDER: &str = "Search by University Name, Subject, or Continent";
    pub const SEARCH_EXAMPLE: &str = "e.g., Harvard, Engineering, Asia";
    pub const RANK: &str = "Rank";
    pub const WEBSITE: &str = "Website";
    pub const EMAIL: &str = "Email";
    pub const APPLICATION_OPENS: &str = "Application Opens";
    pub const TUITION_RANGE: &str = "Tuition Range (USD)";
    pub const SUBJECT_EXPERTISE: &str = "Subject Expertise";
    pub const AVAILABLE_SUBJECTS: &str = "Available Subjects";
    pub const DEGREE_LEVELS: &str = "Degree Levels";
    pub const SHOWING_RESULTS: &str = "Showing results";
    pub const DOWNLOAD_CSV: &str = "Download results as CSV";
    pub const NO_RESULTS: &str =
        "No universities found for the selected criteria. Try adjusting your filters.";
    pub const DATASET_UNAVAILABLE: &str = "University data could not be loaded.";

    pub const ASSESSMENT_TITLE: &str = "Career Assessment";
    pub const ASSESSMENT_INTRO: &str =
        "Answer the following questions to get a recommended subject based on your strengths.";
    pub const CHAT_INTRO: &str =
        "Answer the questions as they appear to discover your recommended subjects.";
    pub const CHAT_GREETING: &str = "Hi there! Ready to start your assessment?";
    pub const GET_RECOMMENDATION: &str = "Get Recommendation";
    pub const TAKE_AGAIN: &str = "Take Assessment Again";
    pub const QUESTIONS_CHANGED: &str =
        "The assessment questions have been updated, so your assessment has restarted.";
    pub const RECOMMENDED_SUBJECTS: &str = "Your Recommended Subjects";
    pub const FINDER_HINT: &str =
        "Use the University Finder to search for universities offering these subjects!";
    pub const NO_STRONG_SIGNAL: &str = "Your responses did not strongly point to a specific category. Try answering more questions with 'Agree' or 'Strongly Agree' to get a recommendation.";
    pub const NO_UNIVERSITIES_FOR_SUBJECT: &str = "No universities found for this subject.";
    pub const ASSESSMENT_UNAVAILABLE: &str = "Assessment questions could not be loaded.";
}

/// Which static page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    About,
}

impl PageKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "home" => Some(PageKind::Home),
            "about" => Some(PageKind::About),
            _ => None,
        }
    }
}

struct PageSource {
    title: &'static str,
    intro: &'static [&'static str],
    sections: &'static [SectionSource],
}

struct SectionSource {
    heading: &'static str,
    paragraphs: &'static [&'static str],
    /// `(bold label, description)`
    items: &'static [(&'static str, &'static str)],
}

const HOME: PageSource = PageSource {
    title: "Welcome to Gerbang Kampus!",
    intro: &["is your one-stop portal to discover your future career path and the perfect university to achieve your dreams."],
    sections: &[
        SectionSource {
            heading: "What we offer:",
            paragraphs: &[],
            items: &[
                ("University Finder:", "A comprehensive database of universities worldwide. Filter by continent, subject, and degree level to find the best fit for you."),
                ("Career Assessment:", "Not sure which major to choose? Take our assessment test to get a recommendation based on your skills and interests."),
                ("Detailed Information:", "Get all the essential details about universities, including tuition fees, rankings, and application dates."),
            ],
        },
        SectionSource {
            heading: "How to get started:",
            paragraphs: &["We hope to be your trusted gateway to higher education!"],
            items: &[
                ("", "Use the menu on the left to navigate to the University Finder or the Assessment."),
                ("", "On the University Finder page, use the filters to narrow down your options."),
                ("", "Click on a university to see more detailed information."),
                ("", "Take the Assessment to discover subject recommendations tailored to you."),
            ],
        },
    ],
};

const ABOUT: PageSource = PageSource {
    title: "About Gerbang Kampus",
    intro: &[],
    sections: &[
        SectionSource {
            heading: "Our Mission",
            paragraphs: &["is dedicated to simplifying the university and career selection process for students everywhere. We believe that with the right information and self-understanding, every student can find the path that leads to a fulfilling career and a successful future."],
            items: &[],
        },
        SectionSource {
            heading: "Our Features",
            paragraphs: &[],
            items: &[
                ("In-depth University Database", "We provide a curated list of universities with essential information to help you make informed decisions."),
                ("Personalized Career Assessment", "Our assessment tool is designed to align your innate strengths and interests with potential fields of study."),
                ("Intuitive and User-Friendly", "We strive to create a seamless experience, making your search for the perfect university as easy as possible."),
            ],
        },
        SectionSource {
            heading: "Contact Us",
            paragraphs: &["For any inquiries or feedback, please feel free to reach out to us at"],
            items: &[],
        },
    ],
};

#[derive(Debug, Clone, Serialize)]
pub struct PageItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSection {
    pub heading: String,
    pub paragraphs: Vec<String>,
    pub items: Vec<PageItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub site_name: &'static str,
    pub title: String,
    pub intro: Vec<String>,
    pub sections: Vec<PageSection>,
    pub contact_email: &'static str,
}

/// Render a static page in the localizer's language.
pub async fn render(kind: PageKind, localizer: &mut Localizer<'_>) -> Page {
    let source = match kind {
        PageKind::Home => &HOME,
        PageKind::About => &ABOUT,
    };

    let mut sections = Vec::with_capacity(source.sections.len());
    for section in source.sections {
        let mut items = Vec::with_capacity(section.items.len());
        for (label, text) in section.items {
            items.push(PageItem {
                label: localizer.text(label).await,
                text: localizer.text(text).await,
            });
        }
        sections.push(PageSection {
            heading: localizer.text(section.heading).await,
            paragraphs: localizer.texts(section.paragraphs).await,
            items,
        });
    }

    Page {
        site_name: SITE_NAME,
        title: localizer.text(source.title).await,
        intro: localizer.texts(source.intro).await,
        sections,
        contact_email: CONTACT_EMAIL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::i18n::{Language, TranslationMetrics};
    use crate::translation::{TranslationCache, TranslationClient};
    use std::sync::Arc;

    fn offline_client() -> TranslationClient {
        let config = Config {
            port: 0,
            universities_file: String::new(),
            assessment_file: String::new(),
            translator_key: None,
            translator_endpoint: "http://invalid-url-should-not-be-called.test".to_string(),
            translator_region: None,
            translation_timeout_secs: 1,
            top_categories: 3,
            top_subjects: 5,
            universities_per_subject: 5,
            session_ttl_secs: 3600,
            admin_api_key: None,
        };
        TranslationClient::new(&config, Arc::new(TranslationMetrics::new())).unwrap()
    }

    #[test]
    fn test_from_slug() {
        assert_eq!(PageKind::from_slug("home"), Some(PageKind::Home));
        assert_eq!(PageKind::from_slug("about"), Some(PageKind::About));
        assert_eq!(PageKind::from_slug("finder"), None);
    }

    #[tokio::test]
    async fn test_render_home_in_english() {
        let client = offline_client();
        let mut cache = TranslationCache::new();
        let mut localizer = Localizer::new(&client, &mut cache, Language::ENGLISH);

        let page = render(PageKind::Home, &mut localizer).await;
        assert_eq!(page.title, "Welcome to Gerbang Kampus!");
        assert_eq!(page.sections.len(), 2);
        assert_eq!(page.sections[0].items[0].label, "University Finder:");
        assert!(localizer.into_warnings().is_empty());
    }

    #[tokio::test]
    async fn test_render_about_keeps_contact() {
        let client = offline_client();
        let mut cache = TranslationCache::new();
        let mut localizer = Localizer::new(&client, &mut cache, Language::ENGLISH);

        let page = render(PageKind::About, &mut localizer).await;
        assert_eq!(page.contact_email, CONTACT_EMAIL);
        assert_eq!(page.sections.last().unwrap().heading, "Contact Us");
    }

    #[tokio::test]
    async fn test_render_falls_back_when_translation_fails() {
        let client = offline_client();
        let mut cache = TranslationCache::new();
        let mut localizer = Localizer::new(&client, &mut cache, Language::INDONESIAN);

        let page = render(PageKind::About, &mut localizer).await;
        assert_eq!(page.title, "About Gerbang Kampus");
        assert_eq!(localizer.into_warnings().len(), 1);
    }

    #[test]
    fn test_empty_item_label_is_not_serialized() {
        let item = PageItem { label: String::new(), text: "x".into() };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("label").is_none());
    }
}
