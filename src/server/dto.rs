//! Request and response bodies for the HTTP API.

use crate::catalog::{FilterCriteria, SearchScope, UniversityRecord};
use crate::i18n::{Language, MetricsReport};
use crate::pages::Page;
use crate::session::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub universities: usize,
    pub questions: usize,
    pub categories: usize,
    pub sessions: usize,
    pub load_errors: Vec<String>,
    pub translation: MetricsReport,
}

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    pub canonical: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Sessions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Code ("id") or selector label ("Indonesian")
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub language: Language,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub language: Language,
    pub page: Page,
    pub warnings: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// University finder
// ════════════════════════════════════════════════════════════════════════════

/// Finder query string. List values are `;`-separated. An absent
/// `continents` keeps every continent; `continents=` keeps none.
#[derive(Debug, Default, Deserialize)]
pub struct FinderQuery {
    pub continents: Option<String>,
    pub subjects: Option<String>,
    pub levels: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub scope: SearchScope,
}

fn split_values(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl FinderQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            continents: self.continents.as_deref().map(split_values),
            subjects: self.subjects.as_deref().map(split_values).unwrap_or_default(),
            levels: self.levels.as_deref().map(split_values).unwrap_or_default(),
            query: self.q.clone(),
            scope: self.scope,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    pub heading: String,
    pub continent_label: String,
    pub subject_label: String,
    pub level_label: String,
    pub continents: Vec<FilterOption>,
    pub subjects: Vec<FilterOption>,
    pub levels: Vec<FilterOption>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UniversityView {
    pub university: String,
    pub continent: String,
    pub rank: String,
    pub website: String,
    pub email: String,
    pub application_open: String,
    pub tuition_usd_range: String,
    pub subject_expertise: String,
    pub subjects: Vec<String>,
    pub levels: Vec<String>,
}

impl From<&UniversityRecord> for UniversityView {
    fn from(record: &UniversityRecord) -> Self {
        Self {
            university: record.university.clone(),
            continent: record.continent.clone(),
            rank: record.rank.clone(),
            website: record.website.clone(),
            email: record.email.clone(),
            application_open: record.application_open.clone(),
            tuition_usd_range: record.tuition_usd_range.clone(),
            subject_expertise: record.subject_expertise.clone(),
            subjects: record.subjects().map(str::to_string).collect(),
            levels: record.levels().map(str::to_string).collect(),
        }
    }
}

/// Translated column captions for finder result cards.
#[derive(Debug, Serialize)]
pub struct FinderLabels {
    pub search: String,
    pub search_example: String,
    pub rank: String,
    pub continent: String,
    pub website: String,
    pub email: String,
    pub application_opens: String,
    pub tuition_range: String,
    pub subject_expertise: String,
    pub available_subjects: String,
    pub degree_levels: String,
    pub showing_results: String,
    pub download_csv: String,
}

#[derive(Debug, Serialize)]
pub struct FinderResponse {
    pub count: usize,
    pub universities: Vec<UniversityView>,
    pub labels: FinderLabels,
    /// Set when there is nothing to show
    pub message: Option<String>,
    pub warnings: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Assessment
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub text: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub title: String,
    pub intro: String,
    pub submit_label: String,
    pub questions: Vec<QuestionView>,
    pub options: Vec<AnswerOption>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    /// One English Likert label per question, in question order
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UniversityRank {
    pub university: String,
    pub rank: String,
    pub website: String,
}

#[derive(Debug, Serialize)]
pub struct SubjectView {
    pub subject: String,
    pub label: String,
    pub count: usize,
    pub universities: Vec<UniversityRank>,
    /// Set when no university lists the subject
    pub universities_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationView {
    pub outcome: &'static str,
    pub heading: String,
    pub categories: Vec<String>,
    pub subjects: Vec<SubjectView>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendation: RecommendationView,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageView {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub title: String,
    pub intro: String,
    pub step: usize,
    pub total: usize,
    pub complete: bool,
    pub transcript: Vec<ChatMessageView>,
    /// Answer buttons while a question is pending
    pub options: Vec<AnswerOption>,
    pub result: Option<RecommendationView>,
    pub restart_label: String,
    /// Set when the chat was restarted because the questions were reloaded
    pub notice: Option<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_continents_keep_everything() {
        let query = FinderQuery::default();
        assert_eq!(query.criteria().continents, None);
    }

    #[test]
    fn test_blank_continents_select_nothing() {
        let query = FinderQuery {
            continents: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.criteria().continents, Some(vec![]));
    }

    #[test]
    fn test_list_values_split_on_semicolon() {
        let query = FinderQuery {
            subjects: Some("Physics; Computer Science;".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.criteria().subjects,
            vec!["Physics".to_string(), "Computer Science".to_string()]
        );
    }
}
