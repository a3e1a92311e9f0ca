//! Career assessment: questions, Likert answers, scoring and recommendation.
//!
//! # Example
//!
//! ```rust,ignore
//! use gerbang_kampus::assessment::{recommend, score_answers, AssessmentData, Likert};
//!
//! let data = AssessmentData::load("data/assessment_questions.json")?;
//! let scores = score_answers(&data, &answers)?;
//! let recommendation = recommend(data.mapping(), &scores, limits);
//! ```

mod document;
mod likert;
mod recommend;
mod scoring;

pub use document::{AssessmentData, CategoryMapping, Question};
pub use likert::Likert;
pub use recommend::{
    aggregate_subjects, recommend, top_categories, Recommendation, RecommendationLimits,
    SubjectCount,
};
pub use scoring::{score, score_answers, Scores};
