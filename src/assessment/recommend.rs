//! Turning category scores into ranked subject recommendations.
//!
//! Selection keeps the top-N strictly positive categories. Aggregation then
//! ranks subjects by how many selected categories list them, not by the
//! categories' scores: a subject shared by two weakly positive categories
//! outranks one that only a single strong category lists.

use super::document::CategoryMapping;
use super::scoring::Scores;
use serde::Serialize;
use std::collections::HashMap;

/// Cutoffs for category selection (N) and subject aggregation (M).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    pub top_categories: usize,
    pub top_subjects: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            top_categories: 3,
            top_subjects: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCount {
    pub subject: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Recommendation {
    Subjects {
        categories: Vec<String>,
        subjects: Vec<SubjectCount>,
    },
    /// No category scored above zero.
    NoStrongSignal,
}

impl Recommendation {
    pub fn subjects(&self) -> &[SubjectCount] {
        match self {
            Recommendation::Subjects { subjects, .. } => subjects,
            Recommendation::NoStrongSignal => &[],
        }
    }
}

/// Up to `n` strictly positive categories, highest score first.
///
/// Equal scores keep mapping declaration order (the sort is stable).
pub fn top_categories(scores: &Scores, n: usize) -> Vec<(&str, i32)> {
    let mut positive: Vec<(&str, i32)> = scores.iter().filter(|(_, s)| *s > 0).collect();
    positive.sort_by(|a, b| b.1.cmp(&a.1));
    positive.truncate(n);
    positive
}

/// The `m` most frequent subjects across `categories`' subject lists.
///
/// A subject listed by K selected categories counts K times. Equal counts
/// keep first-seen order in the concatenated lists.
pub fn aggregate_subjects(
    mapping: &CategoryMapping,
    categories: &[&str],
    m: usize,
) -> Vec<SubjectCount> {
    let mut counts: Vec<SubjectCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    let concatenated = categories
        .iter()
        .filter_map(|category| mapping.subjects(category))
        .flatten();

    for subject in concatenated {
        match positions.get(subject.as_str()) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(subject.as_str(), counts.len());
                counts.push(SubjectCount {
                    subject: subject.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(m);
    counts
}

/// Select the top categories and aggregate their subjects in one pass.
pub fn recommend(
    mapping: &CategoryMapping,
    scores: &Scores,
    limits: RecommendationLimits,
) -> Recommendation {
    let selected = top_categories(scores, limits.top_categories);
    if selected.is_empty() {
        return Recommendation::NoStrongSignal;
    }

    let names: Vec<&str> = selected.iter().map(|(name, _)| *name).collect();
    let subjects = aggregate_subjects(mapping, &names, limits.top_subjects);

    Recommendation::Subjects {
        categories: names.into_iter().map(str::to_string).collect(),
        subjects,
    }
}
