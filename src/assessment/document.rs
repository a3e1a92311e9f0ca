//! The assessment document: ordered questions plus the category → subject
//! mapping used to turn category scores into subject recommendations.

use crate::error::AssessmentError;
use anyhow::{Context, Result};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// A single survey question. Its position in the document is its answer slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub category: String,
}

/// Category → ordered subject list, kept in document declaration order.
///
/// Declaration order is the tie-break for categories with equal scores, so
/// it must survive deserialization (a `HashMap` would lose it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMapping {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryMapping {
    /// Build a mapping from `(category, subjects)` pairs. A repeated category
    /// keeps its first position and takes the later subject list.
    pub fn new<C, S>(entries: impl IntoIterator<Item = (C, Vec<S>)>) -> Self
    where
        C: Into<String>,
        S: Into<String>,
    {
        let mut mapping = CategoryMapping::default();
        for (category, subjects) in entries {
            mapping.insert(
                category.into(),
                subjects.into_iter().map(Into::into).collect(),
            );
        }
        mapping
    }

    fn insert(&mut self, category: String, subjects: Vec<String>) {
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = subjects,
            None => self.entries.push((category, subjects)),
        }
    }

    /// Category names in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn subjects(&self, category: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, subjects)| subjects.as_slice())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.subjects(category).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, subjects)| (name.as_str(), subjects.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for CategoryMapping {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = CategoryMapping;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to subject lists")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut mapping = CategoryMapping::default();
                let mut seen = HashSet::new();
                while let Some((category, subjects)) =
                    access.next_entry::<String, Vec<String>>()?
                {
                    if !seen.insert(category.clone()) {
                        return Err(de::Error::custom(format!(
                            "duplicate category '{}' in career_mapping",
                            category
                        )));
                    }
                    mapping.entries.push((category, subjects));
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

impl Serialize for CategoryMapping {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, subjects) in &self.entries {
            map.serialize_entry(category, subjects)?;
        }
        map.end()
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    questions: Vec<Question>,
    career_mapping: CategoryMapping,
}

/// Validated questions and mapping. Every question's category is guaranteed
/// to be present in the mapping.
#[derive(Debug, Clone, Default)]
pub struct AssessmentData {
    questions: Vec<Question>,
    mapping: CategoryMapping,
}

impl AssessmentData {
    pub fn new(questions: Vec<Question>, mapping: CategoryMapping) -> Result<Self, AssessmentError> {
        for (index, question) in questions.iter().enumerate() {
            if !mapping.contains(&question.category) {
                return Err(AssessmentError::UnmappedQuestionCategory {
                    index,
                    category: question.category.clone(),
                });
            }
        }
        Ok(Self { questions, mapping })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDocument =
            serde_json::from_str(json).context("Failed to parse assessment document")?;
        let data = Self::new(raw.questions, raw.career_mapping)
            .context("Assessment document failed validation")?;
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read assessment document {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn mapping(&self) -> &CategoryMapping {
        &self.mapping
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"{
        "questions": [
            {"question": "I enjoy solving equations.", "category": "Science"},
            {"question": "I like painting.", "category": "Arts"},
            {"question": "I read about history for fun.", "category": "Arts"}
        ],
        "career_mapping": {
            "Science": ["Physics", "Biology"],
            "Arts": ["History", "Fine Arts"],
            "Business": ["Economics"]
        }
    }"#;

    #[test]
    fn test_from_json_preserves_question_order() {
        let data = AssessmentData::from_json(DOCUMENT).unwrap();
        let texts: Vec<_> = data.questions().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "I enjoy solving equations.",
                "I like painting.",
                "I read about history for fun."
            ]
        );
    }

    #[test]
    fn test_from_json_preserves_mapping_declaration_order() {
        let data = AssessmentData::from_json(DOCUMENT).unwrap();
        let categories: Vec<_> = data.mapping().categories().collect();
        assert_eq!(categories, vec!["Science", "Arts", "Business"]);
    }

    #[test]
    fn test_mapping_order_is_not_alphabetical() {
        let json = r#"{"Zoology": ["Biology"], "Accounting": ["Finance"], "Music": ["Music"]}"#;
        let mapping: CategoryMapping = serde_json::from_str(json).unwrap();
        let categories: Vec<_> = mapping.categories().collect();
        assert_eq!(categories, vec!["Zoology", "Accounting", "Music"]);
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let json = r#"{"Arts": ["History"], "Arts": ["Music"]}"#;
        let result: std::result::Result<CategoryMapping, _> = serde_json::from_str(json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate category 'Arts'"), "{}", err);
    }

    #[test]
    fn test_question_with_unmapped_category_fails_load() {
        let json = r#"{
            "questions": [{"question": "Q", "category": "Sports"}],
            "career_mapping": {"Science": ["Physics"]}
        }"#;
        let err = AssessmentData::from_json(json).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("Sports"), "{}", chain);
    }

    #[test]
    fn test_new_reports_offending_question_index() {
        let mapping = CategoryMapping::new(vec![("Science", vec!["Physics"])]);
        let questions = vec![
            Question { text: "a".into(), category: "Science".into() },
            Question { text: "b".into(), category: "Arts".into() },
        ];
        let err = AssessmentData::new(questions, mapping).unwrap_err();
        assert_eq!(
            err,
            AssessmentError::UnmappedQuestionCategory { index: 1, category: "Arts".into() }
        );
    }

    #[test]
    fn test_missing_career_mapping_fails() {
        let json = r#"{"questions": []}"#;
        assert!(AssessmentData::from_json(json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assessment_questions.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let data = AssessmentData::load(&path).unwrap();
        assert_eq!(data.questions().len(), 3);
        assert_eq!(data.mapping().len(), 3);
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let err = AssessmentData::load("/nonexistent/assessment.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/assessment.json"));
    }

    #[test]
    fn test_mapping_keeps_duplicate_subjects() {
        let mapping = CategoryMapping::new(vec![("Science", vec!["Physics", "Biology", "Physics"])]);
        assert_eq!(mapping.subjects("Science").unwrap().len(), 3);
    }

    #[test]
    fn test_mapping_serializes_in_declaration_order() {
        let mapping = CategoryMapping::new(vec![("B", vec!["x"]), ("A", vec!["y"])]);
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"B":["x"],"A":["y"]}"#);
    }
}
