use super::document::{AssessmentData, CategoryMapping};
use super::likert::Likert;
use crate::error::AssessmentError;
use serde::Serialize;

/// Per-category score totals in mapping declaration order.
///
/// Contains exactly one entry per mapped category, including categories
/// that ended at zero or below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scores {
    entries: Vec<(String, i32)>,
}

impl Scores {
    fn zeroed(mapping: &CategoryMapping) -> Self {
        Self {
            entries: mapping.categories().map(|c| (c.to_string(), 0)).collect(),
        }
    }

    pub fn get(&self, category: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sum answer values per category.
///
/// Fails on the first answer whose category is not in `mapping`.
pub fn score<'a, I>(mapping: &CategoryMapping, answers: I) -> Result<Scores, AssessmentError>
where
    I: IntoIterator<Item = (&'a str, Likert)>,
{
    let mut scores = Scores::zeroed(mapping);
    for (category, answer) in answers {
        let slot = scores
            .entries
            .iter_mut()
            .find(|(name, _)| name == category)
            .ok_or_else(|| AssessmentError::UnknownCategory(category.to_string()))?;
        slot.1 += answer.value();
    }
    Ok(scores)
}

/// Score one answer per question, in question order.
pub fn score_answers(data: &AssessmentData, answers: &[Likert]) -> Result<Scores, AssessmentError> {
    if data.is_empty() {
        return Err(AssessmentError::NoQuestions);
    }
    if answers.len() != data.questions().len() {
        return Err(AssessmentError::AnswerCountMismatch {
            expected: data.questions().len(),
            actual: answers.len(),
        });
    }

    score(
        data.mapping(),
        data.questions()
            .iter()
            .zip(answers)
            .map(|(question, answer)| (question.category.as_str(), *answer)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::document::Question;
    use proptest::prelude::*;

    fn mapping() -> CategoryMapping {
        CategoryMapping::new(vec![
            ("A", vec!["Physics"]),
            ("B", vec!["History"]),
            ("C", vec!["Economics"]),
        ])
    }

    fn question(category: &str) -> Question {
        Question {
            text: format!("About {}", category),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_strongly_agree_agree_neutral() {
        let scores = score(
            &mapping(),
            vec![
                ("A", Likert::StronglyAgree),
                ("A", Likert::Agree),
                ("B", Likert::Neutral),
            ],
        )
        .unwrap();

        assert_eq!(scores.get("A"), Some(3));
        assert_eq!(scores.get("B"), Some(0));
    }

    #[test]
    fn test_unanswered_categories_are_retained_at_zero() {
        let scores = score(&mapping(), vec![("A", Likert::Agree)]).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores.get("C"), Some(0));
    }

    #[test]
    fn test_negative_scores_are_retained() {
        let scores = score(
            &mapping(),
            vec![("B", Likert::StronglyDisagree), ("B", Likert::Disagree)],
        )
        .unwrap();
        assert_eq!(scores.get("B"), Some(-3));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = score(&mapping(), vec![("A", Likert::Agree), ("Sports", Likert::Agree)])
            .unwrap_err();
        assert_eq!(err, AssessmentError::UnknownCategory("Sports".to_string()));
    }

    #[test]
    fn test_scores_follow_mapping_order() {
        let scores = score(&mapping(), vec![("C", Likert::Agree)]).unwrap();
        let order: Vec<_> = scores.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_score_answers_pairs_by_question_index() {
        let data = AssessmentData::new(
            vec![question("A"), question("A"), question("B")],
            mapping(),
        )
        .unwrap();

        let scores = score_answers(
            &data,
            &[Likert::StronglyAgree, Likert::Agree, Likert::Neutral],
        )
        .unwrap();
        assert_eq!(scores.get("A"), Some(3));
        assert_eq!(scores.get("B"), Some(0));
    }

    #[test]
    fn test_score_answers_rejects_missing_answers() {
        let data = AssessmentData::new(vec![question("A"), question("B")], mapping()).unwrap();
        let err = score_answers(&data, &[Likert::Agree]).unwrap_err();
        assert_eq!(err, AssessmentError::AnswerCountMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_score_answers_without_questions() {
        let err = score_answers(&AssessmentData::default(), &[]).unwrap_err();
        assert_eq!(err, AssessmentError::NoQuestions);
    }

    fn likert() -> impl Strategy<Value = Likert> {
        prop::sample::select(Likert::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_one_entry_per_category_and_sums_match(
            answers in prop::collection::vec((0usize..3, likert()), 0..40)
        ) {
            let names = ["A", "B", "C"];
            let scores = score(
                &mapping(),
                answers.iter().map(|(i, a)| (names[*i], *a)),
            ).unwrap();

            prop_assert_eq!(scores.len(), 3);
            for (index, name) in names.iter().enumerate() {
                let expected: i32 = answers
                    .iter()
                    .filter(|(i, _)| *i == index)
                    .map(|(_, a)| a.value())
                    .sum();
                prop_assert_eq!(scores.get(name), Some(expected));
            }
        }
    }
}
