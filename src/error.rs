use thiserror::Error;

/// Faults in the assessment document or in the answers fed to the scorer.
///
/// All of these are configuration or programming errors: the scorer never
/// substitutes a default for an answer or category it does not recognise.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("Unknown answer '{0}', expected one of: Strongly Disagree, Disagree, Neutral, Agree, Strongly Agree")]
    UnknownAnswer(String),

    #[error("Question {index} references category '{category}' which has no subject mapping")]
    UnmappedQuestionCategory { index: usize, category: String },

    #[error("Answer references unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("Assessment has no questions loaded")]
    NoQuestions,

    #[error("Assessment is already complete")]
    AlreadyComplete,

    #[error("Assessment is not complete yet ({answered}/{total} answered)")]
    Incomplete { answered: usize, total: usize },
}

/// Faults while querying the university catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),
}
