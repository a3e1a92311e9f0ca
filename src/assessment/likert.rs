use crate::error::AssessmentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A five-point agreement answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Likert {
    #[serde(rename = "Strongly Disagree")]
    StronglyDisagree,
    #[serde(rename = "Disagree")]
    Disagree,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Agree")]
    Agree,
    #[serde(rename = "Strongly Agree")]
    StronglyAgree,
}

impl Likert {
    /// All answers in presentation order.
    pub const ALL: [Likert; 5] = [
        Likert::StronglyDisagree,
        Likert::Disagree,
        Likert::Neutral,
        Likert::Agree,
        Likert::StronglyAgree,
    ];

    /// Points contributed to the answer's category.
    pub fn value(self) -> i32 {
        match self {
            Likert::StronglyDisagree => -2,
            Likert::Disagree => -1,
            Likert::Neutral => 0,
            Likert::Agree => 1,
            Likert::StronglyAgree => 2,
        }
    }

    /// English label, also the source text handed to the translator.
    pub fn label(self) -> &'static str {
        match self {
            Likert::StronglyDisagree => "Strongly Disagree",
            Likert::Disagree => "Disagree",
            Likert::Neutral => "Neutral",
            Likert::Agree => "Agree",
            Likert::StronglyAgree => "Strongly Agree",
        }
    }
}

impl fmt::Display for Likert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Likert {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Likert::ALL
            .into_iter()
            .find(|answer| answer.label() == s.trim())
            .ok_or_else(|| AssessmentError::UnknownAnswer(s.to_string()))
    }
}
