//! University catalog: the read-only dataset behind the finder and the
//! per-subject university lists shown with recommendations.

mod export;
mod filter;

pub use export::{export_csv, EXPORT_FILE_NAME};
pub use filter::{FilterCriteria, SearchScope};

use crate::error::CatalogError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Column order of the dataset file, reused for exports.
pub const COLUMNS: [&str; 10] = [
    "University",
    "Continent",
    "Subject",
    "Level",
    "Rank",
    "Website",
    "Email",
    "Application_Open",
    "Tuition_USD_Range",
    "Subject_Expertise",
];

/// One row of the university dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityRecord {
    #[serde(rename = "University")]
    pub university: String,
    #[serde(rename = "Continent")]
    pub continent: String,
    /// `;`-delimited subject list
    #[serde(rename = "Subject")]
    pub subject: String,
    /// `;`-delimited degree levels
    #[serde(rename = "Level")]
    pub level: String,
    /// Raw rank cell ("7", "101-150", "N/A" or blank), shown and exported as-is.
    #[serde(rename = "Rank", default)]
    pub rank: String,
    #[serde(rename = "Website", default)]
    pub website: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Application_Open", default)]
    pub application_open: String,
    #[serde(rename = "Tuition_USD_Range", default)]
    pub tuition_usd_range: String,
    #[serde(rename = "Subject_Expertise", default)]
    pub subject_expertise: String,
}

impl UniversityRecord {
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        split_list(&self.subject)
    }

    pub fn levels(&self) -> impl Iterator<Item = &str> {
        split_list(&self.level)
    }

    /// Numeric sort key: the leading number of the rank cell, so a band
    /// like "101-150" sorts at 101. `None` when the cell has no digits.
    pub fn rank_order(&self) -> Option<u32> {
        let rank = self.rank.trim();
        let end = rank
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rank.len());
        rank[..end].parse().ok()
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Universities offering a recommended subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectUniversities<'a> {
    Found(Vec<&'a UniversityRecord>),
    NoneFound,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<UniversityRecord>,
}

impl Catalog {
    pub fn new(records: Vec<UniversityRecord>) -> Self {
        Self { records }
    }

    /// Parse CSV with a header row. Columns are matched by name.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (line, row) in rdr.deserialize::<UniversityRecord>().enumerate() {
            let record =
                row.with_context(|| format!("Malformed university record at row {}", line + 1))?;
            if record.rank_order().is_none() {
                debug!("University '{}' has no numeric rank", record.university);
            }
            records.push(record);
        }

        if records.is_empty() {
            warn!("University dataset contains no rows");
        }
        Ok(Self { records })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open university dataset {}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn records(&self) -> &[UniversityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct continents.
    pub fn continents(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.continent.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct subjects across all rows.
    pub fn subjects(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(UniversityRecord::subjects)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct degree levels across all rows.
    pub fn levels(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(UniversityRecord::levels)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows matching every criterion, in dataset order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<Vec<&UniversityRecord>, CatalogError> {
        let matcher = criteria.compile()?;
        Ok(self.records.iter().filter(|r| matcher.matches(r)).collect())
    }

    /// Best-ranked universities whose subject list mentions `subject`.
    ///
    /// Matching is a case-insensitive substring test on the raw `Subject`
    /// field, so "Art" also matches "Liberal Arts". Unranked rows come last.
    pub fn top_universities_for_subject(&self, subject: &str, k: usize) -> SubjectUniversities<'_> {
        let needle = subject.to_lowercase();
        let mut matches: Vec<&UniversityRecord> = self
            .records
            .iter()
            .filter(|r| r.subject.to_lowercase().contains(&needle))
            .collect();

        if matches.is_empty() {
            return SubjectUniversities::NoneFound;
        }

        matches.sort_by_key(|r| {
            let order = r.rank_order();
            (order.is_none(), order)
        });
        matches.truncate(k);
        SubjectUniversities::Found(matches)
    }
}
