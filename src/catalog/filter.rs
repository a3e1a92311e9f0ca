use super::UniversityRecord;
use crate::error::CatalogError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

/// Which columns the free-text query searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// University name only
    #[default]
    Name,
    /// University name, subject list and continent
    Broad,
}

/// Finder filters. Criteria are AND-combined; values within one criterion
/// are OR-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// `None` keeps every continent. `Some(vec![])` keeps nothing.
    pub continents: Option<Vec<String>>,
    pub subjects: Vec<String>,
    pub levels: Vec<String>,
    pub query: Option<String>,
    pub scope: SearchScope,
}

pub(super) struct CompiledFilter<'a> {
    criteria: &'a FilterCriteria,
    subjects: Option<Regex>,
    levels: Option<Regex>,
    query: Option<String>,
}

/// Case-insensitive alternation of the selected values, each matched literally.
fn alternation(values: &[String]) -> Result<Option<Regex>, CatalogError> {
    let alternatives: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    let regex = RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()?;
    Ok(Some(regex))
}

impl FilterCriteria {
    pub(super) fn compile(&self) -> Result<CompiledFilter<'_>, CatalogError> {
        Ok(CompiledFilter {
            criteria: self,
            subjects: alternation(&self.subjects)?,
            levels: alternation(&self.levels)?,
            query: self
                .query
                .as_deref()
                .filter(|q| !q.is_empty())
                .map(str::to_lowercase),
        })
    }
}

impl CompiledFilter<'_> {
    pub(super) fn matches(&self, record: &UniversityRecord) -> bool {
        if let Some(continents) = &self.criteria.continents {
            if !continents.iter().any(|c| c.trim() == record.continent) {
                return false;
            }
        }

        if let Some(subjects) = &self.subjects {
            if !subjects.is_match(&record.subject) {
                return false;
            }
        }

        if let Some(levels) = &self.levels {
            if !levels.is_match(&record.level) {
                return false;
            }
        }

        if let Some(query) = &self.query {
            let contains = |field: &str| field.to_lowercase().contains(query.as_str());
            let hit = match self.criteria.scope {
                SearchScope::Name => contains(&record.university),
                SearchScope::Broad => {
                    contains(&record.university)
                        || contains(&record.subject)
                        || contains(&record.continent)
                }
            };
            if !hit {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::catalog::Catalog;

    fn names(rows: &[&UniversityRecord]) -> Vec<String> {
        rows.iter().map(|r| r.university.clone()).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_criteria_keep_everything() {
        let catalog = sample_catalog();
        let rows = catalog.filter(&FilterCriteria::default()).unwrap();
        assert_eq!(rows.len(), catalog.len());
    }

    #[test]
    fn test_empty_continent_selection_yields_nothing() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            continents: Some(vec![]),
            subjects: strings(&["Physics"]),
            query: Some("ETH".to_string()),
            ..Default::default()
        };
        assert!(catalog.filter(&criteria).unwrap().is_empty());
    }

    #[test]
    fn test_continent_membership_is_exact() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            continents: Some(strings(&["Asia", "Africa"])),
            ..Default::default()
        };
        assert_eq!(
            names(&catalog.filter(&criteria).unwrap()),
            vec!["University of Tokyo", "Universitas Indonesia", "Unranked College"]
        );

        let lowercase = FilterCriteria {
            continents: Some(strings(&["asia"])),
            ..Default::default()
        };
        assert!(catalog.filter(&lowercase).unwrap().is_empty());
    }

    #[test]
    fn test_padded_continent_cell_matches_its_option() {
        let csv = "University,Continent,Subject,Level,Rank\nX,Asia ,Art,Bachelor,1\nY, Europe,Art,Bachelor,2\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(catalog.continents(), vec!["Asia", "Europe"]);

        let criteria = FilterCriteria {
            continents: Some(catalog.continents()),
            ..Default::default()
        };
        assert_eq!(names(&catalog.filter(&criteria).unwrap()), vec!["X", "Y"]);
    }

    #[test]
    fn test_subjects_match_any_selected() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            subjects: strings(&["law", "computer science"]),
            ..Default::default()
        };
        assert_eq!(
            names(&catalog.filter(&criteria).unwrap()),
            vec!["Harvard University", "ETH Zurich"]
        );
    }

    #[test]
    fn test_selected_values_are_matched_literally() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            subjects: strings(&["Art.*"]),
            ..Default::default()
        };
        assert!(catalog.filter(&criteria).unwrap().is_empty());
    }

    #[test]
    fn test_levels_and_continents_are_combined() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            continents: Some(strings(&["Europe"])),
            levels: strings(&["PhD"]),
            ..Default::default()
        };
        assert_eq!(names(&catalog.filter(&criteria).unwrap()), vec!["ETH Zurich"]);
    }

    #[test]
    fn test_name_query_ignores_other_columns() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            query: Some("asia".to_string()),
            scope: SearchScope::Name,
            ..Default::default()
        };
        assert!(catalog.filter(&criteria).unwrap().is_empty());
    }

    #[test]
    fn test_broad_query_searches_subject_and_continent() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            query: Some("asia".to_string()),
            scope: SearchScope::Broad,
            ..Default::default()
        };
        assert_eq!(
            names(&catalog.filter(&criteria).unwrap()),
            vec!["University of Tokyo", "Universitas Indonesia"]
        );

        let by_subject = FilterCriteria {
            query: Some("history".to_string()),
            scope: SearchScope::Broad,
            ..Default::default()
        };
        assert_eq!(
            names(&catalog.filter(&by_subject).unwrap()),
            vec!["Sorbonne University"]
        );
    }

    #[test]
    fn test_empty_query_is_ignored() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            query: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(catalog.filter(&criteria).unwrap().len(), catalog.len());
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            query: Some("UNIVERSITAS".to_string()),
            ..Default::default()
        };
        assert_eq!(
            names(&catalog.filter(&criteria).unwrap()),
            vec!["Universitas Indonesia"]
        );
    }

    #[test]
    fn test_search_scope_deserializes_lowercase() {
        let scope: SearchScope = serde_json::from_str("\"broad\"").unwrap();
        assert_eq!(scope, SearchScope::Broad);
    }
}
