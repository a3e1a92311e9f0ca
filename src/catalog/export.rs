use super::{UniversityRecord, COLUMNS};
use anyhow::{Context, Result};

/// Download name for finder exports.
pub const EXPORT_FILE_NAME: &str = "gerbang_kampus_universities.csv";

/// Serialize rows as UTF-8 CSV. The header row is written even when `rows`
/// is empty.
pub fn export_csv(rows: &[&UniversityRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row for {}", row.university))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::catalog::{Catalog, FilterCriteria};

    #[test]
    fn test_export_contains_header_and_filtered_rows() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            continents: Some(vec!["Europe".to_string()]),
            ..Default::default()
        };
        let rows = catalog.filter(&criteria).unwrap();

        let bytes = export_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], COLUMNS.join(","));
        assert!(lines[1].starts_with("ETH Zurich,Europe,"));
        assert!(lines[2].starts_with("Sorbonne University,Europe,"));
    }

    #[test]
    fn test_export_keeps_raw_rank_text() {
        let csv = "University,Continent,Subject,Level,Rank\nBand,Asia,Physics,Bachelor,101-150\nUnknown,Asia,Art,Bachelor,N/A\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        let rows: Vec<_> = catalog.records().iter().collect();

        let text = String::from_utf8(export_csv(&rows).unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[1].starts_with("Band,Asia,Physics,Bachelor,101-150,"));
        assert!(lines[2].starts_with("Unknown,Asia,Art,Bachelor,N/A,"));
    }

    #[test]
    fn test_export_of_empty_view_is_header_only() {
        let text = String::from_utf8(export_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn test_export_reloads_to_same_rows() {
        let catalog = sample_catalog();
        let rows: Vec<_> = catalog.records().iter().collect();
        let bytes = export_csv(&rows).unwrap();

        let reloaded = Catalog::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(reloaded.records(), catalog.records());
    }
}
