//! CSV-backed sales dataset provider

use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::sales::parse_int_prefix;
use crate::domain::{SalesCategory, SalesRow};
use crate::infrastructure::traits::{FileSystem, SalesDataProvider};

/// Column holding the year of each row.
pub const YEAR_COLUMN: &str = "YEAR";

/// Reads the sales table on every request, like a fresh fetch.
pub struct CsvSalesProvider {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl CsvSalesProvider {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl SalesDataProvider for CsvSalesProvider {
    fn rows(&self, category: SalesCategory) -> ApplicationResult<Vec<SalesRow>> {
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read sales dataset", &self.path)?;
        parse_sales_csv(&content, category.column(), &self.path)
    }
}

/// Extract `(year, raw value)` rows of `column`, keeping file order.
pub fn parse_sales_csv(content: &str, column: &str, path: &Path) -> ApplicationResult<Vec<SalesRow>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ApplicationError::dataset(path, e.to_string()))?
        .clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ApplicationError::dataset(path, format!("missing column '{name}'")))
    };
    let year_col = position(YEAR_COLUMN)?;
    let value_col = position(column)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ApplicationError::dataset(path, e.to_string()))?;
        let year_raw = record.get(year_col).unwrap_or("");
        let Some(year) = parse_int_prefix(year_raw).and_then(|y| i32::try_from(y).ok()) else {
            warn!("skipping sales row with invalid year {:?}", year_raw);
            continue;
        };
        rows.push(SalesRow::new(year, record.get(value_col).unwrap_or("")));
    }
    debug!("parse_sales_csv: {} rows for {}", rows.len(), column);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES: &str = "YEAR,GRAND PIANOS,ELECTRONIC\n1990,\"1,234\",\n1991,,12\nTotal,99,1\n1992,(3 Months),7\n";

    #[test]
    fn given_csv_when_parsing_then_rows_in_file_order() {
        let rows = parse_sales_csv(SALES, "GRAND PIANOS", Path::new("sales.csv")).unwrap();
        assert_eq!(
            rows,
            vec![
                SalesRow::new(1990, "1,234"),
                SalesRow::new(1991, ""),
                SalesRow::new(1992, "(3 Months)"),
            ]
        );
    }

    #[test]
    fn given_missing_column_when_parsing_then_dataset_error() {
        let err = parse_sales_csv(SALES, "PNEUMATIC PLAYERS", Path::new("sales.csv")).unwrap_err();
        assert!(matches!(err, ApplicationError::Dataset { .. }));
        assert!(err.to_string().contains("PNEUMATIC PLAYERS"));
    }
}
