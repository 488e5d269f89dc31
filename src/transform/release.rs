//! Filtro de lançamento: descarta jogos não lançados ou cancelados.

use async_trait::async_trait;
use regex::Regex;
use crate::error::{ETLError, Result, TransformError};
use crate::types::{DataRow, DataValue};
use crate::traits::Transformer;

/// "<texto livre>, <ano de quatro dígitos começando com 19 ou 20>"
pub const RELEASE_DATE_PATTERN: &str = r"^.+, (19|20)\d{2}$";

/// Mantém apenas linhas cuja data tem o formato de uma data de lançamento
///
/// Placeholders como "TBA", "Cancelled" ou vazio não casam com o padrão e a
/// linha é removida sem erro. Uma data já convertida (`DataValue::Date`) é
/// mantida.
#[derive(Debug, Clone)]
pub struct ReleaseFilter {
    column: String,
    pattern: Regex,
}

impl ReleaseFilter {
    pub fn new(column: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(RELEASE_DATE_PATTERN)
            .map_err(|e| ETLError::Transform(TransformError::ProcessingError(e.to_string())))?;
        Ok(Self {
            column: column.into(),
            pattern,
        })
    }

    /// Decide se a linha representa um título lançado
    pub fn is_released(&self, row: &DataRow) -> bool {
        match row.get(&self.column) {
            Some(DataValue::Date(_)) => true,
            Some(DataValue::String(s)) => self.pattern.is_match(s),
            _ => false,
        }
    }
}

#[async_trait]
impl Transformer for ReleaseFilter {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        let before = data.len();
        let kept: Vec<DataRow> = data
            .into_iter()
            .filter(|row| {
                let keep = self.is_released(row);
                if !keep {
                    tracing::debug!(
                        value = ?row.get(&self.column),
                        "Linha descartada: título não lançado"
                    );
                }
                keep
            })
            .collect();

        tracing::info!(
            dropped = before - kept.len(),
            kept = kept.len(),
            "Filtro de lançamento aplicado"
        );
        Ok(kept)
    }

    fn name(&self) -> &str {
        "release_filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row_with_date(value: DataValue) -> DataRow {
        let mut row = DataRow::new();
        row.insert("issuance_date".to_string(), value);
        row
    }

    #[tokio::test]
    async fn test_release_filter_drops_placeholders() {
        let filter = ReleaseFilter::new("issuance_date").unwrap();
        let data = vec![
            row_with_date(DataValue::from("March 3, 2017")),
            row_with_date(DataValue::from("TBA")),
            row_with_date(DataValue::from("Cancelled")),
            row_with_date(DataValue::from("")),
            row_with_date(DataValue::Null),
            row_with_date(DataValue::from("October 27, 1999")),
        ];

        let result = filter.transform(data).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].get("issuance_date"), Some(&DataValue::from("March 3, 2017")));
        assert_eq!(result[1].get("issuance_date"), Some(&DataValue::from("October 27, 1999")));
    }

    #[test]
    fn test_release_pattern_edges() {
        let filter = ReleaseFilter::new("issuance_date").unwrap();
        let check = |s: &str| filter.is_released(&row_with_date(DataValue::from(s)));

        assert!(check("Q4, 2021"));
        assert!(!check(", 2017"));
        assert!(!check("March 3, 1899"));
        assert!(!check("March 3, 2017 (early access)"));
        assert!(!check("March 3,2017"));
        assert!(!check("2017"));
    }

    #[test]
    fn test_release_filter_missing_column() {
        let filter = ReleaseFilter::new("issuance_date").unwrap();
        assert!(!filter.is_released(&DataRow::new()));
    }

    #[test]
    fn test_release_filter_keeps_parsed_dates() {
        let filter = ReleaseFilter::new("issuance_date").unwrap();
        let date = NaiveDate::from_ymd_opt(2017, 10, 27).unwrap();
        assert!(filter.is_released(&row_with_date(DataValue::Date(date))));
    }
}
