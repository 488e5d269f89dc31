use async_trait::async_trait;
use chrono::{Datelike, Month};
use std::collections::BTreeMap;
use crate::error::Result;
use crate::model::ReleaseTable;
use crate::report::Mean;
use crate::traits::Aggregator;
use crate::types::{DataRow, DataValue};

/// Médias por mês do calendário, somando todos os anos
///
/// Só aparecem meses com ao menos um lançamento; uma média sem valores fica
/// `Null` na linha do mês.
#[derive(Debug, Clone, Default)]
pub struct MonthlyReport;

#[derive(Default)]
struct MonthScores {
    user: Mean,
    meta: Mean,
}

#[async_trait]
impl Aggregator for MonthlyReport {
    async fn aggregate(&self, table: &ReleaseTable) -> Result<Vec<DataRow>> {
        let mut months: BTreeMap<u32, MonthScores> = BTreeMap::new();
        for release in table {
            let scores = months.entry(release.issuance_date.month()).or_default();
            scores.user.push(release.user_score);
            scores.meta.push(release.meta_score.map(|s| s as f64));
        }

        Ok(months
            .into_iter()
            .map(|(number, scores)| {
                let name = u8::try_from(number)
                    .ok()
                    .and_then(|n| Month::try_from(n).ok())
                    .map(|m| m.name())
                    .unwrap_or_default();

                let mut row = DataRow::new();
                row.insert("month_name".to_string(), DataValue::from(name));
                row.insert("month_number".to_string(), DataValue::Integer(number as i64));
                row.insert("avg_user_score".to_string(), DataValue::from(scores.user.scaled(2)));
                row.insert("avg_meta_score".to_string(), DataValue::from(scores.meta.rounded()));
                row
            })
            .collect())
    }

    fn name(&self) -> &str {
        "monthly_scores"
    }
}
