use async_trait::async_trait;
use std::collections::HashMap;
use crate::error::Result;
use crate::model::ReleaseTable;
use crate::report::{descending_by, Mean};
use crate::traits::Aggregator;
use crate::types::{DataRow, DataValue};

/// Média de `user_score` por plataforma, com duas casas, da maior para a menor
#[derive(Debug, Clone, Default)]
pub struct PlatformUserScoreReport;

#[async_trait]
impl Aggregator for PlatformUserScoreReport {
    async fn aggregate(&self, table: &ReleaseTable) -> Result<Vec<DataRow>> {
        let mut groups: HashMap<&str, Mean> = HashMap::new();
        for release in table {
            groups
                .entry(release.platform.as_str())
                .or_default()
                .push(release.user_score);
        }

        let mut ranked: Vec<(&str, f64)> = groups
            .into_iter()
            .filter_map(|(platform, mean)| mean.scaled(2).map(|avg| (platform, avg)))
            .collect();
        ranked.sort_by(|a, b| descending_by(*a, *b));

        Ok(ranked
            .into_iter()
            .map(|(platform, avg)| {
                let mut row = DataRow::new();
                row.insert("platform".to_string(), DataValue::from(platform));
                row.insert("avg_user_score".to_string(), DataValue::Float(avg));
                row
            })
            .collect())
    }

    fn name(&self) -> &str {
        "platform_user_scores"
    }
}
