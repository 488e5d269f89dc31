use async_trait::async_trait;
use std::collections::HashMap;
use crate::error::Result;
use crate::model::ReleaseTable;
use crate::report::{descending_by, Mean};
use crate::traits::Aggregator;
use crate::types::{DataRow, DataValue};

/// Desenvolvedores principais com maior média de `meta_score`
///
/// Agrupa por `main_developer` (linhas sem desenvolvedor ficam de fora) e
/// arredonda a média para inteiro. Grupos sem nenhuma nota são excluídos.
#[derive(Debug, Clone)]
pub struct TopDevelopersReport {
    limit: usize,
}

impl TopDevelopersReport {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for TopDevelopersReport {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl Aggregator for TopDevelopersReport {
    async fn aggregate(&self, table: &ReleaseTable) -> Result<Vec<DataRow>> {
        let mut groups: HashMap<&str, Mean> = HashMap::new();
        for release in table {
            if let Some(developer) = release.main_developer.as_deref() {
                groups
                    .entry(developer)
                    .or_default()
                    .push(release.meta_score.map(|s| s as f64));
            }
        }

        let mut ranked: Vec<(&str, i64)> = groups
            .into_iter()
            .filter_map(|(developer, mean)| mean.rounded().map(|avg| (developer, avg)))
            .collect();
        ranked.sort_by(|a, b| descending_by(*a, *b));
        ranked.truncate(self.limit);

        Ok(ranked
            .into_iter()
            .map(|(developer, avg)| {
                let mut row = DataRow::new();
                row.insert("main_developer".to_string(), DataValue::from(developer));
                row.insert("avg_meta_score".to_string(), DataValue::Integer(avg));
                row
            })
            .collect())
    }

    fn name(&self) -> &str {
        "top_developers"
    }
}
