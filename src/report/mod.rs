//! # Relatórios
//!
//! Agregações somente leitura sobre a [`ReleaseTable`]. Cada relatório é
//! independente dos demais. Valores ausentes ficam de fora das médias, nunca
//! contam como zero, e um grupo sem nenhum valor tem média indefinida.

pub mod developers;
pub mod platforms;
pub mod themes;
pub mod monthly;

use crate::config::ReportsConfig;
use crate::error::Result;
use crate::model::ReleaseTable;
use crate::traits::Aggregator;
use crate::transform::coerce::round_to;
use crate::types::DataRow;
use futures::future::try_join_all;
use std::cmp::Ordering;

pub use developers::TopDevelopersReport;
pub use monthly::MonthlyReport;
pub use platforms::PlatformUserScoreReport;
pub use themes::{Theme, ThemeReport};

/// Média incremental que ignora ausências
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    /// Quantidade de valores presentes
    pub fn count(&self) -> usize {
        self.count
    }

    /// `None` quando nenhum valor presente foi visto
    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Média arredondada para o inteiro mais próximo
    pub fn rounded(&self) -> Option<i64> {
        self.value().map(|mean| mean.round() as i64)
    }

    /// Média com `scale` casas decimais
    pub fn scaled(&self, scale: u32) -> Option<f64> {
        self.value().map(|mean| round_to(mean, scale))
    }
}

impl FromIterator<Option<f64>> for Mean {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut mean = Mean::default();
        for value in iter {
            mean.push(value);
        }
        mean
    }
}

/// Ordem decrescente por valor, desempatada pela chave em ordem crescente
pub(crate) fn descending_by<V: PartialOrd>(a: (&str, V), b: (&str, V)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(b.0))
}

/// Um relatório calculado
#[derive(Debug, Clone)]
pub struct NamedReport {
    pub name: String,
    pub rows: Vec<DataRow>,
}

/// Os quatro relatórios, sempre na mesma ordem
pub struct ReportSet {
    reports: Vec<Box<dyn Aggregator>>,
}

impl ReportSet {
    pub fn new(config: &ReportsConfig) -> Self {
        Self {
            reports: vec![
                Box::new(TopDevelopersReport::new(config.top_developers)),
                Box::new(PlatformUserScoreReport),
                Box::new(ThemeReport),
                Box::new(MonthlyReport),
            ],
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.name()).collect()
    }

    /// Calcula todos os relatórios sobre a mesma tabela
    pub async fn run(&self, table: &ReleaseTable) -> Result<Vec<NamedReport>> {
        let results = try_join_all(self.reports.iter().map(|report| report.aggregate(table))).await?;

        Ok(self
            .reports
            .iter()
            .zip(results)
            .map(|(report, rows)| {
                tracing::info!(report = report.name(), rows = rows.len(), "Relatório calculado");
                NamedReport {
                    name: report.name().to_string(),
                    rows,
                }
            })
            .collect())
    }
}

impl Default for ReportSet {
    fn default() -> Self {
        Self::new(&ReportsConfig::default())
    }
}
