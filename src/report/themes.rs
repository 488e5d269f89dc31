use async_trait::async_trait;
use std::fmt;
use crate::error::Result;
use crate::model::ReleaseTable;
use crate::report::Mean;
use crate::traits::Aggregator;
use crate::types::{DataRow, DataValue};

/// Classe temática de um título
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Pokemon,
    Mario,
    Zelda,
    Other,
}

impl Theme {
    /// Classes na ordem de prioridade; a primeira que casar vence
    pub const PRIORITY: [Theme; 4] = [Theme::Pokemon, Theme::Mario, Theme::Zelda, Theme::Other];

    fn keyword(self) -> Option<&'static str> {
        match self {
            Theme::Pokemon => Some("pokemon"),
            Theme::Mario => Some("mario"),
            Theme::Zelda => Some("zelda"),
            Theme::Other => None,
        }
    }

    /// Classifica por substring, sem diferenciar maiúsculas
    pub fn classify(title: &str) -> Theme {
        let title = title.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|theme| theme.keyword().map_or(true, |k| title.contains(k)))
            .unwrap_or(Theme::Other)
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Pokemon => "Pokemon game",
            Theme::Mario => "Mario game",
            Theme::Zelda => "Zelda game",
            Theme::Other => "Other-topic game",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Média de `meta_score` por classe temática, em ordem de prioridade
///
/// Classes sem nenhuma nota ficam de fora.
#[derive(Debug, Clone, Default)]
pub struct ThemeReport;

#[async_trait]
impl Aggregator for ThemeReport {
    async fn aggregate(&self, table: &ReleaseTable) -> Result<Vec<DataRow>> {
        let mut means = [Mean::default(); 4];
        for release in table {
            means[Theme::classify(&release.title).index()].push(release.meta_score.map(|s| s as f64));
        }

        Ok(Theme::PRIORITY
            .into_iter()
            .filter_map(|theme| {
                let avg = means[theme.index()].scaled(2)?;
                let mut row = DataRow::new();
                row.insert("theme".to_string(), DataValue::from(theme.label()));
                row.insert("avg_meta_score".to_string(), DataValue::Float(avg));
                Some(row)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "themes"
    }
}
