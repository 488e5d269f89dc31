use async_trait::async_trait;
use std::collections::HashSet;
use crate::error::Result;
use crate::types::{DataRow, DataValue};
use crate::traits::Transformer;

/// Mantém a primeira linha de cada chave composta e descarta as repetidas
#[derive(Debug, Clone)]
pub struct DeduplicateTransform {
    key_columns: Vec<String>,
}

impl DeduplicateTransform {
    pub fn new(key_columns: &[&str]) -> Self {
        Self {
            key_columns: key_columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Chave (título, plataforma) de um lançamento
    pub fn by_release() -> Self {
        Self::new(&["title", "platform"])
    }

    fn key(&self, row: &DataRow) -> Vec<Option<String>> {
        self.key_columns
            .iter()
            .map(|column| row.get(column).and_then(DataValue::as_string))
            .collect()
    }
}

#[async_trait]
impl Transformer for DeduplicateTransform {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        let before = data.len();
        let mut seen = HashSet::new();
        let kept: Vec<DataRow> = data
            .into_iter()
            .filter(|row| seen.insert(self.key(row)))
            .collect();

        let dropped = before - kept.len();
        if dropped > 0 {
            tracing::warn!(dropped, keys = ?self.key_columns, "Linhas duplicadas descartadas");
        }
        Ok(kept)
    }

    fn name(&self) -> &str {
        "deduplicate"
    }
}
