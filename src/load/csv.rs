//! # CSV Loader
//!
//! Grava a tabela limpa em CSV com ordem de colunas fixa. Ausências saem
//! como campo vazio e datas como `YYYY-MM-DD`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use crate::error::{LoadError, Result};
use crate::model::GameRelease;
use crate::types::{DataRow, DataValue, PipelineResult};
use crate::traits::Loader;
use super::common::{loaded, parent_dir_exists, DataFormatter};

#[derive(Debug, Clone)]
pub struct CsvLoader {
    file_path: PathBuf,
    delimiter: u8,
    columns: Vec<String>,
}

impl CsvLoader {
    /// Loader com as colunas da tabela limpa
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            delimiter: b',',
            columns: GameRelease::COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Substitui a lista (e a ordem) de colunas gravadas
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    fn render(&self, data: &[DataRow]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        let write_error = |e: csv::Error| LoadError::WriteError(e.to_string());

        writer.write_record(&self.columns).map_err(write_error)?;
        for row in data {
            writer
                .write_record(self.columns.iter().map(|column| {
                    row.get(column)
                        .map(DataFormatter::format_value)
                        .unwrap_or_default()
                }))
                .map_err(write_error)?;
        }

        writer
            .into_inner()
            .map_err(|e| LoadError::WriteError(e.to_string()).into())
    }
}

#[async_trait]
impl Loader for CsvLoader {
    async fn load(&self, data: Vec<DataRow>) -> Result<PipelineResult> {
        let start = std::time::Instant::now();
        let bytes = self.render(&data)?;

        tokio::fs::write(&self.file_path, bytes).await.map_err(|e| {
            LoadError::WriteError(format!("{}: {}", self.file_path.display(), e))
        })?;

        let nulls = data
            .iter()
            .flat_map(|row| self.columns.iter().filter_map(|c| row.get(c)))
            .filter(|v| matches!(v, DataValue::Null))
            .count();
        tracing::debug!(
            file = %self.file_path.display(),
            rows = data.len(),
            null_fields = nulls,
            "CSV gravado"
        );

        Ok(loaded(data.len(), start))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(parent_dir_exists(&self.file_path))
    }
}
