//! # JSON Loader
//!
//! Grava linhas como um array JSON. Usado para a tabela limpa e para cada
//! relatório (`<reports_dir>/<nome>.json`).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use crate::error::{LoadError, Result};
use crate::types::{DataRow, PipelineResult};
use crate::traits::Loader;
use super::common::{loaded, parent_dir_exists, DataFormatter};

/// Carregador para arquivos JSON
///
/// Datas saem como `YYYY-MM-DD` e ausências como `null`. Com
/// [`with_columns`](JsonLoader::with_columns) apenas as colunas listadas são
/// gravadas.
#[derive(Debug, Clone)]
pub struct JsonLoader {
    file_path: PathBuf,
    pretty: bool,
    columns: Option<Vec<String>>,
}

impl JsonLoader {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            pretty: false,
            columns: None,
        }
    }

    /// Define se deve usar formatação pretty-print
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Restringe a saída a estas colunas
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn render(&self, data: &[DataRow]) -> Result<String> {
        let rows: Vec<serde_json::Value> = data
            .iter()
            .map(|row| match &self.columns {
                Some(columns) => serde_json::to_value(DataFormatter::project(row, columns)),
                None => serde_json::to_value(row),
            })
            .collect::<std::result::Result<_, _>>()?;

        let array = serde_json::Value::Array(rows);
        let text = if self.pretty {
            serde_json::to_string_pretty(&array)?
        } else {
            serde_json::to_string(&array)?
        };
        Ok(text)
    }
}

#[async_trait]
impl Loader for JsonLoader {
    async fn load(&self, data: Vec<DataRow>) -> Result<PipelineResult> {
        let start = std::time::Instant::now();
        let text = self.render(&data)?;

        tokio::fs::write(&self.file_path, text).await.map_err(|e| {
            LoadError::WriteError(format!("{}: {}", self.file_path.display(), e))
        })?;

        tracing::debug!(file = %self.file_path.display(), rows = data.len(), "JSON gravado");
        Ok(loaded(data.len(), start))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(parent_dir_exists(&self.file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataValue;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn halo() -> DataRow {
        let mut row = DataRow::new();
        row.insert("title".to_string(), DataValue::from("Halo"));
        row.insert("meta_score".to_string(), DataValue::Integer(97));
        row.insert("user_score".to_string(), DataValue::Null);
        row.insert(
            "issuance_date".to_string(),
            DataValue::Date(NaiveDate::from_ymd_opt(2001, 11, 15).unwrap()),
        );
        row.insert("source_line".to_string(), DataValue::Integer(2));
        row
    }

    #[tokio::test]
    async fn test_json_loader_writes_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clean.json");

        let result = JsonLoader::new(&path).load(vec![halo()]).await.unwrap();
        assert_eq!(result.rows_successful, 1);

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["issuance_date"], "2001-11-15");
        assert_eq!(parsed[0]["meta_score"], 97);
        assert!(parsed[0]["user_score"].is_null());
    }

    #[tokio::test]
    async fn test_json_loader_projection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clean.json");

        JsonLoader::new(&path)
            .with_pretty(true)
            .with_columns(&["title", "meta_score"])
            .load(vec![halo()])
            .await
            .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let object = parsed[0].as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.get("source_line").is_none());
    }

    #[tokio::test]
    async fn test_json_loader_empty_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");

        JsonLoader::new(&path).load(vec![]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_json_loader_health_check() {
        assert!(JsonLoader::new("report.json").health_check().await.unwrap());
        assert!(!JsonLoader::new("/definitely/not/here/report.json")
            .health_check()
            .await
            .unwrap());
    }
}
