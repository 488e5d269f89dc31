//! Utilitários compartilhados pelos loaders de arquivo e console.

use std::path::Path;
use crate::types::{DataRow, DataValue, PipelineResult};

/// Formatação textual de valores e linhas
pub struct DataFormatter;

impl DataFormatter {
    /// Texto de um valor; ausência vira campo vazio
    pub fn format_value(value: &DataValue) -> String {
        match value {
            DataValue::Null => String::new(),
            other => other.as_string().unwrap_or_default(),
        }
    }

    /// Linha em formato `coluna: valor | coluna: valor`
    pub fn format_row(row: &DataRow) -> String {
        row.iter()
            .map(|(key, value)| match value {
                DataValue::Null => format!("{}: -", key),
                other => format!("{}: {}", key, Self::format_value(other)),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Mantém apenas as colunas pedidas; as ausentes entram como `Null`
    pub fn project(row: &DataRow, columns: &[String]) -> DataRow {
        columns
            .iter()
            .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(DataValue::Null)))
            .collect()
    }
}

/// Resultado padrão de um carregamento que aceitou todas as linhas
pub(crate) fn loaded(rows: usize, start: std::time::Instant) -> PipelineResult {
    PipelineResult {
        rows_processed: rows,
        rows_successful: rows,
        execution_time_ms: start.elapsed().as_millis() as u64,
        ..PipelineResult::default()
    }
}

/// O diretório de destino existe? Caminho relativo sem diretório conta como atual.
pub(crate) fn parent_dir_exists(file_path: &Path) -> bool {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(DataFormatter::format_value(&DataValue::from("Halo")), "Halo");
        assert_eq!(DataFormatter::format_value(&DataValue::Integer(97)), "97");
        assert_eq!(DataFormatter::format_value(&DataValue::Float(8.5)), "8.5");
        assert_eq!(DataFormatter::format_value(&DataValue::Null), "");
    }

    #[test]
    fn test_format_row_is_ordered() {
        let mut row = DataRow::new();
        row.insert("title".to_string(), DataValue::from("Halo"));
        row.insert("meta_score".to_string(), DataValue::Integer(97));
        row.insert("esrb_rating".to_string(), DataValue::Null);

        assert_eq!(
            DataFormatter::format_row(&row),
            "esrb_rating: - | meta_score: 97 | title: Halo"
        );
    }

    #[test]
    fn test_project_fills_missing_columns() {
        let mut row = DataRow::new();
        row.insert("title".to_string(), DataValue::from("Halo"));
        row.insert("source_line".to_string(), DataValue::Integer(4));

        let columns = vec!["title".to_string(), "sub_genre_3".to_string()];
        let projected = DataFormatter::project(&row, &columns);

        assert_eq!(projected.len(), 2);
        assert_eq!(projected.get("sub_genre_3"), Some(&DataValue::Null));
        assert_eq!(projected.get("source_line"), None);
    }

    #[test]
    fn test_parent_dir_exists() {
        assert!(parent_dir_exists(Path::new("out.csv")));
        assert!(!parent_dir_exists(Path::new("/definitely/not/here/out.csv")));
    }
}
