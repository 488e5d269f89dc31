use async_trait::async_trait;
use crate::error::Result;
use crate::types::{DataRow, DataValue};
use crate::traits::Transformer;

/// Converte o sentinela "" em ausência real (`DataValue::Null`)
///
/// Só a string vazia exata é normalizada; strings só com espaços continuam
/// como estão e falham mais adiante na conversão de tipos.
#[derive(Debug, Clone)]
pub struct NullNormalizer {
    columns: Vec<String>,
}

impl NullNormalizer {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Transformer for NullNormalizer {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        let mut normalized = 0usize;
        let data: Vec<DataRow> = data
            .into_iter()
            .map(|mut row| {
                for column in &self.columns {
                    if let Some(value) = row.get_mut(column) {
                        if matches!(value, DataValue::String(s) if s.is_empty()) {
                            *value = DataValue::Null;
                            normalized += 1;
                        }
                    }
                }
                row
            })
            .collect();

        tracing::debug!(normalized, "Valores vazios convertidos em nulos");
        Ok(data)
    }

    fn name(&self) -> &str {
        "null_normalizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(meta: DataValue, user: DataValue, esrb: DataValue) -> DataRow {
        let mut row = DataRow::new();
        row.insert("meta_score".to_string(), meta);
        row.insert("user_score".to_string(), user);
        row.insert("esrb_rating".to_string(), esrb);
        row.insert("title".to_string(), DataValue::from(""));
        row
    }

    #[tokio::test]
    async fn test_empty_strings_become_null() {
        let normalizer = NullNormalizer::new(&["meta_score", "user_score", "esrb_rating"]);
        let data = vec![row(DataValue::from(""), DataValue::from("8.5"), DataValue::from(""))];

        let result = normalizer.transform(data).await.unwrap();
        assert_eq!(result[0].get("meta_score"), Some(&DataValue::Null));
        assert_eq!(result[0].get("user_score"), Some(&DataValue::from("8.5")));
        assert_eq!(result[0].get("esrb_rating"), Some(&DataValue::Null));
        // colunas fora da lista não são tocadas
        assert_eq!(result[0].get("title"), Some(&DataValue::from("")));
    }

    #[tokio::test]
    async fn test_zero_and_whitespace_are_kept() {
        let normalizer = NullNormalizer::new(&["meta_score", "user_score", "esrb_rating"]);
        let data = vec![row(DataValue::from("0"), DataValue::from(" "), DataValue::Integer(0))];

        let result = normalizer.transform(data).await.unwrap();
        assert_eq!(result[0].get("meta_score"), Some(&DataValue::from("0")));
        assert_eq!(result[0].get("user_score"), Some(&DataValue::from(" ")));
        assert_eq!(result[0].get("esrb_rating"), Some(&DataValue::Integer(0)));
    }
}
