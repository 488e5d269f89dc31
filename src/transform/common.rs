use async_trait::async_trait;
use std::collections::HashMap;
use crate::error::Result;
use crate::types::DataRow;
use crate::traits::Transformer;

/// Transformador que remove colunas específicas
#[derive(Debug, Clone)]
pub struct RemoveColumnsTransform {
    columns: Vec<String>,
}

impl RemoveColumnsTransform {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn single(column: impl Into<String>) -> Self {
        Self {
            columns: vec![column.into()],
        }
    }
}

#[async_trait]
impl Transformer for RemoveColumnsTransform {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        Ok(data.into_iter()
            .map(|mut row| {
                for column in &self.columns {
                    row.remove(column);
                }
                row
            })
            .collect())
    }

    fn name(&self) -> &str {
        "remove_columns"
    }
}

/// Transformador que renomeia colunas
///
/// Se o nome de destino já existir na linha, ele é mantido e a coluna antiga
/// é descartada; assim reaplicar a renomeação numa tabela já limpa não perde dados.
#[derive(Debug, Clone)]
pub struct RenameColumnsTransform {
    mappings: HashMap<String, String>,
}

impl RenameColumnsTransform {
    pub fn new(mappings: HashMap<String, String>) -> Self {
        Self { mappings }
    }

    pub fn single(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        let mut mappings = HashMap::new();
        mappings.insert(old_name.into(), new_name.into());
        Self { mappings }
    }
}

#[async_trait]
impl Transformer for RenameColumnsTransform {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        Ok(data.into_iter()
            .map(|mut row| {
                for (old_name, new_name) in &self.mappings {
                    if let Some(value) = row.remove(old_name) {
                        row.entry(new_name.clone()).or_insert(value);
                    }
                }
                row
            })
            .collect())
    }

    fn name(&self) -> &str {
        "rename_columns"
    }
}

/// Transformador que combina múltiplas transformações em sequência
pub struct CompositeTransformer {
    name: String,
    transformers: Vec<Box<dyn Transformer + Send + Sync>>,
}

impl CompositeTransformer {
    pub fn new() -> Self {
        Self::named("composite")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transformers: Vec::new(),
        }
    }

    pub fn add<T: Transformer + Send + Sync + 'static>(mut self, transformer: T) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Nomes das etapas, na ordem de execução
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages().into_iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl Default for CompositeTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transformer for CompositeTransformer {
    async fn transform(&self, mut data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        for transformer in &self.transformers {
            let rows_in = data.len();
            data = transformer.transform(data).await?;
            tracing::info!(
                stage = transformer.name(),
                rows_in = rows_in,
                rows_out = data.len(),
                "Etapa concluída"
            );
        }
        Ok(data)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stages(&self) -> Vec<&dyn Transformer> {
        self.transformers
            .iter()
            .map(|t| t.as_ref() as &dyn Transformer)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataValue;

    fn row(pairs: &[(&str, DataValue)]) -> DataRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[tokio::test]
    async fn test_remove_columns_transform() {
        let data = vec![row(&[
            ("title", DataValue::from("Halo")),
            ("link", DataValue::from("/game/xbox/halo")),
        ])];

        let result = RemoveColumnsTransform::single("link").transform(data).await.unwrap();
        assert_eq!(result[0].get("link"), None);
        assert_eq!(result[0].get("title"), Some(&DataValue::from("Halo")));
    }

    #[tokio::test]
    async fn test_rename_keeps_existing_target() {
        let data = vec![
            row(&[("date", DataValue::from("March 3, 2017"))]),
            row(&[
                ("date", DataValue::from("stale")),
                ("issuance_date", DataValue::from("kept")),
            ]),
        ];

        let transform = RenameColumnsTransform::single("date", "issuance_date");
        let result = transform.transform(data).await.unwrap();

        assert_eq!(result[0].get("issuance_date"), Some(&DataValue::from("March 3, 2017")));
        assert_eq!(result[0].get("date"), None);
        assert_eq!(result[1].get("issuance_date"), Some(&DataValue::from("kept")));
        assert_eq!(result[1].get("date"), None);
    }

    #[tokio::test]
    async fn test_composite_transformer() {
        let data = vec![
            row(&[("id", DataValue::Integer(1)), ("value", DataValue::Integer(10))]),
            row(&[("id", DataValue::Integer(2)), ("value", DataValue::Integer(20))]),
        ];

        let transform = CompositeTransformer::named("test")
            .add(RenameColumnsTransform::single("id", "key"))
            .add(RemoveColumnsTransform::single("value"));

        assert_eq!(transform.stage_names(), vec!["rename_columns", "remove_columns"]);
        assert_eq!(transform.stages().len(), 2);
        assert!(RemoveColumnsTransform::single("x").stages().is_empty());
        assert_eq!(transform.name(), "test");
        assert_eq!(transform.len(), 2);

        let result = transform.transform(data).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].get("key"), Some(&DataValue::Integer(2)));
        assert_eq!(result[1].get("id"), None);
        assert_eq!(result[1].get("value"), None);
    }
}
