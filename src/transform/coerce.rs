use async_trait::async_trait;
use crate::error::{Result, TransformError};
use crate::types::{row_identity, DataRow, DataValue};
use crate::traits::Transformer;

/// Tipo de destino de uma coluna numérica
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericType {
    Integer,
    /// Decimal arredondado para `scale` casas
    Decimal { scale: u32 },
}

/// Converte colunas numéricas em texto para tipos numéricos
///
/// Valores ausentes passam intactos. Texto não numérico aborta com
/// [`TransformError::TypeCoercion`]; valores já tipados são aceitos, o que
/// torna a etapa reaplicável sobre uma tabela limpa.
#[derive(Debug, Clone, Default)]
pub struct TypeCoercer {
    conversions: Vec<(String, NumericType)>,
}

impl TypeCoercer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn integer(mut self, column: impl Into<String>) -> Self {
        self.conversions.push((column.into(), NumericType::Integer));
        self
    }

    pub fn decimal(mut self, column: impl Into<String>, scale: u32) -> Self {
        self.conversions.push((column.into(), NumericType::Decimal { scale }));
        self
    }

    /// Converte um valor; `None` significa que o texto não é numérico
    pub fn convert_value(value: &DataValue, target: NumericType) -> Option<DataValue> {
        match (value, target) {
            (DataValue::Null, _) => Some(DataValue::Null),
            (DataValue::Integer(i), NumericType::Integer) => Some(DataValue::Integer(*i)),
            (DataValue::String(s), NumericType::Integer) => s.parse::<i64>().ok().map(DataValue::Integer),
            (DataValue::Integer(i), NumericType::Decimal { scale }) => Some(DataValue::Float(round_to(*i as f64, scale))),
            (DataValue::Float(f), NumericType::Decimal { scale }) => Some(DataValue::Float(round_to(*f, scale))),
            (DataValue::String(s), NumericType::Decimal { scale }) => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| DataValue::Float(round_to(f, scale))),
            _ => None,
        }
    }

    fn coerce_row(&self, mut row: DataRow) -> Result<DataRow> {
        for (column, target) in &self.conversions {
            let Some(value) = row.get(column) else {
                continue;
            };

            match Self::convert_value(value, *target) {
                Some(converted) => {
                    row.insert(column.clone(), converted);
                }
                None => {
                    let value = value.as_string().unwrap_or_default();
                    let (line, title, platform) = row_identity(&row);
                    tracing::error!(line, %title, %platform, column = %column, %value, "Valor não numérico");
                    return Err(TransformError::TypeCoercion {
                        row: line,
                        title,
                        platform,
                        column: column.clone(),
                        value,
                    }
                    .into());
                }
            }
        }
        Ok(row)
    }
}

/// Arredonda para `scale` casas decimais
pub fn round_to(value: f64, scale: u32) -> f64 {
    let factor = 10f64.powi(scale as i32);
    (value * factor).round() / factor
}

#[async_trait]
impl Transformer for TypeCoercer {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        data.into_iter().map(|row| self.coerce_row(row)).collect()
    }

    fn name(&self) -> &str {
        "type_coercer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ETLError;

    fn coercer() -> TypeCoercer {
        TypeCoercer::new().integer("meta_score").decimal("user_score", 1)
    }

    fn row(meta: DataValue, user: DataValue) -> DataRow {
        let mut row = DataRow::new();
        row.insert("title".to_string(), DataValue::from("Halo"));
        row.insert("platform".to_string(), DataValue::from("Xbox"));
        row.insert("meta_score".to_string(), meta);
        row.insert("user_score".to_string(), user);
        row
    }

    #[tokio::test]
    async fn test_numeric_strings_are_typed() {
        let result = coercer()
            .transform(vec![row(DataValue::from("97"), DataValue::from("8.5"))])
            .await
            .unwrap();

        assert_eq!(result[0].get("meta_score"), Some(&DataValue::Integer(97)));
        assert_eq!(result[0].get("user_score"), Some(&DataValue::Float(8.5)));
    }

    #[tokio::test]
    async fn test_absent_values_pass_through() {
        let result = coercer()
            .transform(vec![row(DataValue::Null, DataValue::Null)])
            .await
            .unwrap();

        assert_eq!(result[0].get("meta_score"), Some(&DataValue::Null));
        assert_eq!(result[0].get("user_score"), Some(&DataValue::Null));
    }

    #[tokio::test]
    async fn test_zero_is_not_absent() {
        let result = coercer()
            .transform(vec![row(DataValue::from("0"), DataValue::from("0.0"))])
            .await
            .unwrap();

        assert_eq!(result[0].get("meta_score"), Some(&DataValue::Integer(0)));
        assert_eq!(result[0].get("user_score"), Some(&DataValue::Float(0.0)));
    }

    #[tokio::test]
    async fn test_non_numeric_is_fatal() {
        let err = coercer()
            .transform(vec![row(DataValue::from("97"), DataValue::from("tbd"))])
            .await
            .unwrap_err();

        match err {
            ETLError::Transform(TransformError::TypeCoercion { column, value, title, .. }) => {
                assert_eq!(column, "user_score");
                assert_eq!(value, "tbd");
                assert_eq!(title, "Halo");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_whitespace_is_not_numeric() {
        let err = coercer()
            .transform(vec![row(DataValue::from(" "), DataValue::Null)])
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TYPE_COERCION_ERROR");
    }

    #[tokio::test]
    async fn test_coercion_is_idempotent() {
        let once = coercer()
            .transform(vec![row(DataValue::from("97"), DataValue::from("8.5"))])
            .await
            .unwrap();
        let twice = coercer().transform(once.clone()).await.unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_decimal_precision_and_non_finite() {
        assert_eq!(
            TypeCoercer::convert_value(&DataValue::from("7.25"), NumericType::Decimal { scale: 1 }),
            Some(DataValue::Float(7.3))
        );
        assert_eq!(
            TypeCoercer::convert_value(&DataValue::from("NaN"), NumericType::Decimal { scale: 1 }),
            None
        );
        assert_eq!(
            TypeCoercer::convert_value(&DataValue::from("8.5"), NumericType::Integer),
            None
        );
    }
}
