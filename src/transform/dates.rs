//! Conversão da data de lançamento ("March 3, 2017") para `NaiveDate`.

use async_trait::async_trait;
use chrono::{Month, NaiveDate};
use thiserror::Error;
use crate::error::{Result, TransformError};
use crate::types::{row_identity, DataRow, DataValue};
use crate::traits::Transformer;

/// Formato "Mês Dia, Ano" com o mês por extenso, em inglês
pub const RELEASE_DATE_FORMAT: &str = "%B %d, %Y";

/// Motivo de uma data de lançamento ilegível
#[derive(Error, Debug)]
pub enum ReleaseDateError {
    #[error("mês deve vir por extenso, em inglês: {0:?}")]
    MonthName(String),

    #[error(transparent)]
    Format(#[from] chrono::ParseError),
}

fn is_full_month_name(word: &str) -> bool {
    (1..=12u8)
        .filter_map(|n| Month::try_from(n).ok())
        .any(|month| month.name() == word)
}

/// Converte uma data textual de lançamento
///
/// O `%B` do chrono também aceita "Oct" ou "october"; aqui só o nome
/// completo com inicial maiúscula passa.
pub fn parse_release_date(value: &str) -> std::result::Result<NaiveDate, ReleaseDateError> {
    let month = value.split(' ').next().unwrap_or_default();
    if !is_full_month_name(month) {
        return Err(ReleaseDateError::MonthName(month.to_string()));
    }
    Ok(NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT)?)
}

/// Substitui a data textual pela data estruturada
///
/// Só deve ver linhas que já passaram pelo filtro de lançamento; qualquer
/// falha aqui é uma inconsistência e aborta a execução com
/// [`TransformError::Parse`].
#[derive(Debug, Clone)]
pub struct DateParser {
    column: String,
}

impl DateParser {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }

    fn parse_row(&self, mut row: DataRow) -> Result<DataRow> {
        if matches!(row.get(&self.column), Some(DataValue::Date(_))) {
            return Ok(row);
        }

        let parsed = match row.get(&self.column) {
            Some(DataValue::String(s)) => parse_release_date(s).map_err(|e| (s.clone(), e.to_string())),
            Some(other) => Err((
                other.as_string().unwrap_or_default(),
                format!("tipo inesperado {}", other.type_name()),
            )),
            None => Err((String::new(), "data ausente".to_string())),
        };

        match parsed {
            Ok(date) => {
                row.insert(self.column.clone(), DataValue::Date(date));
                Ok(row)
            }
            Err((value, reason)) => {
                let (line, title, platform) = row_identity(&row);
                tracing::error!(line, %title, %platform, %value, %reason, "Data de lançamento ilegível");
                Err(TransformError::Parse {
                    row: line,
                    title,
                    platform,
                    value,
                    reason,
                }
                .into())
            }
        }
    }
}

#[async_trait]
impl Transformer for DateParser {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        data.into_iter().map(|row| self.parse_row(row)).collect()
    }

    fn name(&self) -> &str {
        "date_parser"
    }
}
