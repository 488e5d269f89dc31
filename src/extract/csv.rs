use async_trait::async_trait;
use std::path::Path;
use crate::error::{ExtractError, Result};
use crate::types::{DataRow, DataValue, SOURCE_LINE_COLUMN};
use crate::traits::Extractor;

/// Colunas que o arquivo bruto de avaliações precisa ter
pub const RAW_COLUMNS: [&str; 9] = [
    "title",
    "platform",
    "date",
    "meta_score",
    "user_score",
    "esrb_rating",
    "developers",
    "genres",
    "link",
];

/// Extrator para arquivos CSV
///
/// Todo campo é lido como texto bruto (`DataValue::String`), inclusive os
/// vazios; a tipagem fica a cargo das etapas de limpeza. Cada linha recebe
/// a coluna `source_line` com a linha de origem no arquivo.
#[derive(Debug, Clone)]
pub struct CsvExtractor {
    file_path: String,
    delimiter: u8,
    has_headers: bool,
    quote_char: u8,
    required_columns: Vec<String>,
}

impl CsvExtractor {
    /// Cria um novo extrator CSV
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_string_lossy().to_string(),
            delimiter: b',',
            has_headers: true,
            quote_char: b'"',
            required_columns: Vec::new(),
        }
    }

    /// Extrator para o layout bruto de avaliações, exigindo todas as colunas conhecidas
    pub fn reviews<P: AsRef<Path>>(file_path: P) -> Self {
        Self::new(file_path).with_required_columns(&RAW_COLUMNS)
    }

    /// Define o delimitador
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Define se tem cabeçalhos
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Define o caractere de aspas
    pub fn with_quote_char(mut self, quote_char: u8) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// Colunas cuja ausência no cabeçalho é erro
    pub fn with_required_columns(mut self, columns: &[&str]) -> Self {
        self.required_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    fn check_required(&self, headers: &csv::StringRecord) -> Result<()> {
        for column in &self.required_columns {
            if !headers.iter().any(|h| h == column) {
                return Err(ExtractError::MissingColumn(column.clone()).into());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Extractor for CsvExtractor {
    async fn extract(&self) -> Result<Vec<DataRow>> {
        use std::io::BufReader;
        use std::fs::File;

        let file = File::open(&self.file_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExtractError::FileNotFound(self.file_path.clone()).into(),
            _ => crate::error::ETLError::Io(e),
        })?;
        let reader = BufReader::new(file);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .quote(self.quote_char)
            .from_reader(reader);

        let headers: Vec<String> = if self.has_headers {
            let headers = csv_reader.headers()?.clone();
            self.check_required(&headers)?;
            headers.iter().map(|h| h.to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();

        for result in csv_reader.records() {
            let record = result?;
            let mut row = DataRow::new();

            for (i, field) in record.iter().enumerate() {
                let name = match headers.get(i) {
                    Some(header) => header.clone(),
                    None if self.has_headers => continue,
                    None => format!("column_{}", i),
                };
                row.insert(name, DataValue::String(field.to_string()));
            }

            let line = record.position().map(|p| p.line() as i64).unwrap_or(0);
            row.insert(SOURCE_LINE_COLUMN.to_string(), DataValue::Integer(line));

            rows.push(row);
        }

        tracing::debug!(file = %self.file_path, rows = rows.len(), "CSV lido");

        Ok(rows)
    }
}
