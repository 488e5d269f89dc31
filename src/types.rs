use serde::Serialize;
use std::collections::BTreeMap;
use chrono::NaiveDate;

/// Representa uma linha de dados genérica
///
/// As colunas ficam ordenadas pelo nome, o que mantém a saída determinística.
pub type DataRow = BTreeMap<String, DataValue>;

/// Coluna de metadados com a linha do registro no arquivo de origem
pub const SOURCE_LINE_COLUMN: &str = "source_line";

/// Valores de dados suportados
///
/// `Null` é o único marcador de ausência; uma string vazia não é ausência até
/// passar pelo normalizador de nulos.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    String(String),
    Integer(i64),
    Float(f64),
    /// Data sem horário (YYYY-MM-DD)
    Date(NaiveDate),
    Null,
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<NaiveDate> for DataValue {
    fn from(value: NaiveDate) -> Self {
        DataValue::Date(value)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DataValue::Null)
    }
}

impl DataValue {
    /// Referência ao texto, apenas para valores `String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converte para string se possível
    pub fn as_string(&self) -> Option<String> {
        match self {
            DataValue::String(s) => Some(s.clone()),
            DataValue::Integer(i) => Some(i.to_string()),
            DataValue::Float(f) => Some(f.to_string()),
            DataValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            DataValue::Null => None,
        }
    }

    /// Inteiro tipado; strings não são convertidas aqui
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Decimal tipado; inteiros são promovidos
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DataValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Verifica se é nulo
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Nome do tipo, usado em mensagens de erro
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::String(_) => "String",
            DataValue::Integer(_) => "Integer",
            DataValue::Float(_) => "Float",
            DataValue::Date(_) => "Date",
            DataValue::Null => "Null",
        }
    }
}

/// Identificação de uma linha para mensagens de erro: (linha de origem, título, plataforma)
pub fn row_identity(row: &DataRow) -> (usize, String, String) {
    let line = row
        .get(SOURCE_LINE_COLUMN)
        .and_then(DataValue::as_integer)
        .unwrap_or(0) as usize;
    let text = |column: &str| {
        row.get(column)
            .and_then(DataValue::as_string)
            .unwrap_or_default()
    };
    (line, text("title"), text("platform"))
}

/// Resultado de uma operação de pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    pub rows_extracted: usize,
    pub rows_processed: usize,
    pub rows_successful: usize,
    pub rows_failed: usize,
    pub execution_time_ms: u64,
    pub errors: Vec<String>,
}

impl PipelineResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Linhas descartadas pela limpeza (não lançados, duplicados)
    pub fn rows_dropped(&self) -> usize {
        self.rows_extracted.saturating_sub(self.rows_processed)
    }

    pub fn success_rate(&self) -> f64 {
        if self.rows_processed == 0 {
            0.0
        } else {
            self.rows_successful as f64 / self.rows_processed as f64
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Estados do pipeline para rastreamento de execução
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Extracting,
    Transforming,
    Loading,
    Completed,
    Failed(String),
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "Ocioso"),
            PipelineState::Extracting => write!(f, "Extraindo"),
            PipelineState::Transforming => write!(f, "Limpando"),
            PipelineState::Loading => write!(f, "Carregando"),
            PipelineState::Completed => write!(f, "Concluído"),
            PipelineState::Failed(error) => write!(f, "Falhou: {}", error),
        }
    }
}

/// Eventos do pipeline para monitoramento externo
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Pipeline iniciado
    Started {
        pipeline_id: String,
        timestamp: std::time::SystemTime,
    },
    /// Estado alterado
    StateChanged {
        pipeline_id: String,
        old_state: PipelineState,
        new_state: PipelineState,
        timestamp: std::time::SystemTime,
    },
    /// Uma etapa terminou de processar a tabela
    StageCompleted {
        pipeline_id: String,
        stage: String,
        rows_in: usize,
        rows_out: usize,
        timestamp: std::time::SystemTime,
    },
    /// Erro ocorreu
    Error {
        pipeline_id: String,
        error: String,
        timestamp: std::time::SystemTime,
    },
    /// Pipeline concluído
    Completed {
        pipeline_id: String,
        result: PipelineResult,
        timestamp: std::time::SystemTime,
    },
}
