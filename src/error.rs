use thiserror::Error;

/// Tipo Result principal da biblioteca
pub type Result<T> = std::result::Result<T, ETLError>;

/// Erro principal do pipeline de limpeza
#[derive(Error, Debug)]
pub enum ETLError {
    #[error("Erro de extração: {0}")]
    Extract(#[from] ExtractError),

    #[error("Erro de transformação: {0}")]
    Transform(#[from] TransformError),

    #[error("Erro de carga: {0}")]
    Load(#[from] LoadError),

    #[error("Erro de configuração: {0}")]
    Config(#[from] ConfigError),

    #[error("Erro de pipeline: {0}")]
    Pipeline(String),

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erro genérico: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Erros relacionados à leitura do arquivo de origem
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato inválido: {0}")]
    InvalidFormat(String),

    #[error("Erro de parsing: {0}")]
    ParseError(String),

    #[error("Coluna obrigatória ausente: {0}")]
    MissingColumn(String),
}

/// Erros fatais das etapas de limpeza
///
/// Qualquer um destes aborta a execução inteira; o job pode ser reexecutado
/// a partir do arquivo bruto depois da correção.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Data que passou pelo filtro de lançamento mas não pôde ser lida
    #[error("Data inválida na linha {row} ({title} / {platform}): '{value}' - {reason}")]
    Parse {
        row: usize,
        title: String,
        platform: String,
        value: String,
        reason: String,
    },

    /// Campo numérico preenchido com texto não numérico
    #[error("Valor não numérico na linha {row} ({title} / {platform}), coluna {column}: '{value}'")]
    TypeCoercion {
        row: usize,
        title: String,
        platform: String,
        column: String,
        value: String,
    },

    #[error("Registro inválido: {0}")]
    InvalidRecord(String),

    #[error("Erro de processamento: {0}")]
    ProcessingError(String),
}

/// Erros relacionados à escrita dos resultados
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Erro de escrita: {0}")]
    WriteError(String),
}

/// Erros relacionados à configuração
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("Valor inválido para {param}: {value}")]
    InvalidValue { param: String, value: String },

    #[error("Erro de parsing de configuração: {0}")]
    ParseError(String),
}

impl ETLError {
    /// Indica se o erro aponta um problema nos dados de origem (e não no ambiente)
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ETLError::Transform(TransformError::Parse { .. })
                | ETLError::Transform(TransformError::TypeCoercion { .. })
                | ETLError::Transform(TransformError::InvalidRecord(_))
                | ETLError::Extract(ExtractError::MissingColumn(_))
        )
    }

    /// Retorna o código de erro
    pub fn error_code(&self) -> &'static str {
        match self {
            ETLError::Extract(_) => "EXTRACT_ERROR",
            ETLError::Transform(TransformError::Parse { .. }) => "PARSE_ERROR",
            ETLError::Transform(TransformError::TypeCoercion { .. }) => "TYPE_COERCION_ERROR",
            ETLError::Transform(_) => "TRANSFORM_ERROR",
            ETLError::Load(_) => "LOAD_ERROR",
            ETLError::Config(_) => "CONFIG_ERROR",
            ETLError::Pipeline(_) => "PIPELINE_ERROR",
            ETLError::Io(_) => "IO_ERROR",
            ETLError::Serialization(_) => "SERIALIZATION_ERROR",
            ETLError::Generic(_) => "GENERIC_ERROR",
        }
    }
}

impl From<config::ConfigError> for ETLError {
    fn from(err: config::ConfigError) -> Self {
        ETLError::Config(ConfigError::ParseError(err.to_string()))
    }
}

impl From<csv::Error> for ETLError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io_err) => ETLError::Io(std::io::Error::new(io_err.kind(), io_err.to_string())),
            csv::ErrorKind::Utf8 { .. } => {
                ETLError::Extract(ExtractError::InvalidFormat("UTF-8 inválido".to_string()))
            }
            _ => ETLError::Extract(ExtractError::ParseError(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let parse = ETLError::Transform(TransformError::Parse {
            row: 3,
            title: "Halo".to_string(),
            platform: "Xbox".to_string(),
            value: "Smarch 3, 2001".to_string(),
            reason: "mês desconhecido".to_string(),
        });
        assert_eq!(parse.error_code(), "PARSE_ERROR");
        assert!(parse.is_data_error());

        let coercion = ETLError::Transform(TransformError::TypeCoercion {
            row: 1,
            title: "Halo".to_string(),
            platform: "Xbox".to_string(),
            column: "meta_score".to_string(),
            value: "tbd".to_string(),
        });
        assert_eq!(coercion.error_code(), "TYPE_COERCION_ERROR");

        let io = ETLError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(io.error_code(), "IO_ERROR");
        assert!(!io.is_data_error());
    }

    #[test]
    fn test_error_message_names_offending_row() {
        let err = ETLError::Transform(TransformError::TypeCoercion {
            row: 42,
            title: "Halo".to_string(),
            platform: "Xbox".to_string(),
            column: "user_score".to_string(),
            value: "tbd".to_string(),
        });
        let message = err.to_string();
        assert!(message.contains("linha 42"));
        assert!(message.contains("user_score"));
        assert!(message.contains("'tbd'"));
    }
}
