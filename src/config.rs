use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuração principal do job de limpeza
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ETLConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub cleaning: CleaningConfig,
    pub reports: ReportsConfig,
    pub observability: ObservabilityConfig,
}

/// Arquivo de origem
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    pub delimiter: char,
    pub has_headers: bool,
    /// Caractere de aspas dos campos com vírgula
    pub quote: char,
}

/// Destino dos resultados
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Tabela limpa em CSV
    pub cleaned_csv: Option<PathBuf>,
    /// Tabela limpa em JSON
    pub cleaned_json: Option<PathBuf>,
    /// Diretório onde cada relatório vira `<nome>.json`
    pub reports_dir: Option<PathBuf>,
    pub pretty: bool,
}

/// Parâmetros das etapas de limpeza
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Descarta repetições de (título, plataforma), mantendo a primeira
    pub drop_duplicates: bool,
}

/// Parâmetros dos relatórios
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub top_developers: usize,
}

/// Configuração de observabilidade
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Formato de log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/games.csv"),
            delimiter: ',',
            has_headers: true,
            quote: '"',
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cleaned_csv: None,
            cleaned_json: None,
            reports_dir: None,
            pretty: true,
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            drop_duplicates: true,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self { top_developers: 10 }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = crate::error::ETLError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(crate::error::ETLError::Config(crate::error::ConfigError::InvalidValue {
                param: "log_format".to_string(),
                value: other.to_string(),
            })),
        }
    }
}

impl ETLConfig {
    /// Cria um novo builder para configuração
    pub fn builder() -> ETLConfigBuilder {
        ETLConfigBuilder::default()
    }

    /// Carrega configuração do ambiente
    ///
    /// Variáveis ausentes ou ilegíveis mantêm o valor padrão.
    pub fn from_env() -> Result<Self, crate::error::ETLError> {
        Self::default().with_env_overrides()
    }

    /// Aplica as variáveis `GAMEETL_*` sobre uma configuração existente
    pub fn with_env_overrides(self) -> Result<Self, crate::error::ETLError> {
        let mut builder = ETLConfigBuilder { config: self };

        if let Ok(path) = std::env::var("GAMEETL_INPUT") {
            builder = builder.input_path(path);
        }

        if let Ok(dir) = std::env::var("GAMEETL_REPORTS_DIR") {
            builder = builder.reports_dir(dir);
        }

        if let Ok(dedupe) = std::env::var("GAMEETL_DROP_DUPLICATES") {
            if let Ok(enable) = dedupe.parse::<bool>() {
                builder = builder.drop_duplicates(enable);
            }
        }

        if let Ok(limit) = std::env::var("GAMEETL_TOP_DEVELOPERS") {
            if let Ok(n) = limit.parse::<usize>() {
                builder = builder.top_developers(n);
            }
        }

        if let Ok(level) = std::env::var("GAMEETL_LOG_LEVEL") {
            builder = builder.log_level(level);
        }

        if let Ok(format) = std::env::var("GAMEETL_LOG_FORMAT") {
            builder = builder.log_format(format.parse()?);
        }

        builder.build()
    }

    /// Carrega configuração de arquivo
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::error::ETLError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Carrega configuração de string TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, crate::error::ETLError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()?;

        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Delimitador como byte, pronto para o leitor CSV
    pub fn delimiter_byte(&self) -> Result<u8, crate::error::ETLError> {
        ascii_byte("delimiter", self.input.delimiter)
    }

    /// Caractere de aspas como byte
    pub fn quote_byte(&self) -> Result<u8, crate::error::ETLError> {
        ascii_byte("quote", self.input.quote)
    }

    /// Valida a configuração
    pub fn validate(&self) -> Result<(), crate::error::ETLError> {
        use crate::error::{ETLError, ConfigError};

        if self.reports.top_developers == 0 {
            return Err(ETLError::Config(ConfigError::InvalidValue {
                param: "top_developers".to_string(),
                value: "0".to_string(),
            }));
        }

        if self.input.path.as_os_str().is_empty() {
            return Err(ETLError::Config(ConfigError::InvalidConfig(
                "input.path não pode ser vazio".to_string(),
            )));
        }

        self.delimiter_byte()?;
        self.quote_byte()?;

        Ok(())
    }
}

fn ascii_byte(param: &str, c: char) -> Result<u8, crate::error::ETLError> {
    u8::try_from(c).ok().filter(u8::is_ascii).ok_or_else(|| {
        crate::error::ETLError::Config(crate::error::ConfigError::InvalidValue {
            param: param.to_string(),
            value: c.to_string(),
        })
    })
}

/// Builder para configuração ETL
#[derive(Default)]
pub struct ETLConfigBuilder {
    config: ETLConfig,
}

impl ETLConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input.path = path.into();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.input.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.config.input.quote = quote;
        self
    }

    pub fn cleaned_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.cleaned_csv = Some(path.into());
        self
    }

    pub fn cleaned_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.cleaned_json = Some(path.into());
        self
    }

    pub fn reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.reports_dir = Some(dir.into());
        self
    }

    pub fn drop_duplicates(mut self, enable: bool) -> Self {
        self.config.cleaning.drop_duplicates = enable;
        self
    }

    pub fn top_developers(mut self, limit: usize) -> Self {
        self.config.reports.top_developers = limit;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.observability.log_level = level.into();
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.observability.log_format = format;
        self
    }

    pub fn build(self) -> Result<ETLConfig, crate::error::ETLError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ETLConfig::default();
        assert!(config.cleaning.drop_duplicates);
        assert_eq!(config.reports.top_developers, 10);
        assert_eq!(config.observability.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ETLConfig::builder()
            .input_path("games.csv")
            .drop_duplicates(false)
            .top_developers(5)
            .log_level("debug")
            .log_format(LogFormat::Json)
            .build()
            .unwrap();

        assert_eq!(config.input.path, PathBuf::from("games.csv"));
        assert!(!config.cleaning.drop_duplicates);
        assert_eq!(config.reports.top_developers, 5);
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ETLConfig::default();
        config.reports.top_developers = 0;
        assert!(config.validate().is_err());

        let mut config = ETLConfig::default();
        config.input.delimiter = 'é';
        assert!(config.validate().is_err());

        let config = ETLConfig::builder().quote('’').build();
        assert!(config.is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
        [input]
        path = "raw/metacritic.csv"
        delimiter = ";"
        quote = "'"

        [cleaning]
        drop_duplicates = false

        [reports]
        top_developers = 20

        [observability]
        log_level = "warn"
        log_format = "compact"
        "#;

        let config = ETLConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.input.path, PathBuf::from("raw/metacritic.csv"));
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.quote_byte().unwrap(), b'\'');
        assert!(!config.cleaning.drop_duplicates);
        assert_eq!(config.reports.top_developers, 20);
        assert_eq!(config.observability.log_format, LogFormat::Compact);
        // seções omitidas usam os padrões
        assert!(config.output.pretty);
    }

    #[test]
    fn test_config_from_toml_rejects_zero_limit() {
        let toml_str = r#"
        [reports]
        top_developers = 0
        "#;
        assert!(ETLConfig::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
