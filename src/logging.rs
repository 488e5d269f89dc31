//! Inicialização do `tracing` a partir da configuração de observabilidade.

use crate::config::{LogFormat, ObservabilityConfig};
use crate::error::{ConfigError, ETLError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Monta o filtro: `RUST_LOG` tem precedência sobre `log_level`
fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|e| {
        ETLError::Config(ConfigError::InvalidValue {
            param: "log_level".to_string(),
            value: format!("{} ({})", config.log_level, e),
        })
    })
}

/// Instala o subscriber global. Logs vão para stderr para não misturar com os relatórios.
///
/// Chamadas repetidas retornam erro em vez de substituir o subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| ETLError::Generic(anyhow::anyhow!("falha ao iniciar logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_log_level_is_rejected() {
        // só vale quando RUST_LOG não está definido no ambiente de teste
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = ObservabilityConfig {
            log_level: "gameetl=notalevel".to_string(),
            log_format: LogFormat::Compact,
        };
        assert!(build_filter(&config).is_err());
    }

    #[test]
    fn test_valid_log_level() {
        let config = ObservabilityConfig {
            log_level: "gameetl=debug,warn".to_string(),
            log_format: LogFormat::Json,
        };
        assert!(build_filter(&config).is_ok());
    }
}
