//! # Console Loader
//!
//! Imprime linhas em stdout, em texto legível ou em JSON Lines. Os logs vão
//! para stderr, então a saída pode ser redirecionada sem ruído.

use async_trait::async_trait;
use std::io::Write;
use crate::error::Result;
use crate::types::{DataRow, PipelineResult};
use crate::traits::Loader;
use super::common::{loaded, DataFormatter};

#[derive(Debug, Clone)]
pub struct ConsoleLoader {
    pretty: bool,
    title: Option<String>,
}

impl ConsoleLoader {
    /// Por padrão, usa o formato legível
    pub fn new() -> Self {
        Self {
            pretty: true,
            title: None,
        }
    }

    /// `false` imprime uma linha JSON por registro
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Cabeçalho impresso antes das linhas (modo legível)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Escreve as linhas em qualquer destino
    pub fn write_to<W: Write>(&self, out: &mut W, data: &[DataRow]) -> Result<()> {
        if self.pretty {
            if let Some(title) = &self.title {
                writeln!(out, "== {} ({} linhas) ==", title, data.len())?;
            }
            for (i, row) in data.iter().enumerate() {
                writeln!(out, "{:>4}. {}", i + 1, DataFormatter::format_row(row))?;
            }
        } else {
            for row in data {
                writeln!(out, "{}", serde_json::to_string(row)?)?;
            }
        }
        Ok(())
    }
}

impl Default for ConsoleLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Loader for ConsoleLoader {
    async fn load(&self, data: Vec<DataRow>) -> Result<PipelineResult> {
        let start = std::time::Instant::now();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.write_to(&mut out, &data)?;
        out.flush()?;
        Ok(loaded(data.len(), start))
    }
}
