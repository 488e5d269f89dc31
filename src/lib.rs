//! # gameetl - limpeza de avaliações de jogos
//!
//! Job em lote que lê o CSV bruto de avaliações (uma linha por título em uma
//! plataforma), limpa e remodela a tabela e calcula quatro relatórios.
//!
//! ## Exemplo Rápido
//!
//! ```rust,no_run
//! use gameetl::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ETLConfig::builder().input_path("data/games.csv").build()?;
//!     let table = MemoryLoader::new();
//!
//!     let pipeline = Pipeline::from_config(&config)?
//!         .load(table.clone())
//!         .build();
//!     pipeline.execute().await?;
//!
//!     let releases = ReleaseTable::from_rows(&table.take())?;
//!     for report in ReportSet::new(&config.reports).run(&releases).await? {
//!         println!("{}: {} linhas", report.name, report.rows.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Arquitetura
//!
//! ### Extração
//! [`extract::csv::CsvExtractor`] lê todos os campos como texto bruto.
//!
//! ### Limpeza
//! Cada etapa é um [`Transformer`]; [`transform::cleaning_chain`] monta a
//! cadeia na ordem correta.
//!
//! ### Carga e relatórios
//! Os loaders gravam a tabela limpa (memória, CSV, JSON, console). Os
//! relatórios são [`Aggregator`]s sobre a [`model::ReleaseTable`] tipada.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod model;
pub mod extract;
pub mod transform;
pub mod load;
pub mod report;
pub mod pipeline;
pub mod events;
pub mod logging;

// Re-exports para facilitar o uso
pub use config::ETLConfig;
pub use error::{ETLError, Result};
pub use types::{DataRow, DataValue, PipelineResult, PipelineState, PipelineEvent};
pub use traits::*;
pub use pipeline::Pipeline;
pub use events::{LoggingEventEmitter, InMemoryEventEmitter};

/// Prelude com imports mais comuns
pub mod prelude {
    pub use crate::config::ETLConfig;
    pub use crate::error::{ETLError, Result};
    pub use crate::types::{DataRow, DataValue, PipelineResult, PipelineState, PipelineEvent};
    pub use crate::traits::{Aggregator, Extractor, Transformer, Loader, EventEmitter};
    pub use crate::model::{GameRelease, ReleaseTable};
    pub use crate::pipeline::Pipeline;
    pub use crate::events::{LoggingEventEmitter, InMemoryEventEmitter};

    pub use crate::extract::csv::CsvExtractor;

    pub use crate::transform::cleaning_chain;
    pub use crate::transform::common::{CompositeTransformer, RemoveColumnsTransform, RenameColumnsTransform};

    pub use crate::load::console::ConsoleLoader;
    pub use crate::load::csv::CsvLoader;
    pub use crate::load::json::JsonLoader;
    pub use crate::load::memory::MemoryLoader;

    pub use crate::report::{NamedReport, ReportSet};
}

/// Versão do pacote
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
