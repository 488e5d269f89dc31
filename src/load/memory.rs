//! # Memory Loader
//!
//! Mantém a tabela limpa em memória para consultas e relatórios na mesma
//! execução, sem passar por arquivo.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::error::Result;
use crate::types::{DataRow, PipelineResult};
use crate::traits::Loader;
use super::common::loaded;

/// Carregador que acumula linhas em memória
///
/// Clones compartilham o mesmo armazenamento: entregue um clone ao pipeline e
/// leia as linhas pelo original depois da execução.
///
/// ```rust
/// use gameetl::load::memory::MemoryLoader;
/// use gameetl::traits::Loader;
///
/// # async fn exemplo() -> gameetl::Result<()> {
/// let loader = MemoryLoader::new();
/// loader.load(vec![]).await?;
/// assert!(loader.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    data: Arc<Mutex<Vec<DataRow>>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<DataRow>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cópia das linhas armazenadas
    pub fn get_data(&self) -> Vec<DataRow> {
        self.rows().clone()
    }

    /// Retira as linhas, deixando o armazenamento vazio
    pub fn take(&self) -> Vec<DataRow> {
        std::mem::take(&mut *self.rows())
    }

    pub fn clear(&self) {
        self.rows().clear();
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Executa `f` sobre as linhas sem clonar
    pub fn with_data<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&[DataRow]) -> T,
    {
        f(&self.rows())
    }
}

#[async_trait]
impl Loader for MemoryLoader {
    async fn load(&self, data: Vec<DataRow>) -> Result<PipelineResult> {
        let start = std::time::Instant::now();
        let count = data.len();
        self.rows().extend(data);
        Ok(loaded(count, start))
    }
}
