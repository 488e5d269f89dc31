use async_trait::async_trait;
use crate::error::Result;
use crate::model::ReleaseTable;
use crate::types::{DataRow, PipelineResult};

/// Trait para componentes que extraem dados
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extrai todas as linhas da fonte, na ordem original
    async fn extract(&self) -> Result<Vec<DataRow>>;
}

/// Trait para componentes que transformam dados
///
/// Cada etapa recebe a tabela inteira e devolve a tabela seguinte; não há
/// intercalação por linha entre etapas.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Transforma um lote de dados
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>>;

    /// Nome da etapa, usado em logs e eventos
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Etapas internas, para quem executa e reporta cada uma separadamente
    ///
    /// Vazio para etapas simples.
    fn stages(&self) -> Vec<&dyn Transformer> {
        Vec::new()
    }
}

/// Trait para componentes que carregam dados
#[async_trait]
pub trait Loader: Send + Sync {
    /// Carrega dados para o destino
    async fn load(&self, data: Vec<DataRow>) -> Result<PipelineResult>;

    /// Finaliza o carregamento (flush, etc.)
    async fn finalize(&self) -> Result<()> {
        Ok(())
    }

    /// Verifica se o destino está disponível
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Trait para relatórios somente leitura sobre a tabela limpa
#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Calcula o relatório; cada linha devolvida é uma linha do resultado
    async fn aggregate(&self, table: &ReleaseTable) -> Result<Vec<DataRow>>;

    /// Nome estável do relatório (também usado como nome de arquivo)
    fn name(&self) -> &str;
}

/// Trait para emissão de eventos do pipeline
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Emite um evento do pipeline
    async fn emit(&self, event: crate::types::PipelineEvent) -> Result<()>;
}
