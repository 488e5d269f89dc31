//! # Pipeline
//!
//! Orquestra extração, limpeza e carga de uma execução. Cada fase processa a
//! tabela inteira antes da próxima começar. Qualquer erro é fatal: o estado
//! vai para `Failed`, um evento de erro é emitido e o erro é devolvido.

use crate::config::ETLConfig;
use crate::error::{ETLError, Result};
use crate::events::LoggingEventEmitter;
use crate::extract::csv::CsvExtractor;
use crate::traits::{EventEmitter, Extractor, Loader, Transformer};
use crate::transform::{cleaning_chain, common::CompositeTransformer};
use crate::types::{DataRow, PipelineEvent, PipelineResult, PipelineState};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Pipeline com estado observável e eventos
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
    state: Arc<Mutex<PipelineState>>,
    event_emitter: Arc<dyn EventEmitter>,
    pipeline_id: String,
}

impl Pipeline<(), (), ()> {
    /// Cria um novo builder de pipeline
    pub fn builder() -> PipelineBuilder<(), (), ()> {
        PipelineBuilder::new()
    }

    /// Builder com extrator e cadeia de limpeza montados a partir da configuração
    pub fn from_config(config: &ETLConfig) -> Result<PipelineBuilder<CsvExtractor, CompositeTransformer, ()>> {
        let extractor = CsvExtractor::reviews(&config.input.path)
            .with_delimiter(config.delimiter_byte()?)
            .with_quote_char(config.quote_byte()?)
            .with_headers(config.input.has_headers);

        Ok(PipelineBuilder::new()
            .extract(extractor)
            .transform(cleaning_chain(&config.cleaning)?))
    }
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer,
    L: Loader,
{
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn current_state(&self) -> PipelineState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    async fn set_state(&self, new_state: PipelineState) -> Result<()> {
        let old_state = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, new_state.clone())
        };

        self.event_emitter
            .emit(PipelineEvent::StateChanged {
                pipeline_id: self.pipeline_id.clone(),
                old_state,
                new_state,
                timestamp: SystemTime::now(),
            })
            .await
    }

    async fn stage_completed(&self, stage: &str, rows_in: usize, rows_out: usize) -> Result<()> {
        self.event_emitter
            .emit(PipelineEvent::StageCompleted {
                pipeline_id: self.pipeline_id.clone(),
                stage: stage.to_string(),
                rows_in,
                rows_out,
                timestamp: SystemTime::now(),
            })
            .await
    }

    /// Aplica a transformação etapa por etapa, com um `StageCompleted` para cada
    async fn run_stages(&self, mut data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        let mut stages = self.transformer.stages();
        if stages.is_empty() {
            stages.push(&self.transformer);
        }

        for stage in stages {
            let rows_in = data.len();
            data = stage.transform(data).await?;
            self.stage_completed(stage.name(), rows_in, data.len()).await?;
        }
        Ok(data)
    }

    /// Marca a execução como falha e devolve o erro original
    async fn fail(&self, phase: &str, err: ETLError) -> ETLError {
        let message = format!("{} [{}]: {}", phase, err.error_code(), err);

        let state_changed = self.set_state(PipelineState::Failed(message.clone())).await;
        let reported = self
            .event_emitter
            .emit(PipelineEvent::Error {
                pipeline_id: self.pipeline_id.clone(),
                error: message,
                timestamp: SystemTime::now(),
            })
            .await;
        if let Err(emit_err) = state_changed.and(reported) {
            tracing::warn!(error = %emit_err, "Falha ao emitir evento de erro");
        }

        err
    }

    /// Executa o pipeline uma vez
    pub async fn execute(&self) -> Result<PipelineResult> {
        let start_time = Instant::now();

        self.event_emitter
            .emit(PipelineEvent::Started {
                pipeline_id: self.pipeline_id.clone(),
                timestamp: SystemTime::now(),
            })
            .await?;

        self.set_state(PipelineState::Extracting).await?;

        match self.loader.health_check().await {
            Ok(true) => {}
            Ok(false) => {
                let err = ETLError::Pipeline("destino indisponível".to_string());
                return Err(self.fail("verificação do destino", err).await);
            }
            Err(e) => return Err(self.fail("verificação do destino", e).await),
        }

        let extracted = match self.extractor.extract().await {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail("extração", e).await),
        };
        let rows_extracted = extracted.len();
        self.stage_completed("extract", rows_extracted, rows_extracted).await?;

        self.set_state(PipelineState::Transforming).await?;

        let cleaned = match self.run_stages(extracted).await {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail("limpeza", e).await),
        };

        self.set_state(PipelineState::Loading).await?;

        let rows_cleaned = cleaned.len();
        let load_result = match self.loader.load(cleaned).await {
            Ok(result) => result,
            Err(e) => return Err(self.fail("carga", e).await),
        };
        if let Err(e) = self.loader.finalize().await {
            return Err(self.fail("carga", e).await);
        }
        self.stage_completed("load", rows_cleaned, load_result.rows_successful).await?;

        let result = PipelineResult {
            rows_extracted,
            rows_processed: load_result.rows_processed,
            rows_successful: load_result.rows_successful,
            rows_failed: load_result.rows_failed,
            execution_time_ms: start_time.elapsed().as_millis() as u64,
            errors: load_result.errors,
        };

        self.set_state(PipelineState::Completed).await?;
        self.event_emitter
            .emit(PipelineEvent::Completed {
                pipeline_id: self.pipeline_id.clone(),
                result: result.clone(),
                timestamp: SystemTime::now(),
            })
            .await?;

        Ok(result)
    }
}

/// Builder para criação de pipelines
pub struct PipelineBuilder<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
    event_emitter: Option<Arc<dyn EventEmitter>>,
}

impl PipelineBuilder<(), (), ()> {
    pub fn new() -> Self {
        Self {
            extractor: (),
            transformer: (),
            loader: (),
            event_emitter: None,
        }
    }
}

impl Default for PipelineBuilder<(), (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, T, L> PipelineBuilder<E, T, L> {
    /// Define o extrator
    pub fn extract<NewE: Extractor>(self, extractor: NewE) -> PipelineBuilder<NewE, T, L> {
        PipelineBuilder {
            extractor,
            transformer: self.transformer,
            loader: self.loader,
            event_emitter: self.event_emitter,
        }
    }

    /// Define o transformador
    pub fn transform<NewT: Transformer>(self, transformer: NewT) -> PipelineBuilder<E, NewT, L> {
        PipelineBuilder {
            extractor: self.extractor,
            transformer,
            loader: self.loader,
            event_emitter: self.event_emitter,
        }
    }

    /// Define o carregador
    pub fn load<NewL: Loader>(self, loader: NewL) -> PipelineBuilder<E, T, NewL> {
        PipelineBuilder {
            extractor: self.extractor,
            transformer: self.transformer,
            loader,
            event_emitter: self.event_emitter,
        }
    }

    /// Define o event emitter (padrão: [`LoggingEventEmitter`])
    pub fn event_emitter<Em: EventEmitter + 'static>(mut self, emitter: Em) -> Self {
        self.event_emitter = Some(Arc::new(emitter));
        self
    }
}

impl<E, T, L> PipelineBuilder<E, T, L>
where
    E: Extractor,
    T: Transformer,
    L: Loader,
{
    pub fn build(self) -> Pipeline<E, T, L> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        Pipeline {
            extractor: self.extractor,
            transformer: self.transformer,
            loader: self.loader,
            state: Arc::new(Mutex::new(PipelineState::default())),
            event_emitter: self
                .event_emitter
                .unwrap_or_else(|| Arc::new(LoggingEventEmitter::new())),
            pipeline_id: format!("pipeline-{}-{}", std::process::id(), millis),
        }
    }
}
