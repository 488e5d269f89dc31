//! Sistema de eventos para observabilidade do pipeline

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::error::Result;
use crate::traits::EventEmitter;
use crate::types::PipelineEvent;
use tracing::{debug, error, info};

/// EventEmitter que registra cada evento via `tracing`
#[derive(Debug, Clone, Default)]
pub struct LoggingEventEmitter;

impl LoggingEventEmitter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventEmitter for LoggingEventEmitter {
    async fn emit(&self, event: PipelineEvent) -> Result<()> {
        match event {
            PipelineEvent::Started { pipeline_id, .. } => {
                info!(pipeline_id = %pipeline_id, "Pipeline iniciado");
            }
            PipelineEvent::StateChanged {
                pipeline_id,
                old_state,
                new_state,
                ..
            } => {
                debug!(
                    pipeline_id = %pipeline_id,
                    old_state = %old_state,
                    new_state = %new_state,
                    "Estado do pipeline alterado"
                );
            }
            PipelineEvent::StageCompleted {
                pipeline_id,
                stage,
                rows_in,
                rows_out,
                ..
            } => {
                info!(
                    pipeline_id = %pipeline_id,
                    stage = %stage,
                    rows_in = rows_in,
                    rows_out = rows_out,
                    dropped = rows_in.saturating_sub(rows_out),
                    "Fase concluída"
                );
            }
            PipelineEvent::Error { pipeline_id, error, .. } => {
                error!(pipeline_id = %pipeline_id, error = %error, "Erro no pipeline");
            }
            PipelineEvent::Completed { pipeline_id, result, .. } => {
                info!(
                    pipeline_id = %pipeline_id,
                    rows_extracted = result.rows_extracted,
                    rows_kept = result.rows_successful,
                    rows_dropped = result.rows_dropped(),
                    execution_time_ms = result.execution_time_ms,
                    "Pipeline concluído"
                );
            }
        }

        Ok(())
    }
}

/// EventEmitter que guarda os eventos em memória (útil em testes)
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventEmitter {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl InMemoryEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<PipelineEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Retorna todos os eventos capturados
    pub fn get_events(&self) -> Vec<PipelineEvent> {
        self.events().clone()
    }

    pub fn clear(&self) {
        self.events().clear();
    }

    pub fn event_count(&self) -> usize {
        self.events().len()
    }
}

#[async_trait]
impl EventEmitter for InMemoryEventEmitter {
    async fn emit(&self, event: PipelineEvent) -> Result<()> {
        self.events().push(event);
        Ok(())
    }
}
