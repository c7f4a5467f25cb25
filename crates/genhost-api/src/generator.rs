use async_trait::async_trait;
use genhost_config::GeneratorConfiguration;
use genhost_tracer::{CancellationToken, GenerationTracer};

use crate::options::GeneratorOptions;

/// A pluggable component that registers deferred file-producing work.
///
/// The worker calls [`generate`](Self::generate) once per run and then
/// [`cleanup`](Self::cleanup) exactly once, whatever `generate` returned. Errors from
/// either step are logged by the worker and never stop other generators.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Inspect the project and register generation tasks on `tracer`.
    ///
    /// Files should be written by tasks rather than here, so that all generators'
    /// output is produced in the single concurrent execution round.
    async fn generate(
        &self,
        tracer: &GenerationTracer,
        config: &GeneratorConfiguration,
        options: &GeneratorOptions,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()>;

    async fn cleanup(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
