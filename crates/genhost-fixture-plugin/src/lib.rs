//! Generator plugin library loaded by the dynamic loader tests

use genhost_api::{
    CancellationToken, CodeGenerator, GenerationTracer, GeneratorConfiguration, GeneratorOptions,
};

/// Produces `Fixture.g.cs` without touching the filesystem.
#[derive(Debug, Default)]
pub struct FixtureGenerator;

#[genhost_api::async_trait]
impl CodeGenerator for FixtureGenerator {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn generate(
        &self,
        tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracer.add_generation_task(|_| async { Ok("Fixture.g.cs".to_string()) });
        Ok(())
    }
}

/// Second export, so the table order can be checked.
#[derive(Debug, Default)]
pub struct SilentGenerator;

#[genhost_api::async_trait]
impl CodeGenerator for SilentGenerator {
    fn name(&self) -> &str {
        "silent"
    }

    async fn generate(
        &self,
        _tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

genhost_api::export_generators!(FixtureGenerator, SilentGenerator);
