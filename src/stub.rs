//! Built-in stub generators for exercising the worker end to end
//!
//! Each stub is registered under a `stub:` reference in [`registry`]. The `genhost-stub`
//! binary serves them through a worker so the supervisor can be tested against a real
//! process without building plugin libraries.

use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use genhost_api::{
    CancellationToken, CodeGenerator, ExportKind, ExportedType, GenerationTracer,
    GeneratorConfiguration, GeneratorOptions,
};
use genhost_resolver::RegistryLoader;

/// One task producing `a.cs` and one task failing.
#[derive(Debug, Default)]
pub struct TwoTasks;

#[async_trait]
impl CodeGenerator for TwoTasks {
    fn name(&self) -> &str {
        "stub:two-tasks"
    }

    async fn generate(
        &self,
        tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracer.add_generation_task(|_| async { Ok("a.cs".to_string()) });
        tracer.add_generation_task(|_| async { bail!("bad") });
        Ok(())
    }
}

/// Writes real files under the output directory, one of them in a subdirectory.
#[derive(Debug, Default)]
pub struct WriteFiles;

#[async_trait]
impl CodeGenerator for WriteFiles {
    fn name(&self) -> &str {
        "stub:write-files"
    }

    async fn generate(
        &self,
        tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        let namespace = if options.root_namespace.is_empty() {
            tracer.add_warning_log("No root namespace supplied, using Generated");
            "Generated".to_string()
        } else {
            options.root_namespace.clone()
        };

        for relative in ["Root.g.cs", "Models/User.g.cs"] {
            let target = options.output_dir().join(relative);
            let namespace = namespace.clone();

            tracer.add_generation_task(move |cancel: CancellationToken| async move {
                if cancel.is_cancelled() {
                    bail!("cancelled before writing {}", target.display());
                }
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&target, format!("namespace {namespace};\n"))
                    .await
                    .with_context(|| format!("failed to write {}", target.display()))?;
                Ok(target.to_string_lossy().into_owned())
            });
        }
        Ok(())
    }
}

/// Registers only a task that intentionally produces nothing.
#[derive(Debug, Default)]
pub struct Empty;

#[async_trait]
impl CodeGenerator for Empty {
    fn name(&self) -> &str {
        "stub:empty"
    }

    async fn generate(
        &self,
        tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracer.add_generation_task(|_| async { Ok(String::new()) });
        Ok(())
    }
}

/// Sleeps long enough to outlive any test timeout.
#[derive(Debug, Default)]
pub struct Sleep;

#[async_trait]
impl CodeGenerator for Sleep {
    fn name(&self) -> &str {
        "stub:sleep"
    }

    async fn generate(
        &self,
        tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracer.add_info_log("sleeping");
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

/// Writes to standard error, which fails the run as seen by the supervisor.
#[derive(Debug, Default)]
pub struct Stderr;

#[async_trait]
impl CodeGenerator for Stderr {
    fn name(&self) -> &str {
        "stub:stderr"
    }

    async fn generate(
        &self,
        tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        eprintln!("stub generator wrote to stderr");
        tracer.add_generation_task(|_| async { Ok("stderr.cs".to_string()) });
        Ok(())
    }
}

/// Panics in both steps.
#[derive(Debug, Default)]
pub struct Panicking;

#[async_trait]
impl CodeGenerator for Panicking {
    fn name(&self) -> &str {
        "stub:panicking"
    }

    async fn generate(
        &self,
        _tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        panic!("stub generator panicked")
    }

    async fn cleanup(&self) -> anyhow::Result<()> {
        panic!("stub cleanup panicked")
    }
}

/// One task panics, its sibling produces `task.cs`.
#[derive(Debug, Default)]
pub struct PanickingTask;

fn explode() -> anyhow::Result<String> {
    panic!("stub task panicked")
}

#[async_trait]
impl CodeGenerator for PanickingTask {
    fn name(&self) -> &str {
        "stub:panicking-task"
    }

    async fn generate(
        &self,
        tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracer.add_generation_task(|_| async { explode() });
        tracer.add_generation_task(|_| async { Ok("task.cs".to_string()) });
        Ok(())
    }
}

/// Fails its generate step but must still be cleaned up.
#[derive(Debug, Default)]
pub struct FailingGenerate {
    cleaned: std::sync::atomic::AtomicBool,
}

impl FailingGenerate {
    #[must_use]
    pub fn cleaned_up(&self) -> bool {
        self.cleaned.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeGenerator for FailingGenerate {
    fn name(&self) -> &str {
        "stub:failing"
    }

    async fn generate(
        &self,
        _tracer: &GenerationTracer,
        _config: &GeneratorConfiguration,
        _options: &GeneratorOptions,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        bail!("could not read project metadata")
    }

    async fn cleanup(&self) -> anyhow::Result<()> {
        self.cleaned.store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

/// Registry serving every stub under its `stub:` reference.
#[must_use]
pub fn registry() -> RegistryLoader {
    RegistryLoader::new()
        .with_library("stub:two-tasks", vec![ExportedType::generator::<TwoTasks>("TwoTasks")])
        .with_library(
            "stub:write-files",
            vec![ExportedType::generator::<WriteFiles>("WriteFiles")],
        )
        .with_library("stub:empty", vec![ExportedType::generator::<Empty>("Empty")])
        .with_library("stub:sleep", vec![ExportedType::generator::<Sleep>("Sleep")])
        .with_library("stub:stderr", vec![ExportedType::generator::<Stderr>("Stderr")])
        .with_library(
            "stub:panicking",
            vec![ExportedType::generator::<Panicking>("Panicking")],
        )
        .with_library(
            "stub:panicking-task",
            vec![ExportedType::generator::<PanickingTask>("PanickingTask")],
        )
        .with_library(
            "stub:failing",
            vec![ExportedType::generator::<FailingGenerate>("FailingGenerate")],
        )
        .with_library(
            "stub:helpers-only",
            vec![
                ExportedType::new("Helpers", ExportKind::Concrete, false, None),
                ExportedType::new("GeneratorBase", ExportKind::Abstract, true, None),
            ],
        )
}
