//! Worker Runner behavior with in-process stub generators.

use std::sync::{Arc, Mutex};

use genhost::protocol::{BuildId, SentinelFrame, decode};
use genhost::runner::FixedDebuggerProbe;
use genhost::tracer::{CancellationToken, LogEntry, LogSink, Severity};
use genhost::{GeneratorConfiguration, GeneratorOptions, Worker, WorkerError};
use tempfile::TempDir;

const BUILD_ID: &str = "genhost_worker_test";

#[derive(Default)]
struct MemorySink(Mutex<Vec<LogEntry>>);

impl LogSink for MemorySink {
    fn record(&self, entry: &LogEntry) {
        self.0.lock().unwrap().push(entry.clone());
    }
}

fn worker() -> Worker {
    Worker::new(genhost::stub::registry()).with_probe(FixedDebuggerProbe(false))
}

fn options(project: &TempDir, generators: &str) -> GeneratorOptions {
    GeneratorOptions {
        build_id: BUILD_ID.to_string(),
        project_dir: project.path().to_path_buf(),
        output_path: "obj/gen".to_string(),
        root_namespace: "Acme.App".to_string(),
        external_references: String::new(),
        generators: generators.to_string(),
    }
}

async fn run(
    options: &GeneratorOptions,
    config: &GeneratorConfiguration,
) -> genhost::WorkerRun {
    worker()
        .run(options, config, &CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_one_file_and_one_failure() {
    let project = TempDir::new().unwrap();
    let run = run(
        &options(&project, "stub:two-tasks"),
        &GeneratorConfiguration::default(),
    )
    .await;

    assert_eq!(run.result.generated_code_files, vec!["a.cs".to_string()]);
    assert_eq!(run.traced.count(Severity::Error), 1);
    assert!(run.traced.logs.iter().any(|entry| entry.message.contains("bad")));

    let frame_line = run.frame.unwrap();
    let frame = SentinelFrame::for_build(&BuildId::new(BUILD_ID).unwrap());
    let decoded = decode(frame.extract(&frame_line).unwrap()).unwrap();
    assert_eq!(decoded, run.result);
}

#[tokio::test]
async fn test_no_generators_emits_nothing() {
    let project = TempDir::new().unwrap();
    let run = run(&options(&project, ""), &GeneratorConfiguration::default()).await;

    assert!(run.result.is_empty());
    assert!(run.frame.is_none());
}

#[tokio::test]
async fn test_unusable_libraries_emit_nothing() {
    let project = TempDir::new().unwrap();
    let missing = project.path().join("libmissing.so");
    let list = format!("{};stub:helpers-only", missing.display());

    let run = run(&options(&project, &list), &GeneratorConfiguration::default()).await;

    assert!(run.frame.is_none());
    assert!(run.traced.logs.is_empty());
}

#[tokio::test]
async fn test_blank_outputs_are_not_reported() {
    let project = TempDir::new().unwrap();
    let run = run(
        &options(&project, "stub:empty"),
        &GeneratorConfiguration::default(),
    )
    .await;

    assert!(run.frame.is_none());
    assert_eq!(run.traced.count(Severity::Error), 0);
}

#[tokio::test]
async fn test_generator_failures_do_not_stop_others() {
    let project = TempDir::new().unwrap();
    let run = run(
        &options(&project, "stub:panicking;stub:failing;stub:two-tasks"),
        &GeneratorConfiguration::default(),
    )
    .await;

    assert_eq!(run.result.generated_code_files, vec!["a.cs".to_string()]);
    // generate and cleanup of the panicking stub, generate of the failing one, one task
    assert_eq!(run.traced.count(Severity::Error), 4);
    assert!(
        run.traced
            .logs
            .iter()
            .any(|entry| entry.message.contains("could not read project metadata"))
    );
}

#[tokio::test]
async fn test_written_files_and_their_directories() {
    let project = TempDir::new().unwrap();
    let run = run(
        &options(&project, "stub:write-files"),
        &GeneratorConfiguration::default(),
    )
    .await;

    let output_dir = project.path().join("obj/gen");
    let models = output_dir.join("Models");

    let mut files = run.result.generated_code_files.clone();
    files.sort();
    assert_eq!(files.len(), 2);
    assert!(output_dir.join("Root.g.cs").is_file());
    assert!(models.join("User.g.cs").is_file());
    assert_eq!(
        run.result.generated_paths,
        vec![models.to_string_lossy().into_owned()]
    );
}

#[tokio::test]
async fn test_duplicate_references_are_deduplicated_in_result() {
    let project = TempDir::new().unwrap();
    let run = run(
        &options(&project, "stub:two-tasks;stub:two-tasks"),
        &GeneratorConfiguration::default(),
    )
    .await;

    assert_eq!(run.traced.generated_files.len(), 2);
    assert_eq!(run.result.generated_code_files, vec!["a.cs".to_string()]);
}

#[tokio::test]
async fn test_disabled_configuration_skips_generators() {
    let project = TempDir::new().unwrap();
    let config = GeneratorConfiguration {
        disabled: true,
        ..GeneratorConfiguration::default()
    };

    let run = run(&options(&project, "stub:two-tasks"), &config).await;
    assert!(run.frame.is_none());
    assert!(run.traced.logs.is_empty());
}

#[tokio::test]
async fn test_logging_writes_run_log() {
    let project = TempDir::new().unwrap();
    let config = GeneratorConfiguration {
        logging: true,
        ..GeneratorConfiguration::default()
    };

    let run = run(&options(&project, "stub:two-tasks"), &config).await;

    let log_path = project.path().join("obj/gen").join(genhost::worker::RUN_LOG_FILE);
    assert_eq!(
        run.result.generated_plain_files,
        vec![log_path.to_string_lossy().into_owned()]
    );

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("--build-id genhost_worker_test"));
    assert!(log.contains("[Error "));
    assert!(run.frame.is_some());
}

#[tokio::test]
async fn test_host_debugging_waits_for_probe() {
    let project = TempDir::new().unwrap();
    let config = GeneratorConfiguration {
        host_debugging: true,
        debugger_wait_secs: 30,
        ..GeneratorConfiguration::default()
    };

    let worker = Worker::new(genhost::stub::registry()).with_probe(FixedDebuggerProbe(true));
    let started = std::time::Instant::now();
    let run = worker
        .run(
            &options(&project, "stub:two-tasks"),
            &config,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    assert_eq!(run.result.generated_code_files, vec!["a.cs".to_string()]);
}

#[tokio::test]
async fn test_blank_build_id_skips_generation() {
    let project = TempDir::new().unwrap();
    let mut options = options(&project, "stub:two-tasks");
    options.build_id = "  ".to_string();

    let run = run(&options, &GeneratorConfiguration::default()).await;
    assert!(run.frame.is_none());
    assert!(run.traced.logs.is_empty());
}

#[tokio::test]
async fn test_invalid_build_id_is_a_worker_error() {
    let project = TempDir::new().unwrap();
    let mut options = options(&project, "stub:two-tasks");
    options.build_id = "two words".to_string();

    let err = worker()
        .run(
            &options,
            &GeneratorConfiguration::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkerError::Protocol(_)));
}

#[tokio::test]
async fn test_tracer_logs_reach_the_sink() {
    let project = TempDir::new().unwrap();
    let sink = Arc::new(MemorySink::default());
    let worker = worker().with_sink(sink.clone());

    worker
        .run(
            &options(&project, "stub:two-tasks"),
            &GeneratorConfiguration::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let recorded = sink.0.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_cancelled_run_writes_nothing() {
    let project = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let run = worker()
        .run(
            &options(&project, "stub:write-files"),
            &GeneratorConfiguration::default(),
            &cancel,
        )
        .await
        .unwrap();

    assert!(run.frame.is_none());
    assert_eq!(run.traced.count(Severity::Error), 2);
    assert!(!project.path().join("obj/gen/Root.g.cs").exists());
}
