//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use genhost_api::GeneratorOptions;

/// genhost - build-time code generation host
#[derive(Parser, Debug)]
#[command(name = "genhost")]
#[command(about = "Run code generator plugins for a project and report the generated files")]
#[command(long_about = r#"
genhost loads generator plugins, lets them register file-producing tasks, runs those
tasks concurrently, and reports the generated files back to the build.

The build invokes `genhost run`, which launches `genhost worker` as a separate process,
enforces a timeout and decodes the worker's result.

EXAMPLES:
  # Generate into obj/gen with two plugin libraries
  genhost run --project-dir . --output-path obj/gen --generators "libwrappers.so;libapi.so"

  # Run the worker directly (prints the framed result on stdout)
  genhost worker --build-id b1 --project-dir . --output-path obj/gen --generators libwrappers.so

CONFIGURATION:
  Generator settings are read from the "CodeGenerator" section of codegen.json, or
  appsettings.json when codegen.json is absent, in the project directory.
"#)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run generators in this process and print the framed result on stdout
    Worker(WorkerArgs),

    /// Launch a worker process, wait for it and print the outcome as JSON
    Run(RunArgs),
}

/// Run options passed to a worker.
#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    /// Correlation id scoping the result markers
    #[arg(long = "build-id", default_value = "")]
    pub build_id: String,

    /// Project directory; configuration is discovered here
    #[arg(long = "project-dir")]
    pub project_dir: PathBuf,

    /// Output directory relative to the project directory
    #[arg(long = "output-path", default_value = "")]
    pub output_path: String,

    /// Root namespace for generated code
    #[arg(long = "root-ns", default_value = "")]
    pub root_namespace: String,

    /// External references, passed through to generators
    #[arg(long = "ext-refs", default_value = "")]
    pub external_references: String,

    /// Generator libraries separated by ',' or ';'
    #[arg(long, default_value = "")]
    pub generators: String,
}

impl From<WorkerArgs> for GeneratorOptions {
    fn from(args: WorkerArgs) -> Self {
        Self {
            build_id: args.build_id,
            project_dir: args.project_dir,
            output_path: args.output_path,
            root_namespace: args.root_namespace,
            external_references: args.external_references,
            generators: args.generators,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long = "project-dir")]
    pub project_dir: PathBuf,

    #[arg(long = "output-path", default_value = "")]
    pub output_path: String,

    #[arg(long = "root-ns", default_value = "")]
    pub root_namespace: String,

    #[arg(long = "ext-refs", default_value = "")]
    pub external_references: String,

    /// Generator libraries separated by ',' or ';'
    #[arg(long, default_value = "")]
    pub generators: String,

    /// Worker timeout in milliseconds (raised to the 30 second minimum)
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Worker executable taking run options directly (default: this executable's
    /// `worker` subcommand)
    #[arg(long)]
    pub worker: Option<PathBuf>,

    /// Build id to use instead of a generated one
    #[arg(long = "build-id")]
    pub build_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_worker_args_map_to_options() {
        let cli = Cli::try_parse_from([
            "genhost",
            "worker",
            "--build-id",
            "b1",
            "--project-dir",
            "/work/app",
            "--generators",
            "a.so;b.so",
        ])
        .unwrap();

        let Commands::Worker(args) = cli.command else {
            panic!("expected worker command");
        };
        let options = GeneratorOptions::from(args);
        assert_eq!(options.build_id, "b1");
        assert_eq!(options.output_path, "");
        assert_eq!(options.generator_list(), vec!["a.so", "b.so"]);
    }

    #[test]
    fn test_project_dir_is_required() {
        assert!(Cli::try_parse_from(["genhost", "worker", "--build-id", "b1"]).is_err());
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::try_parse_from([
            "genhost",
            "-v",
            "run",
            "--project-dir",
            ".",
            "--timeout-ms",
            "45000",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.timeout_ms, Some(45_000));
        assert!(args.worker.is_none());
    }
}
