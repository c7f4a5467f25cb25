//! Generator capability for genhost
//!
//! This crate is the contract between the worker and generator plugins. A plugin
//! implements [`CodeGenerator`], lists its types with [`export_generators!`], and is
//! built as a `cdylib`. Everything a generator needs at run time is re-exported here so
//! plugins depend on this crate alone.
//!
//! ```ignore
//! use genhost_api::{CodeGenerator, GenerationTracer, GeneratorConfiguration, GeneratorOptions};
//!
//! #[derive(Default)]
//! struct Wrappers;
//!
//! #[genhost_api::async_trait]
//! impl CodeGenerator for Wrappers {
//!     async fn generate(
//!         &self,
//!         tracer: &GenerationTracer,
//!         _config: &GeneratorConfiguration,
//!         options: &GeneratorOptions,
//!         _cancel: &genhost_api::CancellationToken,
//!     ) -> anyhow::Result<()> {
//!         let target = options.output_dir().join("Wrappers.g.cs");
//!         tracer.add_generation_task(move |_| async move {
//!             std::fs::write(&target, "// generated")?;
//!             Ok(target.display().to_string())
//!         });
//!         Ok(())
//!     }
//! }
//!
//! genhost_api::export_generators!(Wrappers);
//! ```

mod exports;
mod generator;
mod options;

pub use async_trait::async_trait;
pub use exports::{
    API_VERSION_SYMBOL, ApiVersionFn, Constructor, EXPORTS_SYMBOL, ExportKind, ExportedType,
    ExportsFn, GENHOST_API_VERSION, Instance, construct_default, into_instance,
};
pub use generator::CodeGenerator;
pub use options::{
    BUILD_ID_OPTION, EXT_REFS_OPTION, GENERATOR_LIST_DELIMITERS, GENERATORS_OPTION,
    GeneratorOptions, OUTPUT_PATH_OPTION, PROJECT_DIR_OPTION, ROOT_NS_OPTION,
    split_generator_list,
};

pub use genhost_config::GeneratorConfiguration;
pub use genhost_tracer::{CancellationToken, GenerationTracer, LogEntry, Severity};

/// Export a list of generator types from a plugin library.
///
/// Each type must implement [`CodeGenerator`] and [`Default`]. The macro emits the two
/// symbols the dynamic loader looks up: the API version and the export table.
#[macro_export]
macro_rules! export_generators {
    ($($generator:ty),* $(,)?) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn genhost_api_version() -> u32 {
            $crate::GENHOST_API_VERSION
        }

        #[unsafe(no_mangle)]
        pub extern "Rust" fn genhost_generator_exports() -> ::std::vec::Vec<$crate::ExportedType> {
            ::std::vec![$($crate::ExportedType::generator::<$generator>(stringify!($generator))),*]
        }
    };
}
