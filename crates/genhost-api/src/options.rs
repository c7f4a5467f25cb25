//! Run options shared by the supervisor and the worker

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const BUILD_ID_OPTION: &str = "--build-id";
pub const PROJECT_DIR_OPTION: &str = "--project-dir";
pub const OUTPUT_PATH_OPTION: &str = "--output-path";
pub const ROOT_NS_OPTION: &str = "--root-ns";
pub const EXT_REFS_OPTION: &str = "--ext-refs";
pub const GENERATORS_OPTION: &str = "--generators";

/// Separators accepted between entries of a generator list
pub const GENERATOR_LIST_DELIMITERS: [char; 2] = [',', ';'];

/// String-valued parameters of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub build_id: String,
    pub project_dir: PathBuf,
    /// Output directory, relative to `project_dir`
    pub output_path: String,
    pub root_namespace: String,
    pub external_references: String,
    /// Plugin library paths separated by `,` or `;`
    pub generators: String,
}

impl GeneratorOptions {
    /// Directory generated files are written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.project_dir.join(&self.output_path)
    }

    #[must_use]
    pub fn generator_list(&self) -> Vec<&str> {
        split_generator_list(&self.generators).collect()
    }

    /// Option name and value pairs, in command-line order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, String); 6] {
        [
            (BUILD_ID_OPTION, self.build_id.clone()),
            (PROJECT_DIR_OPTION, path_to_string(&self.project_dir)),
            (OUTPUT_PATH_OPTION, self.output_path.clone()),
            (ROOT_NS_OPTION, self.root_namespace.clone()),
            (EXT_REFS_OPTION, self.external_references.clone()),
            (GENERATORS_OPTION, self.generators.clone()),
        ]
    }

    /// Compose worker arguments. Options with an empty value are omitted so they cannot
    /// shift the positions of the options after them.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .flat_map(|(name, value)| [name.to_string(), value])
            .collect()
    }
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Split a generator list on `,` and `;`, trimming entries and dropping empty ones.
pub fn split_generator_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(GENERATOR_LIST_DELIMITERS)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GeneratorOptions {
        GeneratorOptions {
            build_id: "genhost_01".to_string(),
            project_dir: PathBuf::from("/work/app"),
            output_path: "obj/gen".to_string(),
            root_namespace: "Acme.App".to_string(),
            external_references: String::new(),
            generators: "libwrappers.so; libinterfaces.so,".to_string(),
        }
    }

    #[test]
    fn test_generator_list_accepts_both_delimiters() {
        assert_eq!(
            options().generator_list(),
            vec!["libwrappers.so", "libinterfaces.so"]
        );
        assert_eq!(split_generator_list(" ; , ").count(), 0);
    }

    #[test]
    fn test_output_dir_is_project_relative() {
        assert_eq!(options().output_dir(), PathBuf::from("/work/app/obj/gen"));
    }

    #[test]
    fn test_to_args_omits_empty_values() {
        let args = options().to_args();
        assert!(!args.iter().any(|arg| arg == EXT_REFS_OPTION));
        assert_eq!(&args[..2], ["--build-id", "genhost_01"]);
        assert_eq!(args.len(), 10);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(options()).unwrap();
        assert_eq!(json["rootNamespace"], "Acme.App");
        assert_eq!(json["outputPath"], "obj/gen");
    }
}
