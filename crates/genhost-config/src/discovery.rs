use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;
use crate::model::GeneratorConfiguration;

/// Files looked up in the project directory, in priority order.
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["codegen.json", "appsettings.json"];

/// Name of the section holding generator settings.
pub const SECTION_NAME: &str = "CodeGenerator";

impl GeneratorConfiguration {
    /// Discover configuration for a project.
    ///
    /// The first existing candidate file wins; later candidates are not consulted even
    /// when the first one has no usable section.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or is not valid JSON.
    pub fn discover(project_dir: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::find_config_file(project_dir) {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!(project_dir = %project_dir.display(), "No configuration file found");
                Ok(None)
            }
        }
    }

    /// Locate the configuration file for a project, if any.
    #[must_use]
    pub fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_CANDIDATES
            .iter()
            .map(|name| project_dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration from a specific JSON file.
    ///
    /// Returns `Ok(None)` when the document has no usable `CodeGenerator` section: the
    /// section is missing, is not an object, is empty, or holds a known field with the
    /// wrong type.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let document: Value =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let section = document.as_object().and_then(|root| {
            root.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(SECTION_NAME))
                .map(|(_, value)| value)
        });

        let config = match section.and_then(Value::as_object) {
            Some(section) if !section.is_empty() => Self::from_section(section),
            _ => None,
        };

        if config.is_none() {
            tracing::debug!(path = %path.display(), "No usable {SECTION_NAME} section");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_discover_without_files() {
        let dir = TempDir::new().unwrap();
        assert!(GeneratorConfiguration::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_discover_nonexistent_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(GeneratorConfiguration::discover(&missing).unwrap().is_none());
    }

    #[test]
    fn test_discover_prefers_codegen_json() {
        let dir = TempDir::new().unwrap();
        write(&dir, "codegen.json", r#"{"CodeGenerator": {"Logging": true}}"#);
        write(&dir, "appsettings.json", r#"{"CodeGenerator": {"Disabled": true}}"#);

        let config = GeneratorConfiguration::discover(dir.path()).unwrap().unwrap();
        assert!(config.logging);
        assert!(!config.disabled);
    }

    #[test]
    fn test_discover_falls_back_to_appsettings() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "appsettings.json",
            r#"{"Logging": {"LogLevel": "Warning"}, "codegenerator": {"Disabled": true}}"#,
        );

        let config = GeneratorConfiguration::discover(dir.path()).unwrap().unwrap();
        assert!(config.disabled);
    }

    #[test]
    fn test_first_candidate_wins_even_without_section() {
        let dir = TempDir::new().unwrap();
        write(&dir, "codegen.json", r#"{"Other": {}}"#);
        write(&dir, "appsettings.json", r#"{"CodeGenerator": {"Disabled": true}}"#);

        assert!(GeneratorConfiguration::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_empty_section_is_absent() {
        let dir = TempDir::new().unwrap();
        write(&dir, "codegen.json", r#"{"CodeGenerator": {}}"#);
        assert!(GeneratorConfiguration::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_non_object_section_is_absent() {
        let dir = TempDir::new().unwrap();
        write(&dir, "codegen.json", r#"{"CodeGenerator": "enabled"}"#);
        assert!(GeneratorConfiguration::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "codegen.json", "{ not json");

        let err = GeneratorConfiguration::discover(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_raw_section_keeps_generator_settings() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "codegen.json",
            r#"{"CodeGenerator": {"Logging": true, "Namespace": "Acme.Generated"}}"#,
        );

        let config = GeneratorConfiguration::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.raw["Namespace"], "Acme.Generated");
    }
}
