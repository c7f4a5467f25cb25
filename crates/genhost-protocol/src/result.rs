//! The terminal result of one generation run

use serde::{Deserialize, Serialize};

/// Files and directories produced by one worker run.
///
/// A result is *empty* when all three sequences are empty. An empty result is never
/// emitted by the worker, and a decoded empty result is treated by the supervisor the
/// same way as no result at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Generated source files that should be compiled with the project
    pub generated_code_files: Vec<String>,
    /// Generated files that are not compiled (logs, data files)
    pub generated_plain_files: Vec<String>,
    /// Directories that hold generated files, excluding the output root itself
    pub generated_paths: Vec<String>,
}

impl GenerationResult {
    #[must_use]
    pub fn new(
        generated_code_files: Vec<String>,
        generated_plain_files: Vec<String>,
        generated_paths: Vec<String>,
    ) -> Self {
        Self {
            generated_code_files,
            generated_plain_files,
            generated_paths,
        }
    }

    /// Check whether the run produced nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generated_code_files.is_empty()
            && self.generated_plain_files.is_empty()
            && self.generated_paths.is_empty()
    }

    /// Total number of entries across the three sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generated_code_files.len()
            + self.generated_plain_files.len()
            + self.generated_paths.len()
    }
}
