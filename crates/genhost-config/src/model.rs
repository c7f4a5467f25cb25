use serde::Deserialize;
use serde_json::{Map, Value};

/// Default upper bound for waiting on a debugger when `host_debugging` is set
pub const DEFAULT_DEBUGGER_WAIT_SECS: u64 = 60;

/// Flags every generator sees, plus the raw configuration section.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfiguration {
    /// Skip all generators for this project
    pub disabled: bool,
    /// Generator-defined debugging switch
    pub debugging: bool,
    /// Write a run log next to the generated files
    pub logging: bool,
    /// Make the worker wait for a debugger before resolving generators
    pub host_debugging: bool,
    /// How long the worker waits for a debugger, in seconds
    pub debugger_wait_secs: u64,
    /// The whole configuration section, unchanged
    pub raw: Value,
}

impl Default for GeneratorConfiguration {
    fn default() -> Self {
        Self {
            disabled: false,
            debugging: false,
            logging: false,
            host_debugging: false,
            debugger_wait_secs: DEFAULT_DEBUGGER_WAIT_SECS,
            raw: Value::Null,
        }
    }
}

/// Known fields, keyed by their normalized names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SectionFields {
    disabled: bool,
    debugging: bool,
    logging: bool,
    hostdebugging: bool,
    debuggerwaitsecs: Option<u64>,
}

/// `HostDebugging`, `host_debugging` and `host-debugging` all normalize to `hostdebugging`.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl GeneratorConfiguration {
    /// Build a configuration from a `CodeGenerator` section.
    ///
    /// Returns `None` if a known field has the wrong type. Unknown fields are ignored
    /// here and remain available through [`raw`](Self::raw).
    #[must_use]
    pub fn from_section(section: &Map<String, Value>) -> Option<Self> {
        let normalized: Map<String, Value> = section
            .iter()
            .map(|(key, value)| (normalize_key(key), value.clone()))
            .collect();

        let fields: SectionFields = serde_json::from_value(Value::Object(normalized)).ok()?;

        Some(Self {
            disabled: fields.disabled,
            debugging: fields.debugging,
            logging: fields.logging,
            host_debugging: fields.hostdebugging,
            debugger_wait_secs: fields
                .debuggerwaitsecs
                .unwrap_or(DEFAULT_DEBUGGER_WAIT_SECS),
            raw: Value::Object(section.clone()),
        })
    }
}
