//! Build ids and the sentinel frame that delimits a token in captured output

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use uuid::Uuid;

use crate::error::ProtocolError;

/// Template of the marker written before the token. `{id}` is the build id.
pub const BEGIN_TEMPLATE: &str = "+++++++++++++{id}++++++++++++++";
/// Template of the marker written after the token. `{id}` is the build id.
pub const END_TEMPLATE: &str = "-------------{id}---------------";

const BEGIN_FENCE: &str = "+++++++++++++";
const END_FENCE: &str = "-------------";
const ID_PLACEHOLDER: &str = "{id}";

/// Caller-chosen correlation token scoping one worker invocation's markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId(String);

impl BuildId {
    /// Validate and wrap a build id.
    ///
    /// # Errors
    ///
    /// Rejects blank ids, ids containing whitespace (they would not survive argv
    /// composition as a single value), and ids containing either sentinel fence.
    pub fn new(id: impl Into<String>) -> Result<Self, ProtocolError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(ProtocolError::BlankBuildId);
        }

        let reason = if id.chars().any(char::is_whitespace) {
            Some("contains whitespace")
        } else if id.contains(BEGIN_FENCE) || id.contains(END_FENCE) {
            Some("contains a sentinel fence")
        } else if id.contains(ID_PLACEHOLDER) {
            Some("contains the marker placeholder")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ProtocolError::InvalidBuildId {
                id,
                reason: reason.to_string(),
            }),
            None => Ok(Self(id)),
        }
    }

    /// Generate a fresh, unique build id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("genhost_{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BuildId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for BuildId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The begin/end markers for one build id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelFrame {
    begin: String,
    end: String,
}

impl SentinelFrame {
    #[must_use]
    pub fn for_build(build_id: &BuildId) -> Self {
        Self {
            begin: BEGIN_TEMPLATE.replace(ID_PLACEHOLDER, build_id.as_str()),
            end: END_TEMPLATE.replace(ID_PLACEHOLDER, build_id.as_str()),
        }
    }

    #[must_use]
    pub fn begin_marker(&self) -> &str {
        &self.begin
    }

    #[must_use]
    pub fn end_marker(&self) -> &str {
        &self.end
    }

    /// Surround a token with the markers.
    #[must_use]
    pub fn wrap(&self, token: &str) -> String {
        format!("{}{}{}", self.begin, token, self.end)
    }

    /// Find the first framed token in captured output.
    ///
    /// The match is non-greedy: the token ends at the first end marker following the
    /// begin marker, and may span lines.
    #[must_use]
    pub fn extract<'a>(&self, output: &'a str) -> Option<&'a str> {
        let pattern = format!(
            "(?s){}(.*?){}",
            regex::escape(&self.begin),
            regex::escape(&self.end)
        );
        let regex = Regex::new(&pattern).ok()?;

        regex
            .captures(output)
            .and_then(|captures| captures.get(1))
            .map(|token| token.as_str())
    }
}
