//! Source locations for declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in a source file (1-indexed line and column).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path or URL of the file.
    pub file: String,
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Where a declaration was made, in generated and original (source-mapped)
/// coordinates. Either may be unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    /// Location in the code that actually ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_location: Option<Location>,
    /// Location in the authored source, if a source map was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_location: Option<Location>,
}

impl Locations {
    /// Creates locations with only a generated location.
    #[must_use]
    pub fn generated(location: Location) -> Self {
        Self {
            generated_location: Some(location),
            original_location: None,
        }
    }

    /// Builder method to set the original location.
    #[must_use]
    pub fn with_original(mut self, location: Location) -> Self {
        self.original_location = Some(location);
        self
    }

    /// Returns the most useful location: original if known, else generated.
    #[must_use]
    pub fn preferred(&self) -> Option<&Location> {
        self.original_location
            .as_ref()
            .or(self.generated_location.as_ref())
    }
}
