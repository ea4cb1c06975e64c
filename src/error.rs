//! Error types for the CircuitLab engine.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! every way an edit, a lookup, or a front-end load can fail. Physical
//! violations (KCL/KVL residuals, short circuits) are not errors: they are
//! data in a [`SolveResult`](crate::solver::SolveResult).

use thiserror::Error;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all CircuitLab operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    // ============ Structural Errors ============
    /// Unknown component kind
    #[error("Unknown component kind '{kind}'")]
    InvalidKind { kind: String },

    /// Kind-specific property absent from the property map
    #[error("Component '{component}' ({kind}) is missing property '{property}'")]
    MissingProperty {
        component: String,
        kind: String,
        property: String,
    },

    /// Property present with the wrong type
    #[error("Invalid property '{property}' for component '{component}': {message}")]
    InvalidProperty {
        component: String,
        property: String,
        message: String,
    },

    /// One or more validator findings for a component or connection
    #[error("{}", first_message(.messages))]
    Structural { messages: Vec<String> },

    /// Component id already in use
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// Connection id already in use, or terminal pair already joined
    #[error("Duplicate connection '{id}'")]
    DuplicateConnection { id: String },

    // ============ Lookup Errors ============
    /// Component id not present in the circuit
    #[error("Component '{id}' not found")]
    ComponentNotFound { id: String },

    /// Connection id not present in the circuit
    #[error("Connection '{id}' not found")]
    ConnectionNotFound { id: String },

    // ============ Numerical Errors ============
    /// Nodal matrix is singular and cannot be factored
    #[error("Singular matrix - circuit contains a loop of ideal sources")]
    SingularMatrix,

    // ============ History Errors ============
    /// Undo requested with an empty undo stack
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo requested with an empty redo stack
    #[error("Nothing to redo")]
    NothingToRedo,

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON passed to a front end
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn first_message(messages: &[String]) -> &str {
    messages.first().map(String::as_str).unwrap_or("Structural error")
}

impl CircuitError {
    /// Create a structural error from validator messages.
    pub fn structural(messages: Vec<String>) -> Self {
        Self::Structural { messages }
    }

    /// Create a missing property error
    pub fn missing_property(
        component: impl Into<String>,
        kind: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self::MissingProperty {
            component: component.into(),
            kind: kind.into(),
            property: property.into(),
        }
    }

    /// Create an invalid property error
    pub fn invalid_property(
        component: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            component: component.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// The ordered, human-readable messages carried by this error.
    ///
    /// Structural errors carry every validator finding in detection order;
    /// all other variants yield their display string as a single entry.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Structural { messages } if !messages.is_empty() => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    /// True when the error came from a failed id lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ComponentNotFound { .. } | Self::ConnectionNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_display_uses_first_message() {
        let err = CircuitError::structural(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "first");
        assert_eq!(err.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_single_message_variants() {
        let err = CircuitError::ComponentNotFound { id: "r9".into() };
        assert!(err.is_not_found());
        assert_eq!(err.messages(), vec!["Component 'r9' not found"]);
    }
}
