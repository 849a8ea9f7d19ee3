//! Error types for the editor

use canopy_document::{Diagnostic, DiagnosticCode};
use thiserror::Error;

/// Why a single patch could not be applied.
///
/// The engine never returns these to callers directly: each one becomes
/// exactly one error [`Diagnostic`] next to the unmodified page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("The page root cannot be removed")]
    CannotRemoveRoot,

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid path '{path}': expected '{expected}<name>'")]
    InvalidPath { path: String, expected: &'static str },

    #[error("{op} is only valid on {expected}, target is {actual}")]
    InvalidTarget {
        op: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Variant '{variant}' is not allowed for {component} (allowed: {allowed})")]
    InvalidVariant {
        variant: String,
        component: String,
        allowed: String,
    },

    #[error("{0} does not support children")]
    NotAContainer(String),

    #[error("Cannot move {0} into its own subtree")]
    CycleDetected(String),

    #[error("Node id already exists: {0}")]
    DuplicateId(String),
}

impl PatchError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            PatchError::NodeNotFound(_) => DiagnosticCode::NodeNotFound,
            PatchError::ParentNotFound(_) => DiagnosticCode::ParentNotFound,
            PatchError::CannotRemoveRoot => DiagnosticCode::CannotRemoveRoot,
            PatchError::InvalidPosition(_) => DiagnosticCode::InvalidPosition,
            PatchError::InvalidPath { .. } => DiagnosticCode::InvalidPath,
            PatchError::InvalidTarget { .. } => DiagnosticCode::InvalidTarget,
            PatchError::InvalidArgument(_) => DiagnosticCode::InvalidArgument,
            PatchError::MissingArgument(_) => DiagnosticCode::MissingArgument,
            PatchError::InvalidVariant { .. } => DiagnosticCode::InvalidVariant,
            PatchError::NotAContainer(_) => DiagnosticCode::NotAContainer,
            PatchError::CycleDetected(_) => DiagnosticCode::CycleDetected,
            PatchError::DuplicateId(_) => DiagnosticCode::DuplicateId,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
    }
}

/// Failure turning an untyped `{ targetId, op, args }` envelope into a [`crate::Patch`]
#[derive(Error, Debug)]
pub enum PatchDecodeError {
    #[error("Unknown patch operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid args for {op}: {source}")]
    InvalidArgs {
        op: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PatchDecodeError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            PatchDecodeError::UnknownOperation(_) => DiagnosticCode::UnknownOperation,
            PatchDecodeError::InvalidArgs { .. } => DiagnosticCode::InvalidArgument,
        };
        Diagnostic::error(code, self.to_string())
    }
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum UndoError {
    #[error("Undo failed: {0}")]
    UndoFailed(Diagnostic),

    #[error("Redo failed: {0}")]
    RedoFailed(Diagnostic),
}
