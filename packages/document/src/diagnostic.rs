use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// Stable machine-readable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    NodeNotFound,
    ParentNotFound,
    CannotRemoveRoot,
    InvalidPosition,
    UnknownOperation,
    InvalidPath,
    InvalidTarget,
    InvalidArgument,
    MissingArgument,
    UnknownProp,
    UnknownComponent,
    InvalidVariant,
    NotAContainer,
    CycleDetected,
    DuplicateId,
    MissingSubcomponents,
    ValidationFailed,
    TargetNotFound,
    TargetFallback,
    NoPatternMatched,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::NodeNotFound => "NODE_NOT_FOUND",
            DiagnosticCode::ParentNotFound => "PARENT_NOT_FOUND",
            DiagnosticCode::CannotRemoveRoot => "CANNOT_REMOVE_ROOT",
            DiagnosticCode::InvalidPosition => "INVALID_POSITION",
            DiagnosticCode::UnknownOperation => "UNKNOWN_OPERATION",
            DiagnosticCode::InvalidPath => "INVALID_PATH",
            DiagnosticCode::InvalidTarget => "INVALID_TARGET",
            DiagnosticCode::InvalidArgument => "INVALID_ARGUMENT",
            DiagnosticCode::MissingArgument => "MISSING_ARGUMENT",
            DiagnosticCode::UnknownProp => "UNKNOWN_PROP",
            DiagnosticCode::UnknownComponent => "UNKNOWN_COMPONENT",
            DiagnosticCode::InvalidVariant => "INVALID_VARIANT",
            DiagnosticCode::NotAContainer => "NOT_A_CONTAINER",
            DiagnosticCode::CycleDetected => "CYCLE_DETECTED",
            DiagnosticCode::DuplicateId => "DUPLICATE_ID",
            DiagnosticCode::MissingSubcomponents => "MISSING_SUBCOMPONENTS",
            DiagnosticCode::ValidationFailed => "VALIDATION_FAILED",
            DiagnosticCode::TargetNotFound => "TARGET_NOT_FOUND",
            DiagnosticCode::TargetFallback => "TARGET_FALLBACK",
            DiagnosticCode::NoPatternMatched => "NO_PATTERN_MATCHED",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured, non-fatal outcome of patch application or intent parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,

    /// Human-readable message
    pub message: String,

    pub code: DiagnosticCode,

    /// Symbolic tree path of the node involved, for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, code, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, code, message)
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, code, message)
    }

    fn new(level: DiagnosticLevel, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            code,
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
        };
        write!(f, "{}[{}]: {}", level, self.code, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " (at {})", path)?;
        }
        Ok(())
    }
}

/// True if any diagnostic is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
