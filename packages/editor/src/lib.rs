//! # Canopy Editor
//!
//! Patch application engine for canopy pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: UiPage tree + addressing          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: patches                             │
//! │  - Decode untyped { targetId, op, args }    │
//! │  - Apply patches to a copy of the page      │
//! │  - Derive inverse patches                   │
//! │  - Undo/redo with snapshot fallback         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: history of proposed/applied edits  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Inputs are never mutated**: `apply` returns a new page
//! 2. **Failures are data**: every rejected patch becomes one error diagnostic
//! 3. **Registry is optional**: without one, validation only warns
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canopy_editor::{apply, inverse, Patch};
//!
//! let patch = Patch::set_prop("button-1", "variant", "outline");
//! let undo = inverse(&page, &patch);
//! let outcome = apply(&page, &patch, None);
//! assert!(outcome.is_applied());
//! ```

mod engine;
mod errors;
mod inverse;
mod patch;
mod registry;
mod undo_stack;

pub use engine::{apply, apply_all, apply_envelope, PatchOutcome};
pub use errors::{PatchDecodeError, PatchError, RegistryError, UndoError};
pub use inverse::inverse;
pub use patch::{
    Direction, Patch, PatchEnvelope, PatchOp, Position, LAYOUT_PREFIX, OPERATION_NAMES,
    PROPS_PREFIX,
};
pub use registry::{
    allowed_variants, ComponentDefinition, ComponentRegistry, PropDefinition, Registry,
    DEFAULT_VARIANTS,
};
pub use undo_stack::{PatchBatch, UndoAction, UndoStack};

// Re-export the document model for convenience
pub use canopy_document::{Diagnostic, DiagnosticCode, DiagnosticLevel, UiNode, UiPage};
