//! # Undo/Redo Stack
//!
//! Tracks applied patches and enables undo/redo.
//!
//! ## Design
//!
//! - Before a patch is applied, its inverse is computed against the current page
//! - Patches without an inverse (`removeNode`, `moveNode`, `wrapWith`,
//!   `setBinding`, `setDataSource`) record a snapshot of the page instead
//! - Undo replays the recorded actions in reverse order and moves the batch to redo
//! - Redo reapplies the original patches
//! - New patches clear the redo stack
//! - Batches group several patches into one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut page = canopy_document::load_page(path)?;
//!
//! let diagnostics = stack.apply(&Patch::set_copy("button-1", "Go"), &mut page, None);
//! stack.undo(&mut page, None)?;
//! stack.redo(&mut page, None)?;
//! ```

use crate::engine::apply;
use crate::errors::UndoError;
use crate::inverse::inverse;
use crate::patch::Patch;
use crate::registry::ComponentRegistry;
use canopy_document::{has_errors, Diagnostic, UiPage};
use tracing::debug;

/// How to revert one applied patch
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    Inverse(Patch),
    /// Whole page as it was before the patch
    Snapshot(Box<UiPage>),
}

/// A group of patches undone/redone together
#[derive(Debug, Clone)]
pub struct PatchBatch {
    /// Patches in application order
    pub patches: Vec<Patch>,

    /// Revert actions, most recent first
    pub undo: Vec<UndoAction>,

    pub description: Option<String>,
}

impl PatchBatch {
    fn empty() -> Self {
        Self {
            patches: Vec::new(),
            undo: Vec::new(),
            description: None,
        }
    }

    /// A batch holding one patch and its revert action
    pub fn single(patch: Patch, action: UndoAction) -> Self {
        Self {
            patches: vec![patch],
            undo: vec![action],
            description: None,
        }
    }

    /// Label shown by `undo_description`/`redo_description`
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for page editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied batches (most recent last)
    undo_stack: Vec<PatchBatch>,

    /// Undone batches (most recent last)
    redo_stack: Vec<PatchBatch>,

    /// 0 = unlimited
    max_levels: usize,

    current_batch: Option<PatchBatch>,
}

impl UndoStack {
    /// Create a stack keeping at most 100 undo levels
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create a stack with a depth limit (0 = unlimited)
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a patch to `page` and record how to revert it.
    ///
    /// Rejected patches leave `page` untouched and are not recorded.
    pub fn apply(
        &mut self,
        patch: &Patch,
        page: &mut UiPage,
        registry: Option<&dyn ComponentRegistry>,
    ) -> Vec<Diagnostic> {
        let action = match inverse(page, patch) {
            Some(inverse) => UndoAction::Inverse(inverse),
            None => UndoAction::Snapshot(Box::new(page.clone())),
        };

        let outcome = apply(page, patch, registry);
        if has_errors(&outcome.diagnostics) {
            return outcome.diagnostics;
        }
        *page = outcome.page;

        if let Some(batch) = &mut self.current_batch {
            batch.patches.push(patch.clone());
            batch.undo.insert(0, action);
        } else {
            self.push_batch(PatchBatch::single(patch.clone(), action));
        }

        outcome.diagnostics
    }

    /// Start a batch (undone/redone as one step)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(PatchBatch::empty());
    }

    /// Close the current batch. Empty batches are dropped.
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.patches.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Label the open batch, if any
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    fn push_batch(&mut self, batch: PatchBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Undo the most recent batch. `Ok(false)` when there is nothing to undo.
    pub fn undo(
        &mut self,
        page: &mut UiPage,
        registry: Option<&dyn ComponentRegistry>,
    ) -> Result<bool, UndoError> {
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };

        let working = match revert(page, &batch, registry) {
            Ok(working) => working,
            Err(error) => {
                self.undo_stack.push(batch);
                return Err(UndoError::UndoFailed(error));
            }
        };

        debug!(patches = batch.patches.len(), "Undo");
        *page = working;
        self.redo_stack.push(batch);
        Ok(true)
    }

    /// Redo the most recently undone batch. `Ok(false)` when there is nothing to redo.
    pub fn redo(
        &mut self,
        page: &mut UiPage,
        registry: Option<&dyn ComponentRegistry>,
    ) -> Result<bool, UndoError> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };

        let working = match replay(page, &batch, registry) {
            Ok(working) => working,
            Err(error) => {
                self.redo_stack.push(batch);
                return Err(UndoError::RedoFailed(error));
            }
        };

        debug!(patches = batch.patches.len(), "Redo");
        *page = working;
        self.undo_stack.push(batch);
        Ok(true)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of batches that can be undone
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of batches that can be redone
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, including an open batch
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Description of the batch `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Description of the batch `redo` would replay
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Applied patches, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Patch> {
        self.undo_stack.iter().flat_map(|batch| batch.patches.iter())
    }
}

fn revert(
    page: &UiPage,
    batch: &PatchBatch,
    registry: Option<&dyn ComponentRegistry>,
) -> Result<UiPage, Diagnostic> {
    let mut working = page.clone();
    for action in &batch.undo {
        working = match action {
            UndoAction::Snapshot(snapshot) => (**snapshot).clone(),
            UndoAction::Inverse(patch) => step(&working, patch, registry)?,
        };
    }
    Ok(working)
}

fn replay(
    page: &UiPage,
    batch: &PatchBatch,
    registry: Option<&dyn ComponentRegistry>,
) -> Result<UiPage, Diagnostic> {
    let mut working = page.clone();
    for patch in &batch.patches {
        working = step(&working, patch, registry)?;
    }
    Ok(working)
}

fn step(
    page: &UiPage,
    patch: &Patch,
    registry: Option<&dyn ComponentRegistry>,
) -> Result<UiPage, Diagnostic> {
    let outcome = apply(page, patch, registry);
    match outcome.diagnostics.into_iter().find(Diagnostic::is_error) {
        Some(error) => Err(error),
        None => Ok(outcome.page),
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
