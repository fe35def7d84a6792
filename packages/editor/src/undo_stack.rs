//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Mutations never edit a tree in place, so each history entry keeps the
//!   tree from before and after it ran
//! - Undo restores the `before` snapshot and moves the entry to the redo stack
//! - Redo restores the `after` snapshot
//! - New mutations clear the redo stack
//! - Supports batched operations (group multiple mutations as one undo step)
//! - Misses change nothing and are not recorded
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut tree = PageTree::new();
//!
//! stack.apply(&Mutation::AddSection, &mut tree, &registry, &mut ids);
//! stack.undo(&mut tree);
//! stack.redo(&mut tree);
//! ```

use crate::{Mutation, MutationOutcome};
use pagecraft_model::{IdGenerator, PageTree};
use pagecraft_registry::Registry;

/// A group of mutations that should be undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// Tree before the first mutation
    pub before: PageTree,

    /// Tree after the last mutation
    pub after: PageTree,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl MutationBatch {
    /// Create a single-mutation batch
    pub fn single(mutation: Mutation, before: PageTree, after: PageTree) -> Self {
        Self {
            mutations: vec![mutation],
            before,
            after,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for page editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<OpenBatch>,
}

#[derive(Debug, Default)]
struct OpenBatch {
    batch: Option<MutationBatch>,
    description: Option<String>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation to `tree` and record it for undo
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        tree: &mut PageTree,
        registry: &Registry,
        ids: &mut IdGenerator,
    ) -> MutationOutcome {
        let outcome = mutation.apply(tree, registry, ids);
        if !outcome.changed() {
            return outcome;
        }

        let before = std::mem::replace(tree, outcome.tree.clone());
        self.record(mutation, before, outcome.tree.clone());
        outcome
    }

    /// Record an already-applied change
    pub fn record(&mut self, mutation: &Mutation, before: PageTree, after: PageTree) {
        if let Some(open) = &mut self.current_batch {
            match &mut open.batch {
                Some(batch) => {
                    batch.mutations.push(mutation.clone());
                    batch.after = after;
                }
                None => open.batch = Some(MutationBatch::single(mutation.clone(), before, after)),
            }
        } else {
            let batch = MutationBatch::single(mutation.clone(), before, after)
                .with_description(mutation.describe());
            self.push_batch(batch);
        }
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(OpenBatch::default());
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(OpenBatch {
            batch: Some(mut batch),
            description,
        }) = self.current_batch.take()
        {
            batch.description = description.or_else(|| batch.mutations.first().map(Mutation::describe));
            self.push_batch(batch);
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(open) = &mut self.current_batch {
            open.description = Some(description.into());
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent batch, restoring `tree` to its earlier snapshot
    pub fn undo(&mut self, tree: &mut PageTree) -> bool {
        match self.undo_stack.pop() {
            Some(batch) => {
                *tree = batch.before.clone();
                self.redo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone batch
    pub fn redo(&mut self, tree: &mut PageTree) -> bool {
        match self.redo_stack.pop() {
            Some(batch) => {
                *tree = batch.after.clone();
                self.undo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
