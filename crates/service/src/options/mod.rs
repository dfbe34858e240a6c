//! Owned collections of a service: checklist items and subtasks.
//!
//! Every operation first resolves the parent service (or the item joined with
//! its service) under the caller's tenant, so foreign ids read as `NotFound`.

pub mod checklist;
pub mod subtask;

pub use checklist::{ChecklistPatch, NewChecklistItem};
pub use subtask::{NewSubtask, SubtaskPatch};
