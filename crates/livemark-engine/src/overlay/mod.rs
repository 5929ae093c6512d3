//! # Block overlay
//!
//! Handles, hover, block selection and block drags layered over the text
//! surface. [`BlockOverlay`] is a state machine: the host feeds it
//! [`OverlayEvent`]s plus an [`OverlayContext`] and carries out the
//! [`OverlayEffect`]s it returns (dispatch a transaction, start or stop the
//! auto-scroll timer, scroll, announce drags).
//!
//! - **`selection`**: `SelectedBlockSet`
//! - **`handles`**: per-block handles and their reconciliation
//! - **`drag_select`**: margin drag-selection session and auto-scroll speed
//! - **`edits`**: the transactions the overlay emits
//! - **`mover`**: `BlockMover`, the drop side of a block drag

pub mod controller;
pub mod drag_select;
pub mod edits;
pub mod handles;
pub mod mover;
pub mod options;
pub mod selection;

pub use controller::{
    BlockOverlay, DragStartNotice, OverlayContext, OverlayEffect, OverlayEvent, OverlayKey,
    OverlayOutcome, PointerTarget,
};
pub use drag_select::{AutoScrollHandle, DragSelectionSession};
pub use handles::{Handle, HandlePart, HandleReconcile};
pub use mover::BlockMover;
pub use options::OverlayOptions;
pub use selection::SelectedBlockSet;
