//! # Slash menu
//!
//! Typing `/` at the start of a line (or after a space) opens a filtered list
//! of block types; committing one rewrites the line into that block.
//!
//! - **`catalog`**: the fixed command list and its case-insensitive filter
//! - **`menu`**: `SlashMenu`, the per-editor state machine

pub mod catalog;
pub mod menu;

pub use catalog::{SlashCommand, Transform, catalog, filter};
pub use menu::{KeyOutcome, SlashEffect, SlashKey, SlashMenu, SlashMenuOptions, SlashMenuState};
