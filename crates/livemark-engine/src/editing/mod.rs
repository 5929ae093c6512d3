/*!
 * # Editing
 *
 * The text surface the live-preview layers sit on.
 *
 * - **`document`**: `Document`, a single `xi_rope::Rope` buffer plus a line
 *   index and the selection. Saving writes the rope bytes verbatim.
 * - **`transaction`**: `Transaction` / `Change`, an atomic batch of
 *   replacements expressed against the pre-edit document.
 * - **`patch`**: what a dispatch changed, and a position mapper built from the
 *   underlying delta so callers can carry offsets across the edit.
 * - **`commands`**: `Cmd`, the keyboard-level edits the hosts issue, compiled
 *   into transactions.
 *
 * ```rust
 * use livemark_engine::editing::{Change, Document, Transaction};
 *
 * let mut doc = Document::new("# Hello");
 * let patch = doc
 *     .dispatch(Transaction::single(Change::insert(7, "\n")).with_caret(8))
 *     .unwrap();
 * assert!(patch.doc_changed);
 * assert_eq!(doc.text(), "# Hello\n");
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;
pub mod transaction;

pub use commands::{Cmd, compile_command};
pub use document::Document;
pub use patch::Patch;
pub use transaction::{Change, EditError, Transaction};
