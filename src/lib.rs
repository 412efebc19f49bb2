//! # gridsync
//!
//! Change-feed to sectioned-grid reconciliation for terminal UIs.
//!
//! A persistent store reports what changed, one cycle at a time; a grid
//! view shows rows grouped into sections. [`GridController`] sits
//! between the two: it buffers each cycle of change events, decides
//! whether the cycle can be animated as one atomic batch of edits or
//! must fall back to a full reload, applies the result, and notifies
//! the app exactly once when the screen has settled.
//!
//! ## Architecture
//!
//! ```text
//! store feed → ChangeObserver → GridController → GridView → terminal
//!                (buffering)   (classify, batch)   (apply)
//! ```
//!
//! Everything is single-threaded and callback-driven: the store drives
//! the observer, the controller drives the view, the view calls back
//! when its batch has been presented.
//!
//! ## Modules
//!
//! - [`types`] - Change vocabulary (kinds, positions, section/item edits)
//! - [`results`] - Store-side seams and an in-memory result set
//! - [`view`] - The grid view contract
//! - [`controller`] - The reconciliation engine
//! - [`term`] - Terminal-backed grid adapter (crossterm)
//! - [`error`] - Typed failures

pub mod controller;
pub mod error;
pub mod results;
pub mod term;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use controller::GridController;
pub use error::{FetchError, OutOfRange};
pub use results::{ChangeObserver, MemoryResults, ResultSet};
pub use term::{fit_width, string_width, RowSource, TermGrid};
pub use view::{BatchDone, GridView};
