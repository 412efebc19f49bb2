//! Terminal adapter: a concrete grid view painted with crossterm.
//!
//! # Capabilities
//!
//! - **Displayed model**: on-screen sections/rows tracked apart from the
//!   data source, so mid-cycle probes see what is actually visible
//! - **Atomic presentation**: one buffered flush per frame, inside a
//!   synchronized-update bracket
//! - **Width fitting**: grapheme-safe truncation with East Asian widths
//! - **Scrolling**: clamped line offsets over the flattened grid

mod grid;
mod text;

pub use grid::{RowSource, TermGrid};
pub use text::{fit_width, string_width};
