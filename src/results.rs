//! Store-side seams: the result window the controller reads through and
//! the change-notification protocol it listens on, plus an in-memory
//! result set for wiring tests and demos.
//!
//! The protocol is deliberately thin. A store materializes a sectioned
//! query result, then reports mutations one cycle at a time:
//!
//! - `will_change` opens the cycle
//! - `section_changed` / `item_changed` describe it, pre-computed
//! - `did_change` closes it
//!
//! Cycles never overlap and stay on one thread. The controller trusts
//! the events; it computes no diffs of its own.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::FetchError;
use crate::types::{ItemChange, Position, SectionChange};

// =============================================================================
// ResultSet
// =============================================================================

/// Read-only window onto a store's materialized, sectioned query result.
///
/// Counts reflect the data as of the last completed change cycle.
/// Lookups hand out owned items (implementations clone or return cheap
/// handles), so callers never hold borrows across store mutations.
pub trait ResultSet {
    type Item;

    /// Materialize or refresh the query result.
    fn fetch(&mut self) -> Result<(), FetchError>;

    /// Number of sections currently materialized.
    fn section_count(&self) -> usize;

    /// Number of items in one section. Returns 0 when the section does
    /// not exist rather than panicking.
    fn item_count(&self, section: usize) -> usize;

    /// The item at a position, or `None` when either coordinate is out
    /// of range.
    fn item_at(&self, position: Position) -> Option<Self::Item>;

    /// Total items across all sections. 0 when there are no sections.
    fn total(&self) -> usize {
        (0..self.section_count()).map(|s| self.item_count(s)).sum()
    }
}

// =============================================================================
// ChangeObserver
// =============================================================================

/// The notification interface a store drives, one cycle per store save.
///
/// Implementations must tolerate a malformed feed (events outside a
/// cycle, a close without an open) without corrupting any state they
/// manage. Dropping the bad event is correct; panicking is not.
pub trait ChangeObserver {
    /// A change cycle is about to begin.
    fn will_change(&mut self);

    /// One section-level change inside the current cycle.
    fn section_changed(&mut self, change: SectionChange);

    /// One item-level change inside the current cycle.
    fn item_changed(&mut self, change: ItemChange);

    /// The current cycle is complete; all of its events were reported.
    fn did_change(&mut self);
}

// =============================================================================
// MemoryResults
// =============================================================================

struct Section<T> {
    title: String,
    items: Vec<T>,
}

struct Inner<T> {
    sections: Vec<Section<T>>,
}

/// In-memory sectioned result set with shared-handle semantics.
///
/// Cloning gives another handle to the same rows, so the store side can
/// mutate through one clone while a controller reads through another.
/// Mutators touch data only. Reporting the matching change events to an
/// observer stays the caller's job, which keeps event streams and data
/// free to disagree in tests.
pub struct MemoryResults<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for MemoryResults<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for MemoryResults<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryResults<T> {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                sections: Vec::new(),
            })),
        }
    }

    /// Append a section with its rows. The usual way to seed state.
    pub fn push_section(&self, title: impl Into<String>, items: Vec<T>) {
        self.inner.borrow_mut().sections.push(Section {
            title: title.into(),
            items,
        });
    }

    /// Insert an empty section. An index past the end appends.
    pub fn insert_section(&self, index: usize, title: impl Into<String>) {
        let mut inner = self.inner.borrow_mut();
        let index = index.min(inner.sections.len());
        inner.sections.insert(
            index,
            Section {
                title: title.into(),
                items: Vec::new(),
            },
        );
    }

    /// Remove a whole section. Returns false when it does not exist.
    pub fn remove_section(&self, index: usize) -> bool {
        let mut inner = self.inner.borrow_mut();
        if index < inner.sections.len() {
            inner.sections.remove(index);
            true
        } else {
            false
        }
    }

    /// Insert an item. The offset is clamped to the section's length;
    /// returns false when the section does not exist.
    pub fn insert_item(&self, position: Position, item: T) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.sections.get_mut(position.section) {
            Some(section) => {
                let at = position.item.min(section.items.len());
                section.items.insert(at, item);
                true
            }
            None => false,
        }
    }

    /// Remove and return the item at a position.
    pub fn remove_item(&self, position: Position) -> Option<T> {
        let mut inner = self.inner.borrow_mut();
        let section = inner.sections.get_mut(position.section)?;
        if position.item < section.items.len() {
            Some(section.items.remove(position.item))
        } else {
            None
        }
    }

    /// Replace the item at a position. Returns false on a miss.
    pub fn replace_item(&self, position: Position, item: T) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner
            .sections
            .get_mut(position.section)
            .and_then(|s| s.items.get_mut(position.item))
        {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Move an item. The destination offset is interpreted after the
    /// removal, within a clamped destination section. Returns false
    /// when the origin does not exist.
    pub fn move_item(&self, from: Position, to: Position) -> bool {
        let Some(item) = self.remove_item(from) else {
            return false;
        };
        let mut inner = self.inner.borrow_mut();
        match inner.sections.get_mut(to.section) {
            Some(section) => {
                let at = to.item.min(section.items.len());
                section.items.insert(at, item);
                true
            }
            None => {
                // Origin already removed; put it back rather than drop it.
                if let Some(section) = inner.sections.get_mut(from.section) {
                    let at = from.item.min(section.items.len());
                    section.items.insert(at, item);
                }
                false
            }
        }
    }

    /// Title of a section, cloned out of the shared state.
    pub fn section_title(&self, index: usize) -> Option<String> {
        self.inner
            .borrow()
            .sections
            .get(index)
            .map(|s| s.title.clone())
    }
}

impl<T: Clone> ResultSet for MemoryResults<T> {
    type Item = T;

    /// Data is live in memory; there is nothing to materialize.
    fn fetch(&mut self) -> Result<(), FetchError> {
        Ok(())
    }

    fn section_count(&self) -> usize {
        self.inner.borrow().sections.len()
    }

    fn item_count(&self, section: usize) -> usize {
        self.inner
            .borrow()
            .sections
            .get(section)
            .map_or(0, |s| s.items.len())
    }

    fn item_at(&self, position: Position) -> Option<T> {
        self.inner
            .borrow()
            .sections
            .get(position.section)?
            .items
            .get(position.item)
            .cloned()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryResults<&'static str> {
        let results = MemoryResults::new();
        results.push_section("Inbox", vec!["a", "b", "c"]);
        results.push_section("Archive", vec!["x"]);
        results
    }

    #[test]
    fn test_counts_and_total() {
        let results = seeded();
        assert_eq!(results.section_count(), 2);
        assert_eq!(results.item_count(0), 3);
        assert_eq!(results.item_count(1), 1);
        assert_eq!(results.total(), 4);
    }

    #[test]
    fn test_empty_results() {
        let results: MemoryResults<u32> = MemoryResults::new();
        assert_eq!(results.section_count(), 0);
        assert_eq!(results.total(), 0);
    }

    #[test]
    fn test_item_count_out_of_range_is_zero() {
        let results = seeded();
        assert_eq!(results.item_count(2), 0);
        assert_eq!(results.item_count(usize::MAX), 0);
    }

    #[test]
    fn test_item_at() {
        let results = seeded();
        assert_eq!(results.item_at(Position::new(0, 1)), Some("b"));
        assert_eq!(results.item_at(Position::new(1, 0)), Some("x"));
        assert_eq!(results.item_at(Position::new(0, 3)), None);
        assert_eq!(results.item_at(Position::new(2, 0)), None);
    }

    #[test]
    fn test_shared_handle_sees_mutations() {
        let results = seeded();
        let reader = results.clone();
        results.insert_item(Position::new(1, 0), "y");
        assert_eq!(reader.item_count(1), 2);
        assert_eq!(reader.item_at(Position::new(1, 0)), Some("y"));
    }

    #[test]
    fn test_insert_section_clamps_index() {
        let results = seeded();
        results.insert_section(99, "Trash");
        assert_eq!(results.section_count(), 3);
        assert_eq!(results.section_title(2).as_deref(), Some("Trash"));
        assert_eq!(results.item_count(2), 0);
    }

    #[test]
    fn test_remove_section() {
        let results = seeded();
        assert!(results.remove_section(0));
        assert_eq!(results.section_count(), 1);
        assert_eq!(results.section_title(0).as_deref(), Some("Archive"));
        assert!(!results.remove_section(5));
    }

    #[test]
    fn test_insert_item_missing_section() {
        let results = seeded();
        assert!(!results.insert_item(Position::new(7, 0), "z"));
        assert_eq!(results.total(), 4);
    }

    #[test]
    fn test_remove_and_replace_item() {
        let results = seeded();
        assert_eq!(results.remove_item(Position::new(0, 0)), Some("a"));
        assert_eq!(results.item_count(0), 2);
        assert!(results.replace_item(Position::new(0, 0), "B"));
        assert_eq!(results.item_at(Position::new(0, 0)), Some("B"));
        assert!(!results.replace_item(Position::new(0, 9), "?"));
    }

    #[test]
    fn test_move_item_across_sections() {
        let results = seeded();
        assert!(results.move_item(Position::new(0, 2), Position::new(1, 0)));
        assert_eq!(results.item_count(0), 2);
        assert_eq!(results.item_count(1), 2);
        assert_eq!(results.item_at(Position::new(1, 0)), Some("c"));
    }

    #[test]
    fn test_move_item_missing_destination_restores_origin() {
        let results = seeded();
        assert!(!results.move_item(Position::new(0, 0), Position::new(9, 0)));
        assert_eq!(results.item_count(0), 3);
        assert_eq!(results.item_at(Position::new(0, 0)), Some("a"));
    }

    #[test]
    fn test_fetch_is_immediate() {
        let mut results = seeded();
        assert!(results.fetch().is_ok());
    }
}
