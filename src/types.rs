//! Core types for gridsync.
//!
//! The change vocabulary that flows from the store's notification feed
//! into the controller and out to the grid view as batch edits.

use std::fmt;

// =============================================================================
// ChangeKind
// =============================================================================

/// The four kinds of change a store can report for a section or item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Delete,
    Update,
    Move,
}

// =============================================================================
// Position
// =============================================================================

/// A cell address in the sectioned grid: section index plus item offset
/// within that section. Both are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub section: usize,
    pub item: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section, self.item)
    }
}

// =============================================================================
// SectionChange
// =============================================================================

/// A structural change to one whole section.
///
/// Stores only ever report sections inserted or deleted; `Update` and
/// `Move` are not meaningful at section granularity and are dropped
/// before they reach a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionChange {
    pub kind: ChangeKind,
    /// Index the change applies at, valid at application time.
    pub section: usize,
}

impl SectionChange {
    pub const fn insert(section: usize) -> Self {
        Self {
            kind: ChangeKind::Insert,
            section,
        }
    }

    pub const fn delete(section: usize) -> Self {
        Self {
            kind: ChangeKind::Delete,
            section,
        }
    }
}

// =============================================================================
// ItemChange
// =============================================================================

/// A change to a single item, carrying exactly the positions its kind
/// needs: one for insert/delete/update, an origin and a destination for
/// move. Positions are valid at the moment the edit is applied, not at
/// the moment the event was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemChange {
    Insert(Position),
    Delete(Position),
    Update(Position),
    Move { from: Position, to: Position },
}

impl ItemChange {
    /// The kind of this change.
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert(_) => ChangeKind::Insert,
            Self::Delete(_) => ChangeKind::Delete,
            Self::Update(_) => ChangeKind::Update,
            Self::Move { .. } => ChangeKind::Move,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
