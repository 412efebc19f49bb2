//! Presentation seam: what a sectioned grid surface must expose for the
//! controller to keep it in sync with the store.

use crate::types::{ItemChange, SectionChange};

/// Callback a view invokes exactly once, after a submitted batch has
/// been applied and presented.
pub type BatchDone = Box<dyn FnOnce()>;

/// A scrollable, sectioned grid of cells.
///
/// Counts report what is on screen right now, not what the store holds.
/// Mid-cycle the two diverge, and the controller classifies incoming
/// events against the displayed state, so the distinction is load
/// bearing.
pub trait GridView {
    /// Number of sections currently displayed.
    fn section_count(&self) -> usize;

    /// Number of items displayed in one section. Must return 0 for a
    /// section that does not exist; the controller probes sections that
    /// may not have been created yet.
    fn item_count(&self, section: usize) -> usize;

    /// Whether the view has a live presentation surface. A detached
    /// view still tracks state but cannot animate incremental edits.
    fn is_attached(&self) -> bool;

    /// Discard displayed state and rebuild it from the data source
    /// wholesale.
    fn reload(&mut self);

    /// Apply one change batch atomically: every section edit first, in
    /// the order given, then every item edit in the order given, then
    /// present, then invoke `done` exactly once. Presentation may be
    /// deferred; `done` moves with it.
    ///
    /// Edits arrive pre-validated against displayed state. An index
    /// that no longer fits is a feed defect; implementations should
    /// warn and fall back to a full reload rather than panic, and
    /// `done` still fires.
    fn apply_batch(&mut self, sections: &[SectionChange], items: &[ItemChange], done: BatchDone);
}
