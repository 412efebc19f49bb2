//! The reconciliation engine.
//!
//! `GridController` sits between a store's change feed and a sectioned
//! grid view. It buffers one cycle of change events, decides whether the
//! cycle can be animated incrementally or must fall back to a full
//! reload, and applies the result to the view in one atomic step.
//!
//! # Cycle lifecycle
//!
//! - `will_change` opens the cycle and clears the reload flag
//! - `section_changed` / `item_changed` buffer events; item events are
//!   classified against the view's *displayed* counts, and an event the
//!   grid could not animate safely escalates the whole cycle to reload
//! - `did_change` resolves the cycle: full reload when escalated or the
//!   view has no presentation surface, one atomic batch otherwise
//!
//! The completion notifier fires exactly once per resolved cycle, after
//! the view settles. Events arriving outside a cycle are a feed defect:
//! they are logged and dropped, and the view is never touched.

use std::mem;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{FetchError, OutOfRange};
use crate::results::{ChangeObserver, ResultSet};
use crate::types::{ChangeKind, ItemChange, Position, SectionChange};
use crate::view::GridView;

// =============================================================================
// CycleState
// =============================================================================

/// Buffered state of the current change cycle.
///
/// `Closed` and `Open` with empty buffers are different states: an empty
/// open cycle resolves normally, while events or a close arriving on a
/// closed cycle are protocol violations.
enum CycleState {
    Closed,
    Open {
        sections: Vec<SectionChange>,
        items: Vec<ItemChange>,
        reload: bool,
    },
}

impl CycleState {
    fn open() -> Self {
        Self::Open {
            sections: Vec::new(),
            items: Vec::new(),
            reload: false,
        }
    }

    fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

// =============================================================================
// GridController
// =============================================================================

/// Bridges a [`ResultSet`]'s change feed to a [`GridView`].
///
/// Single-threaded by design: the store contract guarantees cycles never
/// overlap and arrive on the thread that owns the controller.
pub struct GridController<R, V> {
    results: R,
    view: V,
    cycle: CycleState,
    on_update: Option<Rc<dyn Fn()>>,
}

impl<R: ResultSet, V: GridView> GridController<R, V> {
    pub fn new(results: R, view: V) -> Self {
        Self {
            results,
            view,
            cycle: CycleState::Closed,
            on_update: None,
        }
    }

    /// Materialize the store's query result. Call once before the first
    /// change cycle, and again whenever the query itself changes.
    pub fn perform_fetch(&mut self) -> Result<(), FetchError> {
        self.results.fetch()
    }

    /// Register the callback fired after each resolved cycle, once the
    /// view's visual state has settled. Replaces any previous callback.
    pub fn on_update(&mut self, f: impl Fn() + 'static) {
        self.on_update = Some(Rc::new(f));
    }

    // =========================================================================
    // Result accessors
    // =========================================================================

    /// Total items across every section. 0 when there are no sections.
    pub fn total_count(&self) -> usize {
        self.results.total()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Items in one section, 0 when the section does not exist.
    pub fn item_count(&self, section: usize) -> usize {
        self.results.item_count(section)
    }

    /// The item at a position, or a typed error when either coordinate
    /// is out of range.
    pub fn item_at(&self, position: Position) -> Result<R::Item, OutOfRange> {
        self.results
            .item_at(position)
            .ok_or(OutOfRange::new(position))
    }

    /// The underlying result set, for reads beyond the counts surfaced
    /// here (titles, store-specific state). Mutation stays on the store
    /// side of the seam.
    pub fn results(&self) -> &R {
        &self.results
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Whether an item event forces the cycle to a full reload.
    ///
    /// Probes the view's displayed counts, not the store: an insert into
    /// a section showing nothing (or into a view showing no sections at
    /// all) and a delete of a section's last displayed item both leave
    /// the grid no rows to animate against. Updates and moves never
    /// escalate; a move out of a one-item section applies as a paired
    /// delete and insert inside a single atomic batch.
    fn escalates(&self, change: &ItemChange) -> bool {
        match change {
            ItemChange::Insert(pos) => {
                self.view.section_count() == 0 || self.view.item_count(pos.section) == 0
            }
            ItemChange::Delete(pos) => self.view.item_count(pos.section) == 1,
            ItemChange::Update(_) | ItemChange::Move { .. } => false,
        }
    }
}

// =============================================================================
// Change feed
// =============================================================================

impl<R: ResultSet, V: GridView> ChangeObserver for GridController<R, V> {
    fn will_change(&mut self) {
        if self.cycle.is_open() {
            warn!("change cycle opened while one was in flight; restarting buffers");
        }
        self.cycle = CycleState::open();
    }

    fn section_changed(&mut self, change: SectionChange) {
        match &mut self.cycle {
            CycleState::Open { sections, .. } => match change.kind {
                ChangeKind::Insert | ChangeKind::Delete => sections.push(change),
                // Not meaningful at section granularity; no grid edit.
                ChangeKind::Update | ChangeKind::Move => {}
            },
            CycleState::Closed => {
                warn!(
                    section = change.section,
                    kind = ?change.kind,
                    "section change outside a cycle; dropping"
                );
            }
        }
    }

    fn item_changed(&mut self, change: ItemChange) {
        if !self.cycle.is_open() {
            warn!(kind = ?change.kind(), "item change outside a cycle; dropping");
            return;
        }
        let escalate = self.escalates(&change);
        if let CycleState::Open { items, reload, .. } = &mut self.cycle {
            if escalate {
                *reload = true;
            } else {
                items.push(change);
            }
        }
    }

    fn did_change(&mut self) {
        let cycle = mem::replace(&mut self.cycle, CycleState::Closed);
        let CycleState::Open {
            sections,
            items,
            reload,
        } = cycle
        else {
            warn!("cycle closed without an open; ignoring");
            return;
        };

        let attached = self.view.is_attached();
        if reload || !attached {
            debug!(reload, attached, "resolving cycle with a full reload");
            self.view.reload();
            if let Some(notify) = &self.on_update {
                notify();
            }
            return;
        }

        debug!(
            sections = sections.len(),
            items = items.len(),
            "resolving cycle with an atomic batch"
        );
        let notify = self.on_update.clone();
        self.view.apply_batch(
            &sections,
            &items,
            Box::new(move || {
                if let Some(notify) = notify {
                    notify();
                }
            }),
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
