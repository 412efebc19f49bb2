//! Terminal-backed grid view.
//!
//! `TermGrid` renders a sectioned grid as plain lines: one title line
//! per section, rows indented beneath it, scrolled through a fixed
//! viewport. It owns a *displayed* model separate from its data source,
//! because the controller classifies incoming events against what is on
//! screen, which mid-cycle is not what the source holds.
//!
//! Painting accumulates into an internal buffer and flushes to the sink
//! in one write, bracketed by synchronized-update escapes so a batch
//! lands on screen atomically.

use std::fmt;
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{
    size, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate,
};
use tracing::warn;

use super::text::fit_width;
use crate::results::{MemoryResults, ResultSet};
use crate::types::{ChangeKind, ItemChange, Position, SectionChange};
use crate::view::{BatchDone, GridView};

// =============================================================================
// RowSource
// =============================================================================

/// Pull-based data source for a terminal grid: titles and rendered row
/// text, addressed the same way the change feed addresses items.
///
/// Lookups return `None` out of range. The grid treats a miss during an
/// edit as proof that events and data disagree, and rebuilds.
pub trait RowSource {
    fn section_count(&self) -> usize;

    fn row_count(&self, section: usize) -> usize;

    fn section_title(&self, section: usize) -> Option<String>;

    fn row(&self, position: Position) -> Option<String>;
}

impl<T: Clone + fmt::Display> RowSource for MemoryResults<T> {
    fn section_count(&self) -> usize {
        ResultSet::section_count(self)
    }

    fn row_count(&self, section: usize) -> usize {
        self.item_count(section)
    }

    fn section_title(&self, section: usize) -> Option<String> {
        MemoryResults::section_title(self, section)
    }

    fn row(&self, position: Position) -> Option<String> {
        self.item_at(position).map(|item| item.to_string())
    }
}

// =============================================================================
// TermGrid
// =============================================================================

struct DisplaySection {
    title: String,
    rows: Vec<String>,
}

/// A sectioned grid painted onto a terminal-like sink.
///
/// Generic over the sink so tests can capture output; production code
/// hands it locked stdout.
pub struct TermGrid<S, W> {
    source: S,
    out: W,
    buf: Vec<u8>,
    displayed: Vec<DisplaySection>,
    scroll: usize,
    width: u16,
    height: u16,
    attached: bool,
}

impl<S: RowSource, W: Write> TermGrid<S, W> {
    /// Create a detached grid over `source`, painting at most `width`
    /// cells per line and `height` lines per frame.
    pub fn new(source: S, out: W, width: u16, height: u16) -> Self {
        Self {
            source,
            out,
            buf: Vec::with_capacity(4096),
            displayed: Vec::new(),
            scroll: 0,
            width,
            height,
            attached: false,
        }
    }

    /// Attach to the presentation surface: rebuild the displayed model
    /// from the source and paint the first frame.
    pub fn attach(&mut self) -> io::Result<()> {
        self.attached = true;
        self.rebuild();
        self.paint()
    }

    /// Detach from the surface. The grid keeps tracking state but stops
    /// painting until re-attached.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Adopt the real terminal's dimensions, when they can be queried.
    pub fn autosize(&mut self) {
        if let Ok((width, height)) = size() {
            self.width = width;
            self.height = height;
        }
    }

    /// First visible line of the flattened grid.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Scroll so `line` is the first visible line, clamped to content.
    pub fn scroll_to(&mut self, line: usize) {
        let max = self.line_count().saturating_sub(self.height as usize);
        self.scroll = line.min(max);
        self.repaint();
    }

    /// Scroll by a signed number of lines, clamped to content.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as usize)
        };
        self.scroll_to(target);
    }

    fn line_count(&self) -> usize {
        self.displayed.iter().map(|s| 1 + s.rows.len()).sum()
    }

    fn rebuild(&mut self) {
        self.displayed = (0..self.source.section_count())
            .map(|s| DisplaySection {
                title: self.source.section_title(s).unwrap_or_default(),
                rows: (0..self.source.row_count(s))
                    .map(|i| self.source.row(Position::new(s, i)).unwrap_or_default())
                    .collect(),
            })
            .collect();
    }

    /// Apply one batch to the displayed model, section edits first, each
    /// stream in its recorded order. Returns false as soon as an edit no
    /// longer fits the displayed state or a source pull misses.
    fn apply_edits(&mut self, sections: &[SectionChange], items: &[ItemChange]) -> bool {
        for change in sections {
            match change.kind {
                ChangeKind::Insert => {
                    if change.section > self.displayed.len() {
                        return false;
                    }
                    let Some(title) = self.source.section_title(change.section) else {
                        return false;
                    };
                    self.displayed.insert(
                        change.section,
                        DisplaySection {
                            title,
                            rows: Vec::new(),
                        },
                    );
                }
                ChangeKind::Delete => {
                    if change.section >= self.displayed.len() {
                        return false;
                    }
                    self.displayed.remove(change.section);
                }
                ChangeKind::Update | ChangeKind::Move => return false,
            }
        }

        for change in items {
            match change {
                ItemChange::Insert(pos) => {
                    let Some(row) = self.source.row(*pos) else {
                        return false;
                    };
                    let Some(section) = self.displayed.get_mut(pos.section) else {
                        return false;
                    };
                    if pos.item > section.rows.len() {
                        return false;
                    }
                    section.rows.insert(pos.item, row);
                }
                ItemChange::Delete(pos) => {
                    let Some(section) = self.displayed.get_mut(pos.section) else {
                        return false;
                    };
                    if pos.item >= section.rows.len() {
                        return false;
                    }
                    section.rows.remove(pos.item);
                }
                ItemChange::Update(pos) => {
                    let Some(row) = self.source.row(*pos) else {
                        return false;
                    };
                    let Some(slot) = self
                        .displayed
                        .get_mut(pos.section)
                        .and_then(|s| s.rows.get_mut(pos.item))
                    else {
                        return false;
                    };
                    *slot = row;
                }
                ItemChange::Move { from, to } => {
                    let Some(section) = self.displayed.get_mut(from.section) else {
                        return false;
                    };
                    if from.item >= section.rows.len() {
                        return false;
                    }
                    section.rows.remove(from.item);
                    // Destination offset is interpreted after the removal.
                    let Some(row) = self.source.row(*to) else {
                        return false;
                    };
                    let Some(dest) = self.displayed.get_mut(to.section) else {
                        return false;
                    };
                    if to.item > dest.rows.len() {
                        return false;
                    }
                    dest.rows.insert(to.item, row);
                }
            }
        }

        true
    }

    fn flat_lines(&self) -> Vec<String> {
        let width = self.width as usize;
        let mut lines = Vec::with_capacity(self.line_count());
        for section in &self.displayed {
            lines.push(fit_width(&section.title, width));
            for row in &section.rows {
                lines.push(fit_width(&format!("  {row}"), width));
            }
        }
        lines
    }

    fn paint(&mut self) -> io::Result<()> {
        let lines = self.flat_lines();
        let max_scroll = lines.len().saturating_sub(self.height as usize);
        self.scroll = self.scroll.min(max_scroll);
        let end = (self.scroll + self.height as usize).min(lines.len());
        let visible = &lines[self.scroll..end];

        self.buf.clear();
        queue!(self.buf, BeginSynchronizedUpdate)?;
        for (y, line) in visible.iter().enumerate() {
            queue!(
                self.buf,
                MoveTo(0, y as u16),
                Clear(ClearType::UntilNewLine),
                Print(line)
            )?;
        }
        queue!(
            self.buf,
            MoveTo(0, visible.len() as u16),
            Clear(ClearType::FromCursorDown),
            EndSynchronizedUpdate
        )?;
        self.out.write_all(&self.buf)?;
        self.out.flush()
    }

    fn repaint(&mut self) {
        if !self.attached {
            return;
        }
        if let Err(err) = self.paint() {
            warn!(%err, "grid paint failed");
        }
    }
}

impl<S: RowSource, W: Write> GridView for TermGrid<S, W> {
    fn section_count(&self) -> usize {
        self.displayed.len()
    }

    fn item_count(&self, section: usize) -> usize {
        self.displayed.get(section).map_or(0, |s| s.rows.len())
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn reload(&mut self) {
        self.rebuild();
        self.repaint();
    }

    fn apply_batch(&mut self, sections: &[SectionChange], items: &[ItemChange], done: BatchDone) {
        if !self.apply_edits(sections, items) {
            warn!("batch edit no longer fits the displayed grid; reloading");
            self.rebuild();
        }
        self.repaint();
        done();
    }
}

// =============================================================================
// Tests
// =============================================================================
