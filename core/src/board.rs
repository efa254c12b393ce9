use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::*;

/// Per-cell lock held for the duration of one selection handler.
///
/// Handles are cheap to clone and share the same flag, so a caller can keep the lock
/// while mutating the board that owns the cell.
#[derive(Clone, Debug, Default)]
pub struct InputLock(Arc<AtomicBool>);

impl InputLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock, or returns `None` while another handler still holds it.
    pub fn try_acquire(&self) -> Option<InputGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| InputGuard(&*self.0))
    }

    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases its [`InputLock`] when dropped.
#[derive(Debug)]
pub struct InputGuard<'a>(&'a AtomicBool);

impl Drop for InputGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone, Debug, Default)]
pub enum Interactivity {
    #[default]
    Inert,
    Interactive(InputLock),
}

/// One selectable tile.
#[derive(Clone, Debug)]
pub struct Cell {
    index: CellIndex,
    highlighted: bool,
    interactivity: Interactivity,
    attached: bool,
}

impl Cell {
    /// A cell that ignores input, used while the sequence is shown.
    pub fn inert(index: CellIndex) -> Self {
        Self::new(index, Interactivity::Inert)
    }

    /// A cell that accepts selections, guarded by its own input lock.
    pub fn interactive(index: CellIndex) -> Self {
        Self::new(index, Interactivity::Interactive(InputLock::new()))
    }

    fn new(index: CellIndex, interactivity: Interactivity) -> Self {
        Self {
            index,
            highlighted: false,
            interactivity,
            attached: true,
        }
    }

    pub fn index(&self) -> CellIndex {
        self.index
    }

    pub fn toggle_content(&mut self, on: bool) {
        self.highlighted = on;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.interactivity, Interactivity::Interactive(_))
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn input_lock(&self) -> Option<&InputLock> {
        match &self.interactivity {
            Interactivity::Interactive(lock) => Some(lock),
            Interactivity::Inert => None,
        }
    }

    pub fn dispose(&mut self) {
        if !self.attached {
            return;
        }
        self.interactivity = Interactivity::Inert;
        self.attached = false;
    }
}

/// Surface the cells are mounted on.
///
/// The board only holds the cells it is given; creating and replacing them is up to the
/// round controller.
#[derive(Clone, Debug, Default)]
pub struct Board {
    cells: Vec<Cell>,
    visible: bool,
    disposed: bool,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn append(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Detaches all cells from the board and hands them back.
    pub fn take_cells(&mut self) -> Vec<Cell> {
        core::mem::take(&mut self.cells)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: CellIndex) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.index() == index)
    }

    pub fn cell_mut(&mut self, index: CellIndex) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|cell| cell.index() == index)
    }

    pub fn has_interactive_cells(&self) -> bool {
        self.cells.iter().any(Cell::is_interactive)
    }

    pub fn dispose(&mut self) {
        for mut cell in self.take_cells() {
            cell.dispose();
        }
        self.visible = false;
        self.disposed = true;
    }
}
