//! Contract between the browsing core and the list display.
//!
//! The display reports [`BrowserEvent`]s; the core answers with one
//! [`ListFrame`] per open drill-down level.

/// Highlight movement inside the active list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

/// Everything the user can do while browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserEvent {
    /// Flip the selection of the highlighted node
    Toggle,
    /// Open the highlighted node's children as a new list
    DrillDown,
    /// Close the active list and return to its parent level
    BackOut,
    /// Terminal width changed
    Resize { width: u16 },
    Navigate(Motion),
    Quit,
}

/// Whether the interaction loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One rendered list level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFrame {
    /// Decorated rows, e.g. `1. [+] Fruit (3 items)`
    pub rows: Vec<String>,
    /// Highlighted row in `rows`
    pub highlighted: usize,
    /// True for the list receiving key events
    pub active: bool,
    /// Column width in cells
    pub width: u16,
}
