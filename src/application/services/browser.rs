//! Drill-down browsing session
//!
//! Keeps the stack of open list levels and the selection, and turns
//! [`BrowserEvent`]s into state changes. Rendering is left to a
//! [`ListDisplay`].

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    BrowserEvent, DomainResult, Flow, ListFrame, Motion, SelectionEngine, TaxonomyTree, TreeNode,
};
use crate::infrastructure::traits::ListDisplay;

/// Narrowest column a list is squeezed to when the terminal is small.
const MIN_LIST_WIDTH: u16 = 12;

/// Layout options for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserOptions {
    pub list_width: u16,
    /// Rows per page, used for PageUp/PageDown
    pub list_height: u16,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            list_width: 30,
            list_height: 14,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenLevel {
    parent: Index,
    highlighted: usize,
}

/// One browsing session over a shared tree.
pub struct Browser<'t> {
    tree: &'t TaxonomyTree,
    selection: SelectionEngine,
    levels: Vec<OpenLevel>,
    options: BrowserOptions,
    terminal_width: Option<u16>,
}

impl<'t> Browser<'t> {
    pub fn new(tree: &'t TaxonomyTree, options: BrowserOptions) -> Self {
        Self::with_selection(tree, SelectionEngine::new(tree), options)
    }

    /// Resume with an existing selection.
    pub fn with_selection(
        tree: &'t TaxonomyTree,
        selection: SelectionEngine,
        options: BrowserOptions,
    ) -> Self {
        Self {
            tree,
            selection,
            levels: vec![OpenLevel {
                parent: tree.root(),
                highlighted: 0,
            }],
            options,
            terminal_width: None,
        }
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn into_selection(self) -> SelectionEngine {
        self.selection
    }

    /// Number of open list levels, at least 1.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Node under the highlight of the active list.
    pub fn highlighted(&self) -> Option<&'t TreeNode> {
        self.highlighted_index()
            .and_then(|idx| self.tree.get_node(idx))
    }

    /// Apply one event. The only dispatcher for user interaction.
    #[instrument(level = "debug", skip(self))]
    pub fn handle(&mut self, event: BrowserEvent) -> DomainResult<Flow> {
        match event {
            BrowserEvent::Toggle => {
                if let Some(node) = self.highlighted() {
                    let state = self.selection.apply_toggle(self.tree, node.id())?;
                    debug!(id = %node.id(), ?state, "toggled");
                }
            }
            BrowserEvent::DrillDown => {
                if let Some(idx) = self.highlighted_index() {
                    let has_children = self
                        .tree
                        .get_node(idx)
                        .map(|node| !node.is_leaf())
                        .unwrap_or(false);
                    if has_children {
                        self.levels.push(OpenLevel {
                            parent: idx,
                            highlighted: 0,
                        });
                    }
                }
            }
            BrowserEvent::BackOut => {
                if self.levels.len() > 1 {
                    self.levels.pop();
                }
            }
            BrowserEvent::Resize { width } => {
                self.terminal_width = Some(width);
            }
            BrowserEvent::Navigate(motion) => self.navigate(motion),
            BrowserEvent::Quit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Render state of every open level, outermost first.
    pub fn frames(&self) -> Vec<ListFrame> {
        let width = self.column_width();
        let active = self.levels.len() - 1;
        self.levels
            .iter()
            .enumerate()
            .map(|(level, open)| ListFrame {
                rows: self
                    .tree
                    .children(open.parent)
                    .enumerate()
                    .map(|(i, (_, node))| format!("{}. {}", i + 1, self.selection.decorate(node)))
                    .collect(),
                highlighted: open.highlighted,
                active: level == active,
                width,
            })
            .collect()
    }

    /// Draw, read, dispatch until the user quits or the display runs dry.
    pub fn run<D: ListDisplay + ?Sized>(&mut self, display: &mut D) -> ApplicationResult<()> {
        loop {
            display
                .draw(&self.frames())
                .map_err(|e| display_err("draw", e))?;
            let event = match display.next_event().map_err(|e| display_err("read event", e))? {
                Some(event) => event,
                None => return Ok(()),
            };
            if self.handle(event)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn navigate(&mut self, motion: Motion) {
        let len = self.active_len();
        let page = usize::from(self.options.list_height.max(1));
        let Some(level) = self.levels.last_mut() else {
            return;
        };
        if len == 0 {
            level.highlighted = 0;
            return;
        }
        let last = len - 1;
        let current = level.highlighted.min(last);
        level.highlighted = match motion {
            Motion::Up => current.saturating_sub(1),
            Motion::Down => (current + 1).min(last),
            Motion::PageUp => current.saturating_sub(page),
            Motion::PageDown => (current + page).min(last),
            Motion::First => 0,
            Motion::Last => last,
        };
    }

    fn active_len(&self) -> usize {
        self.levels
            .last()
            .and_then(|level| self.tree.get_node(level.parent))
            .map(TreeNode::child_count)
            .unwrap_or(0)
    }

    fn highlighted_index(&self) -> Option<Index> {
        let level = self.levels.last()?;
        self.tree
            .get_node(level.parent)?
            .children
            .get(level.highlighted)
            .copied()
    }

    fn column_width(&self) -> u16 {
        let preferred = self.options.list_width;
        match self.terminal_width {
            Some(total) => {
                let levels = u16::try_from(self.levels.len()).unwrap_or(u16::MAX);
                let fair = total / levels.max(1);
                preferred.min(fair).max(MIN_LIST_WIDTH)
            }
            None => preferred,
        }
    }
}

fn display_err(action: &str, e: std::io::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: format!("display: {action}"),
        source: Box::new(e),
    }
}
