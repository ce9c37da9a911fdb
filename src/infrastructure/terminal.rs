//! Terminal list display built on ratatui and crossterm.
//!
//! Each open drill-down level is drawn as its own column, left to right.
//! Raw mode and the alternate screen are restored when the display is dropped.

use std::io::{self, Stdout};

use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::{debug, trace};

use crate::domain::{BrowserEvent, ListFrame, Motion};
use crate::infrastructure::log_buffer::HeldLogs;
use crate::infrastructure::traits::ListDisplay;
use crate::infrastructure::{InfraError, InfraResult};

const HELP: &str = "space select • enter open • backspace back • ↑/↓ move • q quit";
const COLUMN_GAP: u16 = 4;
const HIGHLIGHT: Color = Color::Indexed(170);

/// Raw mode plus alternate screen, undone on drop.
///
/// Created before anything else can fail so a half-initialized display
/// still restores the terminal.
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> InfraResult<Self> {
        enable_raw_mode().map_err(|e| InfraError::io("enable raw mode", e))?;
        let guard = ScreenGuard;
        execute!(io::stdout(), EnterAlternateScreen)
            .map_err(|e| InfraError::io("enter alternate screen", e))?;
        Ok(guard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    list_height: u16,
    pending_resize: Option<u16>,
    // Dropped in this order: screen restored, then held logs flushed.
    _screen: ScreenGuard,
    _logs: HeldLogs,
}

impl TerminalDisplay {
    /// Switch the terminal into raw mode on the alternate screen.
    ///
    /// Log output is held back until the display is dropped.
    pub fn new(list_height: u16) -> InfraResult<Self> {
        let logs = HeldLogs::hold();
        let screen = ScreenGuard::enter()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout())).map_err(|e| {
            InfraError::Terminal {
                message: e.to_string(),
            }
        })?;
        // Report the starting width like any later resize.
        let pending_resize = crossterm::terminal::size().ok().map(|(width, _)| width);
        debug!(?pending_resize, "terminal display ready");
        Ok(Self {
            terminal,
            list_height,
            pending_resize,
            _screen: screen,
            _logs: logs,
        })
    }
}

impl ListDisplay for TerminalDisplay {
    fn draw(&mut self, frames: &[ListFrame]) -> io::Result<()> {
        let height = self.list_height;
        self.terminal.draw(|f| render(f, frames, height))?;
        Ok(())
    }

    fn next_event(&mut self) -> io::Result<Option<BrowserEvent>> {
        if let Some(width) = self.pending_resize.take() {
            return Ok(Some(BrowserEvent::Resize { width }));
        }
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(event) = map_key(key) {
                        trace!(?event, "key");
                        return Ok(Some(event));
                    }
                }
                Event::Resize(width, _) => return Ok(Some(BrowserEvent::Resize { width })),
                _ => {}
            }
        }
    }
}

/// Key bindings. Unbound keys yield None.
pub fn map_key(key: KeyEvent) -> Option<BrowserEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(BrowserEvent::Quit),
            _ => None,
        };
    }
    let event = match key.code {
        KeyCode::Char(' ') => BrowserEvent::Toggle,
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => BrowserEvent::DrillDown,
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => BrowserEvent::BackOut,
        KeyCode::Char('q') | KeyCode::Esc => BrowserEvent::Quit,
        KeyCode::Up | KeyCode::Char('k') => BrowserEvent::Navigate(Motion::Up),
        KeyCode::Down | KeyCode::Char('j') => BrowserEvent::Navigate(Motion::Down),
        KeyCode::PageUp => BrowserEvent::Navigate(Motion::PageUp),
        KeyCode::PageDown => BrowserEvent::Navigate(Motion::PageDown),
        KeyCode::Home | KeyCode::Char('g') => BrowserEvent::Navigate(Motion::First),
        KeyCode::End | KeyCode::Char('G') => BrowserEvent::Navigate(Motion::Last),
        _ => return None,
    };
    Some(event)
}

fn render(f: &mut Frame, frames: &[ListFrame], list_height: u16) {
    let [lists_area, help_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(list_height), Constraint::Length(1)])
        .areas(f.area());

    let mut constraints: Vec<Constraint> = frames
        .iter()
        .map(|frame| Constraint::Length(frame.width + COLUMN_GAP))
        .collect();
    constraints.push(Constraint::Min(0));
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(lists_area);

    for (frame, area) in frames.iter().zip(columns.iter()) {
        render_list(f, frame, *area);
    }

    f.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn render_list(f: &mut Frame, frame: &ListFrame, area: Rect) {
    let items: Vec<ListItem> = frame
        .rows
        .iter()
        .map(|row| ListItem::new(row.as_str()))
        .collect();

    let highlight = if frame.active {
        Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(HIGHLIGHT)
    };
    let list = List::new(items)
        .highlight_style(highlight)
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(frame.highlighted));
    f.render_stateful_widget(list, area, &mut state);
}
