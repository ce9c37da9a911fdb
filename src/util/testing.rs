//! Test support: logging setup, fixture tables and a scripted display.
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{BrowserEvent, ListFrame};
use crate::infrastructure::traits::ListDisplay;

static TEST_SETUP: Once = Once::new();

/// Category A with one subcategory and item, plus an empty category B.
pub const SCENARIO_TABLE: &str = "\
01000000,Cat A
01001000,Sub A1
01001001,Item A1a
02000000,Cat B
";

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // RUST_LOG wins, otherwise everything from this crate
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taxotree=trace"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Write `content` to `dir/name` and return the path.
pub fn write_table(dir: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Display that replays a fixed list of events and records every draw.
#[derive(Debug, Default)]
pub struct ScriptedDisplay {
    events: VecDeque<BrowserEvent>,
    pub draws: Vec<Vec<ListFrame>>,
}

impl ScriptedDisplay {
    pub fn new(events: impl IntoIterator<Item = BrowserEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            draws: Vec::new(),
        }
    }

    pub fn last_draw(&self) -> Option<&[ListFrame]> {
        self.draws.last().map(Vec::as_slice)
    }
}

impl ListDisplay for ScriptedDisplay {
    fn draw(&mut self, frames: &[ListFrame]) -> io::Result<()> {
        self.draws.push(frames.to_vec());
        Ok(())
    }

    fn next_event(&mut self) -> io::Result<Option<BrowserEvent>> {
        Ok(self.events.pop_front())
    }
}
