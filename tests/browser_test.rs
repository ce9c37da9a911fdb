//! End-to-end browsing sessions driven by a scripted display.

use std::sync::Arc;

use taxotree::application::services::{Browser, BrowserOptions, TaxonomyService};
use taxotree::domain::{BrowserEvent, Motion, NodeId, SelectionState, TaxonomyTree};
use taxotree::infrastructure::traits::RealFileSystem;
use taxotree::util::testing::{init_test_setup, ScriptedDisplay, SCENARIO_TABLE};

fn scenario_tree() -> TaxonomyTree {
    TaxonomyService::new(Arc::new(RealFileSystem))
        .build_from_str(SCENARIO_TABLE)
        .unwrap()
        .tree
}

#[test]
fn given_scenario_when_item_toggled_three_levels_down_then_ancestors_full() {
    // Arrange
    init_test_setup();
    let tree = scenario_tree();
    let mut browser = Browser::new(&tree, BrowserOptions::default());
    let mut display = ScriptedDisplay::new([
        BrowserEvent::DrillDown,
        BrowserEvent::DrillDown,
        BrowserEvent::Toggle,
        BrowserEvent::Quit,
    ]);

    // Act
    browser.run(&mut display).unwrap();

    // Assert
    let frames = display.last_draw().unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(
        frames[0].rows,
        vec!["1. [+] Cat A (1 items)", "2. [ ] Cat B"]
    );
    assert_eq!(frames[1].rows, vec!["1. [+] Sub A1 (1 items)"]);
    assert_eq!(frames[2].rows, vec!["1. [+] Item A1a"]);
    assert!(frames[2].active);

    let selection = browser.into_selection();
    assert_eq!(selection.state(&NodeId::from("01000000")), SelectionState::Full);
    assert_eq!(
        selection.selected_leaves(&tree),
        vec![&NodeId::from("01001001")]
    );
}

#[test]
fn given_drilled_in_when_backing_out_then_selection_persists() {
    let tree = scenario_tree();
    let mut browser = Browser::new(&tree, BrowserOptions::default());
    let mut display = ScriptedDisplay::new([
        BrowserEvent::DrillDown,
        BrowserEvent::Toggle,
        BrowserEvent::BackOut,
        BrowserEvent::Navigate(Motion::Down),
        BrowserEvent::Toggle,
    ]);

    browser.run(&mut display).unwrap();

    let frames = display.last_draw().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(
        frames[0].rows,
        vec!["1. [+] Cat A (1 items)", "2. [+] Cat B"]
    );
    assert_eq!(frames[0].highlighted, 1);
}

#[test]
fn given_script_without_quit_when_run_then_ends_with_input() {
    let tree = scenario_tree();
    let mut browser = Browser::new(&tree, BrowserOptions::default());
    let mut display = ScriptedDisplay::new([BrowserEvent::Navigate(Motion::Last)]);

    browser.run(&mut display).unwrap();

    assert_eq!(display.draws.len(), 2);
    assert!(browser.selection().is_empty());
}

#[test]
fn given_toggle_twice_when_run_then_selection_cleared() {
    let tree = scenario_tree();
    let mut browser = Browser::new(&tree, BrowserOptions::default());
    let mut display = ScriptedDisplay::new([
        BrowserEvent::Toggle,
        BrowserEvent::Toggle,
        BrowserEvent::Quit,
    ]);

    browser.run(&mut display).unwrap();

    assert!(browser.selection().is_empty());
    assert_eq!(
        display.last_draw().unwrap()[0].rows[0],
        "1. [ ] Cat A (1 items)"
    );
}
