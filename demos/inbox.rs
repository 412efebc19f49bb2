//! Inbox demo - scripted change cycles against a live terminal grid
//!
//! This demo drives the full stack on the alternate screen:
//! - an in-memory sectioned store shared between grid and controller
//! - change cycles fed through the controller, one per store mutation
//! - incremental batches and full reloads, visible as they land
//!
//! Run with: cargo run --example inbox

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use gridsync::{
    ChangeObserver, GridController, ItemChange, MemoryResults, Position, SectionChange, TermGrid,
};

fn pause() {
    thread::sleep(Duration::from_millis(900));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Seed the store with two sections of rows.
    let results: MemoryResults<String> = MemoryResults::new();
    results.push_section(
        "Inbox",
        vec!["Draft report".to_string(), "Ping from CI".to_string()],
    );
    results.push_section("Archive", vec!["Release notes".to_string()]);

    execute!(io::stdout(), EnterAlternateScreen, Hide)?;

    let mut grid = TermGrid::new(results.clone(), io::stdout(), 60, 24);
    grid.autosize();
    grid.attach()?;

    let mut controller = GridController::new(results.clone(), grid);
    controller.perform_fetch()?;

    let cycles: Rc<Cell<usize>> = Rc::new(Cell::new(0));
    let cycles_probe = cycles.clone();
    controller.on_update(move || cycles_probe.set(cycles_probe.get() + 1));

    // Benign cycle: update one row, insert next to existing rows.
    pause();
    results.replace_item(Position::new(0, 0), "Draft report (edited)".to_string());
    results.insert_item(Position::new(0, 2), "Standup at 10".to_string());
    controller.will_change();
    controller.item_changed(ItemChange::Update(Position::new(0, 0)));
    controller.item_changed(ItemChange::Insert(Position::new(0, 2)));
    controller.did_change();

    // A brand-new section shows nothing yet, so this cycle reloads.
    pause();
    results.insert_section(2, "Spam");
    results.insert_item(Position::new(2, 0), "Limited time offer".to_string());
    controller.will_change();
    controller.section_changed(SectionChange::insert(2));
    controller.item_changed(ItemChange::Insert(Position::new(2, 0)));
    controller.did_change();

    // A move stays incremental even out of a small section.
    pause();
    results.move_item(Position::new(0, 1), Position::new(1, 0));
    controller.will_change();
    controller.item_changed(ItemChange::Move {
        from: Position::new(0, 1),
        to: Position::new(1, 0),
    });
    controller.did_change();

    // Deleting a section's last row reloads; the emptied title stays.
    pause();
    results.remove_item(Position::new(2, 0));
    controller.will_change();
    controller.item_changed(ItemChange::Delete(Position::new(2, 0)));
    controller.did_change();

    pause();
    controller.view_mut().scroll_by(2);
    pause();
    controller.view_mut().scroll_to(0);
    pause();

    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    println!(
        "{} cycles presented, {} rows left in the store",
        cycles.get(),
        controller.total_count()
    );
    Ok(())
}
