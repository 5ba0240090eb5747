//! Shared fixtures for the integration tests
#![allow(dead_code)]

use scene_engine::prelude::*;

/// The sample board document shipped with the viewer
pub const BOARD: &str = include_str!("../../../../scenes/board.xml");

/// Parse document text into a tree
pub fn document(text: &str) -> Element {
    parse_document(text).expect("fixture document should be well-formed XML")
}

/// The board document with one top-level section removed
pub fn without_section(text: &str, tag: &str) -> String {
    let (start, end) = section_bounds(text, tag);
    format!("{}{}", &text[..start], &text[end..])
}

/// The board document with one top-level section moved to the end
pub fn section_moved_last(text: &str, tag: &str) -> String {
    let (start, end) = section_bounds(text, tag);
    let section = &text[start..end];
    let rest = format!("{}{}", &text[..start], &text[end..]);
    rest.replacen("</lsf>", &format!("{section}\n</lsf>"), 1)
}

fn section_bounds(text: &str, tag: &str) -> (usize, usize) {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = text.find(&open).expect("section should open");
    let end = text.find(&close).expect("section should close") + close.len();
    (start, end)
}

/// Driver over the board that has gone through the one-time setup
pub fn ready_driver(config: ViewerConfig) -> (SceneDriver, RecordingContext, RecordingPanel) {
    let mut driver = SceneDriver::new(config);
    driver.load(&document(BOARD)).expect("board should load");

    let mut ctx = RecordingContext::new();
    let mut panel = RecordingPanel::new();
    assert!(driver.on_graph_loaded(&mut panel, &mut ctx));
    (driver, ctx, panel)
}
