// ABOUTME: Library module for the stepdeck program.
// ABOUTME: Contains the deck model, reveal steps, navigation, outline, rendering and viewer loop.

pub mod config;
pub mod deck;
pub mod errors;
pub mod highlight;
pub mod html;
pub mod input;
pub mod markdown;
pub mod navigation;
pub mod outline;
pub mod render;
pub mod steps;
pub mod utils;
pub mod viewer;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use deck::{Deck, ItemKind, Slide, SlideItem, Theme, ANALYSIS_TABLE_LABEL};
pub use errors::{DeckError, Result};
pub use html::{generate_html, write_html_to_file};
pub use input::{Action, InputContext};
pub use navigation::{Direction, Navigator};
pub use outline::{format_outline, Chapter, OutlineCursor, Thumbnail};
pub use steps::{steps_required, visible_items};
pub use viewer::{run, Session};
pub use watch::DeckWatcher;

#[cfg(test)]
mod tests;
