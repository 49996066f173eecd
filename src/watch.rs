// ABOUTME: Watch module for live-reloading a deck file
// ABOUTME: Re-parses the deck on change and hands the result to the viewer session

use log::{debug, error, info};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, FileIdMap};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::deck::Deck;
use crate::errors::Result;
use crate::utils;

type DeckDebouncer = Debouncer<RecommendedWatcher, FileIdMap>;

/// Outcome of the latest reload that the session has not picked up yet
type PendingReload = Arc<Mutex<Option<Result<Deck>>>>;

/// Watches one deck file. Dropping it stops the watcher.
pub struct DeckWatcher {
    pending: PendingReload,
    _debouncer: DeckDebouncer,
}

impl DeckWatcher {
    /// Start watching `deck_path`'s directory for changes to the deck file
    pub fn start(deck_path: &Path, debounce_ms: u64) -> Result<Self> {
        utils::validate_file_exists(deck_path)?;
        let deck_abs = utils::get_absolute_path(deck_path)?;
        let watch_dir = match deck_abs.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let pending: PendingReload = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&pending);
        let target = deck_abs.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let relevant = events
                        .iter()
                        .any(|event| event.paths.iter().any(|path| is_deck_path(path, &target)));
                    if relevant {
                        info!("Deck file changed, reloading {:?}", target);
                        *slot.lock() = Some(Deck::load(&target));
                    }
                }
                Err(errors) => {
                    for e in errors {
                        error!("Watch error: {:?}", e);
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(&watch_dir, RecursiveMode::NonRecursive)?;
        info!("Watching {:?} for changes", deck_abs);

        Ok(Self {
            pending,
            _debouncer: debouncer,
        })
    }

    /// Take the latest reload result, if one arrived since the last call
    pub fn take_reload(&self) -> Option<Result<Deck>> {
        self.pending.lock().take()
    }
}

/// Whether an event path refers to the watched deck file
fn is_deck_path(path: &Path, deck_abs: &Path) -> bool {
    if path == deck_abs {
        return true;
    }
    match utils::get_absolute_path(path) {
        Ok(abs) => abs == deck_abs,
        Err(_) => {
            debug!("Ignoring event for unresolvable path {:?}", path);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_deck_path() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let deck = dir.path().join("deck.md");
        let other = dir.path().join("notes.md");
        fs::write(&deck, "# A\n").expect("Failed to write deck");
        fs::write(&other, "# B\n").expect("Failed to write notes");
        let deck_abs = utils::get_absolute_path(&deck).expect("absolute path");

        assert!(is_deck_path(&deck, &deck_abs));
        assert!(!is_deck_path(&other, &deck_abs));
        assert!(!is_deck_path(&dir.path().join("gone.md"), &deck_abs));
    }

    #[test]
    fn test_start_requires_existing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        assert!(DeckWatcher::start(&dir.path().join("missing.md"), 100).is_err());
    }
}
