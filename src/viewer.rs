// ABOUTME: Interactive viewer session for the stepdeck application
// ABOUTME: Owns the deck and navigator, applies input actions and drives the terminal loop

use crate::config::Config;
use crate::deck::Deck;
use crate::errors::{DeckError, Result};
use crate::input::{self, Action, InputContext};
use crate::navigation::Navigator;
use crate::outline::{self, OutlineCursor};
use crate::render::{self, Frame, View};
use crate::watch::DeckWatcher;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, error, info};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};

const NOTICE_MS: u64 = 3000;

/// One viewing session: the deck, the position in it, and the overlays on top
pub struct Session {
    deck: Deck,
    nav: Navigator,
    config: Config,
    outline: Option<OutlineCursor>,
    help_open: bool,
    controls_collapsed: bool,
    scroll: usize,
    max_scroll: usize,
    hint_deadline: Option<Instant>,
    notice: Option<(String, Instant)>,
    quit: bool,
}

impl Session {
    pub fn new(deck: Deck, config: Config) -> Self {
        Self::started_at(deck, config, Instant::now())
    }

    /// Create a session whose hint banner timer starts at `now`
    pub fn started_at(deck: Deck, config: Config, now: Instant) -> Self {
        let nav = Navigator::new(&deck);
        let hint_deadline = config
            .hints_enabled()
            .then(|| now + Duration::from_millis(config.hint_timeout_ms));
        Self {
            deck,
            nav,
            config,
            outline: None,
            help_open: false,
            controls_collapsed: false,
            scroll: 0,
            max_scroll: 0,
            hint_deadline,
            notice: None,
            quit: false,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn outline(&self) -> Option<&OutlineCursor> {
        self.outline.as_ref()
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn controls_collapsed(&self) -> bool {
        self.controls_collapsed
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn hints_visible(&self) -> bool {
        self.hint_deadline.is_some()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn input_context(&self) -> InputContext {
        InputContext {
            outline_open: self.outline.is_some(),
            help_open: self.help_open,
            fullscreen: self.nav.is_fullscreen(),
        }
    }

    /// Rows of the screen that belong to the slide, for click mapping
    pub fn content_height(&self, height: u16) -> u16 {
        height.saturating_sub(render::control_rows(
            self.nav.is_fullscreen(),
            self.controls_collapsed,
        ))
    }

    /// Apply one action
    pub fn apply(&mut self, action: Action) {
        debug!("Applying {:?}", action);
        let slide_before = self.nav.slide_index();

        match action {
            Action::NextStep => self.nav.next_step(),
            Action::PrevStep => self.nav.prev_step(),
            Action::ToggleFullscreen => self.nav.toggle_fullscreen(),
            Action::ExitFullscreen => {
                if self.nav.is_fullscreen() {
                    self.nav.toggle_fullscreen();
                }
            }
            Action::FirstSlide => self.nav.go_to_slide(0),
            Action::LastSlide => self.nav.go_to_slide(self.deck.len().saturating_sub(1)),
            Action::Chapter(number) => {
                if let Some(index) = outline::chapter_start(&self.deck, number) {
                    self.nav.go_to_slide(index);
                }
            }
            Action::OpenOutline => {
                self.help_open = false;
                self.outline = Some(OutlineCursor::open(self.nav.slide_index(), self.deck.len()));
            }
            Action::CloseOverlay => {
                self.outline = None;
                self.help_open = false;
            }
            Action::ToggleHelp => self.help_open = !self.help_open,
            Action::ToggleControls => self.controls_collapsed = !self.controls_collapsed,
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => self.scroll = (self.scroll + 1).min(self.max_scroll),
            Action::OutlineUp => self.with_cursor(OutlineCursor::up),
            Action::OutlineDown => self.with_cursor(OutlineCursor::down),
            Action::OutlineFirst => self.with_cursor(OutlineCursor::first),
            Action::OutlineLast => self.with_cursor(OutlineCursor::last),
            Action::OutlineSelect => {
                if let Some(cursor) = self.outline.take() {
                    self.nav.go_to_slide(cursor.selected());
                }
            }
            Action::Quit => self.quit = true,
        }

        if self.nav.slide_index() != slide_before
            || matches!(action, Action::FirstSlide | Action::LastSlide)
        {
            self.scroll = 0;
        }
    }

    fn with_cursor(&mut self, f: fn(&mut OutlineCursor)) {
        if let Some(cursor) = self.outline.as_mut() {
            f(cursor);
        }
    }

    /// Swap in a freshly loaded deck, staying as close to the current slide as possible
    pub fn replace_deck(&mut self, deck: Deck) {
        let index = self.nav.slide_index().min(deck.len().saturating_sub(1));
        let fullscreen = self.nav.is_fullscreen();

        let mut nav = Navigator::new(&deck);
        nav.go_to_slide(index);
        if fullscreen {
            nav.toggle_fullscreen();
        }

        info!("Reloaded deck with {} slides", deck.len());
        let message = format!("reloaded ({} slides)", deck.len());
        self.deck = deck;
        self.nav = nav;
        self.outline = None;
        self.scroll = 0;
        self.set_notice(message, Instant::now());
    }

    pub fn set_notice(&mut self, text: impl Into<String>, now: Instant) {
        self.notice = Some((text.into(), now + Duration::from_millis(NOTICE_MS)));
    }

    /// Expire timed overlays. Returns true when something changed on screen.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.hint_deadline.map(|d| now >= d).unwrap_or(false) {
            self.hint_deadline = None;
            changed = true;
        }
        if self.notice.as_ref().map(|(_, d)| now >= *d).unwrap_or(false) {
            self.notice = None;
            changed = true;
        }
        changed
    }

    /// Lay out the current screen and remember how far the body can scroll
    pub fn frame(&mut self, width: u16, height: u16) -> Frame {
        let frame = render::compose(&self.view(), width, height);
        self.max_scroll = frame.max_scroll;
        self.scroll = self.scroll.min(self.max_scroll);
        frame
    }

    pub fn view(&self) -> View<'_> {
        View {
            deck: &self.deck,
            nav: &self.nav,
            scroll: self.scroll,
            show_hints: self.hints_visible(),
            controls_collapsed: self.controls_collapsed,
            outline: self.outline.as_ref(),
            help_open: self.help_open,
            notice: self.notice(),
        }
    }
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the guard
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().map_err(|e| DeckError::TerminalError(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)
            .map_err(|e| DeckError::TerminalError(e.to_string()))?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.stdout, DisableMouseCapture, Show, LeaveAlternateScreen) {
            error!("Failed to restore terminal: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            error!("Failed to leave raw mode: {}", e);
        }
    }
}

/// Run the interactive viewer until the user quits.
///
/// With `watch_path` set, the deck is reloaded whenever that file changes.
pub fn run(deck: Deck, config: Config, watch_path: Option<&Path>) -> Result<()> {
    let watcher = match watch_path {
        Some(path) => Some(DeckWatcher::start(path, config.debounce_ms)?),
        None => None,
    };
    let mut session = Session::new(deck, config);
    let tick = Duration::from_millis(session.config().tick_ms);
    let click_split = session.config().click_split;
    let mut guard = TerminalGuard::enter()?;
    let mut dirty = true;

    info!("Viewer started with {} slides", session.deck().len());

    while !session.should_quit() {
        let (width, height) =
            terminal::size().map_err(|e| DeckError::TerminalError(e.to_string()))?;

        if dirty {
            let frame = session.frame(width, height);
            render::paint(&mut guard.stdout, &frame)?;
            dirty = false;
        }

        if event::poll(tick)? {
            let action = match event::read()? {
                Event::Key(key) => input::map_key(key, session.input_context()),
                Event::Mouse(mouse) => input::map_mouse(
                    mouse,
                    session.input_context(),
                    width,
                    session.content_height(height),
                    click_split,
                ),
                Event::Resize(..) => {
                    dirty = true;
                    None
                }
                _ => None,
            };
            if let Some(action) = action {
                session.apply(action);
                dirty = true;
            }
        }

        if let Some(reload) = watcher.as_ref().and_then(DeckWatcher::take_reload) {
            match reload {
                Ok(deck) => session.replace_deck(deck),
                Err(e) => {
                    error!("Failed to reload deck: {}", e);
                    session.set_notice(format!("reload failed: {}", e), Instant::now());
                }
            }
            dirty = true;
        }

        if session.tick(Instant::now()) {
            dirty = true;
        }
    }

    info!("Viewer closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Slide, SlideItem, Theme};

    fn deck(n: usize) -> Deck {
        let slides = (0..n)
            .map(|i| {
                let slide = Slide::new(format!("s{}", i), format!("Slide {}", i));
                if i % 2 == 1 {
                    slide.with_items(vec![
                        SlideItem::Example {
                            content: "q".into(),
                        },
                        SlideItem::Answer {
                            content: "a".into(),
                        },
                    ])
                } else {
                    slide
                }
            })
            .collect();
        Deck::new("test", slides).expect("valid deck")
    }

    fn quiet() -> Config {
        Config::new().with_overrides(None, true).expect("valid config")
    }

    #[test]
    fn test_hint_banner_expires() {
        let start = Instant::now();
        let mut session = Session::started_at(deck(2), Config::new(), start);
        assert!(session.hints_visible());
        assert!(!session.tick(start + Duration::from_millis(4999)));
        assert!(session.hints_visible());
        assert!(session.tick(start + Duration::from_millis(5000)));
        assert!(!session.hints_visible());
    }

    #[test]
    fn test_no_hints_when_disabled() {
        let session = Session::new(deck(2), quiet());
        assert!(!session.hints_visible());
    }

    #[test]
    fn test_actions_drive_navigation() {
        let mut session = Session::new(deck(4), quiet());
        session.apply(Action::NextStep);
        assert_eq!(session.navigator().slide_index(), 1);
        session.apply(Action::NextStep);
        assert_eq!(session.navigator().step_index(), 2);
        session.apply(Action::LastSlide);
        assert_eq!(session.navigator().slide_index(), 3);
        assert_eq!(session.navigator().step_index(), 1);
        session.apply(Action::FirstSlide);
        assert_eq!(session.navigator().slide_index(), 0);
    }

    #[test]
    fn test_escape_only_leaves_fullscreen() {
        let mut session = Session::new(deck(2), quiet());
        session.apply(Action::ExitFullscreen);
        assert!(!session.navigator().is_fullscreen());
        session.apply(Action::ToggleFullscreen);
        assert!(session.input_context().fullscreen);
        session.apply(Action::ExitFullscreen);
        assert!(!session.navigator().is_fullscreen());
    }

    #[test]
    fn test_outline_select_jumps_unrevealed() {
        let mut session = Session::new(deck(4), quiet());
        session.apply(Action::OpenOutline);
        assert!(session.input_context().outline_open);
        session.apply(Action::OutlineDown);
        session.apply(Action::OutlineDown);
        session.apply(Action::OutlineDown);
        assert_eq!(session.outline().map(|c| c.selected()), Some(3));
        session.apply(Action::OutlineSelect);
        assert!(session.outline().is_none());
        assert_eq!(session.navigator().slide_index(), 3);
        assert_eq!(session.navigator().step_index(), 1);
    }

    #[test]
    fn test_outline_close_does_not_navigate() {
        let mut session = Session::new(deck(3), quiet());
        session.apply(Action::OpenOutline);
        session.apply(Action::OutlineLast);
        session.apply(Action::CloseOverlay);
        assert_eq!(session.navigator().slide_index(), 0);
    }

    #[test]
    fn test_chapter_jump() {
        let slides = vec![
            Slide::new("t", "Title").with_theme(Theme::Accent),
            Slide::new("a", "A"),
            Slide::new("c1", "Chapter 1").with_theme(Theme::Accent),
            Slide::new("b", "B"),
        ];
        let mut session = Session::new(Deck::new("d", slides).expect("valid"), quiet());
        session.apply(Action::Chapter(1));
        assert_eq!(session.navigator().slide_index(), 2);
        session.apply(Action::Chapter(5));
        assert_eq!(session.navigator().slide_index(), 2);
    }

    #[test]
    fn test_replace_deck_clamps_position() {
        let mut session = Session::new(deck(6), quiet());
        session.apply(Action::LastSlide);
        session.apply(Action::ToggleFullscreen);
        session.replace_deck(deck(3));
        assert_eq!(session.navigator().slide_index(), 2);
        assert_eq!(session.navigator().step_index(), 1);
        assert!(session.navigator().is_fullscreen());
        assert!(session.notice().is_some());
    }

    #[test]
    fn test_scroll_clamped_by_frame() {
        let mut session = Session::new(deck(2), quiet());
        for _ in 0..10 {
            session.apply(Action::ScrollDown);
        }
        assert_eq!(session.scroll(), 0);

        session.apply(Action::NextStep);
        let frame = session.frame(40, 5);
        for _ in 0..10 {
            session.apply(Action::ScrollDown);
        }
        assert_eq!(session.scroll(), frame.max_scroll);
        session.apply(Action::PrevStep);
        assert_eq!(session.scroll(), 0);
    }

    #[test]
    fn test_content_height_tracks_controls() {
        let mut session = Session::new(deck(2), quiet());
        assert_eq!(session.content_height(20), 18);
        session.apply(Action::ToggleControls);
        assert_eq!(session.content_height(20), 19);
        session.apply(Action::ToggleFullscreen);
        assert_eq!(session.content_height(20), 20);
    }

    #[test]
    fn test_quit() {
        let mut session = Session::new(deck(1), quiet());
        session.apply(Action::Quit);
        assert!(session.should_quit());
    }
}
