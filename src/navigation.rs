// ABOUTME: Navigation state machine for the stepdeck application
// ABOUTME: Tracks the current slide, reveal step and direction of travel

use crate::deck::Deck;
use crate::steps;
use log::debug;

/// Direction of the last slide change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

/// Current position inside a deck.
///
/// The step count of every slide is captured when the navigator is built,
/// so the navigator never needs the deck again. The position only changes
/// through the transition methods below and can never leave
/// `0 <= slide < slide_count`, `0 <= step <= total_steps`.
#[derive(Debug, Clone)]
pub struct Navigator {
    slide_steps: Vec<usize>,
    slide_index: usize,
    step_index: usize,
    total_steps: usize,
    direction: Direction,
    fullscreen: bool,
}

impl Navigator {
    /// Start at the first slide with its prompt content shown
    pub fn new(deck: &Deck) -> Self {
        Self::from_step_counts(deck.slides.iter().map(steps::steps_required).collect())
    }

    /// Build from per-slide step counts. An empty list is treated as one single-step slide,
    /// and every count is at least one step.
    pub fn from_step_counts(mut slide_steps: Vec<usize>) -> Self {
        if slide_steps.is_empty() {
            slide_steps.push(steps::PROMPT_STEP);
        }
        for count in slide_steps.iter_mut() {
            *count = (*count).max(steps::PROMPT_STEP);
        }
        let total_steps = slide_steps[0];
        Self {
            slide_steps,
            slide_index: 0,
            step_index: steps::PROMPT_STEP,
            total_steps,
            direction: Direction::None,
            fullscreen: false,
        }
    }

    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn slide_count(&self) -> usize {
        self.slide_steps.len()
    }

    pub fn is_first_slide(&self) -> bool {
        self.slide_index == 0
    }

    pub fn is_last_slide(&self) -> bool {
        self.slide_index + 1 == self.slide_count()
    }

    /// True on the final step of the final slide
    pub fn at_end(&self) -> bool {
        self.is_last_slide() && self.step_index >= self.total_steps
    }

    /// True on the first step of the first slide
    pub fn at_start(&self) -> bool {
        self.is_first_slide() && self.step_index <= steps::PROMPT_STEP
    }

    /// Jump to a slide with its answers hidden. Out-of-range indices are ignored.
    pub fn go_to_slide(&mut self, index: usize) {
        if index >= self.slide_count() {
            debug!("Ignoring jump to slide {} of {}", index, self.slide_count());
            return;
        }
        self.direction = if index > self.slide_index {
            Direction::Forward
        } else if index < self.slide_index {
            Direction::Backward
        } else {
            Direction::None
        };
        self.enter(index, steps::PROMPT_STEP);
    }

    pub fn advance_slide(&mut self) {
        if self.is_last_slide() {
            return;
        }
        self.direction = Direction::Forward;
        self.enter(self.slide_index + 1, steps::PROMPT_STEP);
    }

    /// Go back one slide and show it fully revealed
    pub fn retreat_slide(&mut self) {
        if self.is_first_slide() {
            return;
        }
        let index = self.slide_index - 1;
        self.direction = Direction::Backward;
        self.enter(index, self.slide_steps[index]);
    }

    /// Reveal the next step, or move on to the next slide
    pub fn next_step(&mut self) {
        if self.step_index < self.total_steps {
            self.step_index += 1;
        } else if !self.is_last_slide() {
            self.advance_slide();
        }
    }

    /// Hide the last revealed step, or go back to the previous slide.
    ///
    /// Step 1 is the floor: from there the navigator retreats instead of
    /// hiding the prompt content.
    pub fn prev_step(&mut self) {
        if self.step_index > steps::PROMPT_STEP {
            self.step_index -= 1;
        } else if !self.is_first_slide() {
            self.retreat_slide();
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    fn enter(&mut self, index: usize, step: usize) {
        self.slide_index = index;
        self.total_steps = self.slide_steps[index];
        self.step_index = step;
        debug!(
            "Now at slide {} step {}/{}",
            self.slide_index + 1,
            self.step_index,
            self.total_steps
        );
    }
}
