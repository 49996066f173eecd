// ABOUTME: Reveal step derivation for the stepdeck application
// ABOUTME: Splits a slide into its prompt half and its answer half

use crate::deck::Slide;

/// Step on which every item before the reveal boundary shows up
pub const PROMPT_STEP: usize = 1;

/// Step on which the boundary item and everything after it shows up
pub const ANSWER_STEP: usize = 2;

/// Index of the first answer, analysis or analysis-table item, if any
pub fn reveal_boundary(slide: &Slide) -> Option<usize> {
    slide.items.iter().position(|item| item.is_reveal_boundary())
}

/// Number of reveal steps a slide needs: 1 without a boundary, 2 with one
pub fn steps_required(slide: &Slide) -> usize {
    match reveal_boundary(slide) {
        Some(_) => ANSWER_STEP,
        None => PROMPT_STEP,
    }
}

/// Step at which the item at `index` becomes visible
pub fn required_step(slide: &Slide, index: usize) -> usize {
    match reveal_boundary(slide) {
        Some(boundary) if index >= boundary => ANSWER_STEP,
        _ => PROMPT_STEP,
    }
}

pub fn is_visible(slide: &Slide, index: usize, current_step: usize) -> bool {
    current_step >= required_step(slide, index)
}

/// Indices of the items shown at `current_step`, in slide order
pub fn visible_items(slide: &Slide, current_step: usize) -> Vec<usize> {
    let len = slide.items.len();
    let end = if current_step >= ANSWER_STEP {
        len
    } else if current_step >= PROMPT_STEP {
        reveal_boundary(slide).unwrap_or(len)
    } else {
        0
    };
    (0..end).collect()
}
