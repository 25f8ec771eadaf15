//! # Page Break Decisions
//!
//! Logic for deciding whether a section starts on the current page or the
//! next. Sections are never split: the whole section either fits above the
//! content bottom or moves to a fresh page.

/// What to do with a section before drawing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Place the section on the current page (it fits).
    Place,
    /// Finalize the current page and place the section on a new one.
    MoveToNextPage,
}

/// Decide where a section goes.
///
/// `heights` are the blocks that must stay together, e.g. a heading and the
/// first entry under it. `page_is_fresh` is true when nothing has been placed
/// below the header yet; a section that doesn't fit on a fresh page would not
/// fit on the next one either, so it is placed and allowed to overflow.
pub fn decide_break(
    cursor_y: f64,
    heights: &[f64],
    content_bottom: f64,
    page_is_fresh: bool,
) -> BreakDecision {
    let total: f64 = heights.iter().sum();

    if cursor_y + total <= content_bottom {
        return BreakDecision::Place;
    }

    if page_is_fresh {
        return BreakDecision::Place;
    }

    BreakDecision::MoveToNextPage
}
