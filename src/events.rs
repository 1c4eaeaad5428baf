use crate::dom::Rect;

/// Requests sent to a running carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideCommand {
    Next,
    Previous,
    GoTo(usize),
    /// The host window (and therefore the container) changed size.
    Resize(Rect),
    /// Pointer movement over the container; wakes hidden indicators.
    Activity,
}

/// Emitted by the carousel as it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEvent {
    TransitionStarted { from: usize, to: usize },
    TransitionFinished { index: usize },
    IndicatorHidden,
    IndicatorShown,
}
