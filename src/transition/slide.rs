use crate::config::{SlideMove, SlideOptions};
use crate::dom::{Document, ElementId, Length};
use crate::easing::quartic_in_out;

pub const MAX_PROGRESS: f64 = 100.0;

/// Push transition along one axis, eased with a quartic curve.
#[derive(Debug, Clone)]
pub struct SlideEffect {
    options: SlideOptions,
}

impl SlideEffect {
    pub fn new(options: SlideOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SlideOptions {
        &self.options
    }

    /// Progress after `ticks` steps of `speed` percent each.
    pub fn progress_at(&self, ticks: u64, speed: f64) -> f64 {
        (ticks as f64 * speed).min(MAX_PROGRESS)
    }

    fn inward(&self) -> bool {
        self.options.movement == SlideMove::In
    }

    /// Offset, in percent, the incoming layer starts from. Also where the
    /// outgoing layer is parked afterwards.
    fn entry(&self) -> f64 {
        -self.options.direction.sign() * 100.0
    }

    pub fn raises_incoming(&self) -> bool {
        self.options.stack && self.inward()
    }

    /// Stacked slide-out moves the outgoing layer off the target, which
    /// must therefore sit right below it.
    pub fn uncovers_target(&self) -> bool {
        self.options.stack && !self.inward()
    }

    fn set_offset(&self, doc: &mut Document, id: ElementId, percent: f64) {
        let style = doc.style_mut(id);
        if self.options.direction.is_horizontal() {
            style.left = Some(Length::Percent(percent));
        } else {
            style.top = Some(Length::Percent(percent));
        }
    }

    pub fn prepare(&self, doc: &mut Document, layers: &[ElementId]) {
        if self.options.stack {
            return;
        }
        for (i, id) in layers.iter().enumerate() {
            doc.style_mut(*id).opacity = Some(if i == 0 { self.options.opacity } else { 0.0 });
        }
    }

    pub fn apply(&self, doc: &mut Document, current: ElementId, next: ElementId, progress: f64) {
        let travelled =
            self.options.direction.sign() * 100.0 * quartic_in_out(progress / MAX_PROGRESS);
        let entry = self.entry();

        if self.options.stack {
            if self.inward() {
                self.set_offset(doc, next, entry + travelled);
            } else {
                self.set_offset(doc, current, travelled);
            }
            return;
        }

        self.set_offset(doc, current, travelled);
        self.set_offset(doc, next, entry + travelled);
        doc.style_mut(next).opacity = Some(self.options.opacity);
    }

    pub fn finish(&self, doc: &mut Document, current: ElementId) {
        let parked = if self.options.stack { 0.0 } else { self.entry() };
        let style = doc.style_mut(current);
        if self.options.direction.is_horizontal() {
            style.left = Some(Length::Percent(parked));
            style.top = Some(Length::Percent(0.0));
        } else {
            style.left = Some(Length::Percent(0.0));
            style.top = Some(Length::Percent(parked));
        }
    }
}
