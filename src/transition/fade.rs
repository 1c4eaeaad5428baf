use crate::config::FadeOptions;
use crate::dom::{Document, ElementId};

pub const MAX_PROGRESS: f64 = 1.0;

/// Linear crossfade: the incoming layer is raised and its opacity follows
/// the progress directly.
#[derive(Debug, Clone)]
pub struct FadeEffect {
    options: FadeOptions,
}

impl FadeEffect {
    pub fn new(options: FadeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FadeOptions {
        &self.options
    }

    /// Progress after `ticks` steps of `speed` percent each.
    pub fn progress_at(&self, ticks: u64, speed: f64) -> f64 {
        (ticks as f64 * speed / 100.0).min(MAX_PROGRESS)
    }

    pub fn prepare(&self, doc: &mut Document, layers: &[ElementId]) {
        for (i, id) in layers.iter().enumerate() {
            doc.style_mut(*id).opacity = Some(if i == 0 { self.options.opacity } else { 0.0 });
        }
    }

    pub fn apply(&self, doc: &mut Document, next: ElementId, progress: f64) {
        doc.style_mut(next).opacity = Some(progress * self.options.opacity);
    }

    pub fn finish(&self, doc: &mut Document, current: ElementId) {
        doc.style_mut(current).opacity = Some(0.0);
    }
}
