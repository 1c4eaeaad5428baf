mod fade;
mod slide;

pub use fade::FadeEffect;
pub use slide::SlideEffect;

use tracing::{debug, trace};

use crate::config::{Configuration, TransitionMode};
use crate::dom::{Document, ElementId};

/// Cyclic pointer into the layer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    len: usize,
    turn: usize,
}

impl Rotation {
    pub fn new(len: usize) -> Self {
        Self { len, turn: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.turn
    }

    pub fn next(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.turn + 1) % self.len
        }
    }

    pub fn previous(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.turn + self.len - 1) % self.len
        }
    }

    /// Moves to the next index, wrapping after the last one.
    pub fn advance(&mut self) -> usize {
        self.turn = self.next();
        self.turn
    }

    fn set(&mut self, index: usize) {
        if index < self.len {
            self.turn = index;
        }
    }
}

#[derive(Debug, Clone)]
pub enum Effect {
    Slide(SlideEffect),
    Fade(FadeEffect),
}

impl Effect {
    pub fn from_config(cfg: &Configuration) -> Self {
        match cfg.mode {
            TransitionMode::Slide => Effect::Slide(SlideEffect::new(cfg.slide.clone())),
            TransitionMode::Fade => Effect::Fade(FadeEffect::new(cfg.fade.clone())),
        }
    }

    pub fn max_progress(&self) -> f64 {
        match self {
            Effect::Slide(_) => slide::MAX_PROGRESS,
            Effect::Fade(_) => fade::MAX_PROGRESS,
        }
    }

    /// Progress after `ticks` steps; reaches the maximum exactly at
    /// [`ticks_to_finish`].
    pub fn progress_at(&self, ticks: u64, speed: f64) -> f64 {
        if ticks >= ticks_to_finish(speed) {
            return self.max_progress();
        }
        match self {
            Effect::Slide(effect) => effect.progress_at(ticks, speed),
            Effect::Fade(effect) => effect.progress_at(ticks, speed),
        }
    }

    fn raises_incoming(&self) -> bool {
        match self {
            Effect::Slide(effect) => effect.raises_incoming(),
            Effect::Fade(_) => true,
        }
    }

    fn uncovers_target(&self) -> bool {
        match self {
            Effect::Slide(effect) => effect.uncovers_target(),
            Effect::Fade(_) => false,
        }
    }

    fn prepare(&self, doc: &mut Document, layers: &[ElementId]) {
        match self {
            Effect::Slide(effect) => effect.prepare(doc, layers),
            Effect::Fade(effect) => effect.prepare(doc, layers),
        }
    }

    fn apply(&self, doc: &mut Document, current: ElementId, next: ElementId, progress: f64) {
        match self {
            Effect::Slide(effect) => effect.apply(doc, current, next, progress),
            Effect::Fade(effect) => effect.apply(doc, next, progress),
        }
    }

    fn finish(&self, doc: &mut Document, current: ElementId) {
        match self {
            Effect::Slide(effect) => effect.finish(doc, current),
            Effect::Fade(effect) => effect.finish(doc, current),
        }
    }
}

/// Ticks a transition at `speed` percent per tick takes: `ceil(100 / speed)`.
///
/// Saturates for speeds too small to count; NaN finishes immediately.
pub fn ticks_to_finish(speed: f64) -> u64 {
    (100.0 / speed).ceil() as u64
}

/// Z-index of layer `index` at rest while `showing` is on top.
pub fn resting_z_index(base: i32, len: usize, showing: usize, index: usize) -> i32 {
    let depth = (index + len - showing % len) % len;
    base + (len - 1 - depth) as i32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Dwelling on the current layer.
    Idle,
    Animating {
        from: usize,
        to: usize,
        ticks: u64,
        progress: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    Idle,
    Running { progress: f64 },
    Finished { from: usize, to: usize },
}

/// Transition state machine: `Idle -> Animating -> Idle -> ...`.
///
/// The driver knows nothing about time; callers decide when to `begin`
/// and how often to `tick`.
#[derive(Debug, Clone)]
pub struct Driver {
    effect: Effect,
    layers: Vec<ElementId>,
    rotation: Rotation,
    phase: Phase,
    pending: Option<usize>,
    speed: f64,
    base_z: i32,
}

impl Driver {
    pub fn new(effect: Effect, layers: Vec<ElementId>, speed: f64, base_z: i32) -> Self {
        Self {
            rotation: Rotation::new(layers.len()),
            effect,
            layers,
            phase: Phase::Idle,
            pending: None,
            speed,
            base_z,
        }
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating { .. })
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    /// Sets initial opacities and the resting stack order.
    pub fn prepare(&self, doc: &mut Document) {
        self.effect.prepare(doc, &self.layers);
        self.restack(doc, self.rotation.current());
    }

    fn restack(&self, doc: &mut Document, showing: usize) {
        let len = self.layers.len();
        for (i, id) in self.layers.iter().enumerate() {
            doc.style_mut(*id).z_index = Some(resting_z_index(self.base_z, len, showing, i));
        }
    }

    /// Layer that is, or is about to be, on display.
    fn showing(&self) -> usize {
        match self.phase {
            Phase::Animating { to, .. } => to,
            Phase::Idle => self.rotation.current(),
        }
    }

    /// Queues `target` as the destination of the next transition.
    ///
    /// Returns false for out-of-range targets and for the layer already
    /// being shown.
    pub fn request(&mut self, target: usize) -> bool {
        if target >= self.layers.len() || target == self.showing() {
            return false;
        }
        self.pending = Some(target);
        true
    }

    /// Starts a transition towards the queued target or the next layer.
    pub fn begin(&mut self, doc: &mut Document) -> Option<(usize, usize)> {
        if self.layers.is_empty() || self.is_animating() {
            return None;
        }
        let from = self.rotation.current();
        let to = self.pending.take().unwrap_or_else(|| self.rotation.next());

        if from != to {
            let top = self.base_z + self.layers.len() as i32;
            if self.effect.raises_incoming() {
                doc.style_mut(self.layers[to]).z_index = Some(top);
            } else if self.effect.uncovers_target() {
                doc.style_mut(self.layers[from]).z_index = Some(top);
                doc.style_mut(self.layers[to]).z_index = Some(top - 1);
            }
        }
        self.phase = Phase::Animating {
            from,
            to,
            ticks: 0,
            progress: 0.0,
        };
        debug!(from, to, "transition started");
        Some((from, to))
    }

    /// Advances the running transition by one step.
    pub fn tick(&mut self, doc: &mut Document) -> Tick {
        let Phase::Animating { from, to, ticks, .. } = self.phase else {
            return Tick::Idle;
        };

        let ticks = ticks.saturating_add(1);
        let progress = self.effect.progress_at(ticks, self.speed);
        if from != to {
            self.effect
                .apply(doc, self.layers[from], self.layers[to], progress);
        }
        trace!(from, to, progress, "transition tick");

        if progress < self.effect.max_progress() {
            self.phase = Phase::Animating {
                from,
                to,
                ticks,
                progress,
            };
            return Tick::Running { progress };
        }

        if from != to {
            self.effect.finish(doc, self.layers[from]);
            self.restack(doc, to);
        }
        self.rotation.set(to);
        self.phase = Phase::Idle;
        debug!(from, to, "transition finished");
        Tick::Finished { from, to }
    }
}
