use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::dom::{Document, ElementId, Position, Rect};
use crate::error::Error;
use crate::events::{SlideCommand, SlideEvent};
use crate::indicator::Indicator;
use crate::layers::LayerSet;
use crate::transition::{Driver, Effect, Phase, Tick};

/// Where to mount the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    Element(ElementId),
    Selector(String),
}

impl From<ElementId> for ContainerRef {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<&str> for ContainerRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ContainerRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// What a [`SlideCommand`] did to the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Started { from: usize, to: usize },
    /// Navigation accepted; served once the running transition completes.
    Queued,
    Ignored,
    Resized,
    Activity { shown: bool },
}

/// An image carousel mounted into a [`Document`].
#[derive(Debug, Clone)]
pub struct Slidery {
    document: Document,
    container: ElementId,
    config: Configuration,
    rect: Rect,
    layers: LayerSet,
    indicator: Option<Indicator>,
    driver: Driver,
}

fn resolve_container(doc: &Document, container: ContainerRef) -> Result<ElementId, Error> {
    match container {
        ContainerRef::Element(id) if doc.contains(id) => Ok(id),
        ContainerRef::Element(id) => Err(Error::UnknownElement(id)),
        ContainerRef::Selector(selector) => doc
            .query(&selector)?
            .ok_or(Error::MissingContainer(selector)),
    }
}

impl Slidery {
    /// Validates `config`, then builds layers and indicators inside
    /// `container`.
    pub fn new(
        mut document: Document,
        container: impl Into<ContainerRef>,
        config: Configuration,
    ) -> Result<Self, Error> {
        let config = config.validated()?;
        let container = resolve_container(&document, container.into())?;
        let rect = document.bounding_rect(container);

        let style = document.style_mut(container);
        style.overflow_hidden = true;
        if style.position == Position::Static {
            style.position = Position::Relative;
        }

        let layers = LayerSet::build(&mut document, container, &config, rect)?;
        let indicator = Indicator::build(
            &mut document,
            container,
            &config.indicator,
            config.z_index,
            layers.len(),
            rect,
        )?;
        let driver = Driver::new(
            Effect::from_config(&config),
            layers.ids().to_vec(),
            config.speed,
            config.z_index,
        );
        driver.prepare(&mut document);

        info!(
            layers = layers.len(),
            mode = %config.mode,
            width = rect.width,
            height = rect.height,
            "carousel mounted"
        );
        Ok(Self {
            document,
            container,
            config,
            rect,
            layers,
            indicator,
            driver,
        })
    }

    /// Mounts into `config.container`, or the body when none is set.
    pub fn from_config(document: Document, config: Configuration) -> Result<Self, Error> {
        let container = match &config.container {
            Some(selector) => ContainerRef::Selector(selector.clone()),
            None => ContainerRef::Element(document.body()),
        };
        Self::new(document, container, config)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn layers(&self) -> &[ElementId] {
        self.layers.ids()
    }

    pub fn indicator(&self) -> Option<&Indicator> {
        self.indicator.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.driver.rotation().current()
    }

    pub fn phase(&self) -> Phase {
        self.driver.phase()
    }

    /// Re-reads the container's size and refits layers and indicators.
    pub fn resize(&mut self) {
        self.rect = self.document.bounding_rect(self.container);
        self.layers.fit(&mut self.document, &self.config, self.rect);
        if let Some(indicator) = &self.indicator {
            indicator.layout(&mut self.document, self.rect);
        }
        debug!(
            width = self.rect.width,
            height = self.rect.height,
            "carousel resized"
        );
    }

    pub fn resize_to(&mut self, rect: Rect) {
        self.document.set_rect(self.container, rect);
        self.resize();
    }

    pub fn begin_transition(&mut self) -> Option<(usize, usize)> {
        self.driver.begin(&mut self.document)
    }

    pub fn tick(&mut self) -> Tick {
        let tick = self.driver.tick(&mut self.document);
        if let (Tick::Finished { to, .. }, Some(indicator)) = (tick, &self.indicator) {
            indicator.highlight(&mut self.document, to);
        }
        tick
    }

    /// Heads for `target`, immediately when idle.
    pub fn navigate(&mut self, target: usize) -> CommandOutcome {
        if !self.driver.request(target) {
            debug!(target, "navigation ignored");
            return CommandOutcome::Ignored;
        }
        if self.driver.is_animating() {
            return CommandOutcome::Queued;
        }
        match self.begin_transition() {
            Some((from, to)) => CommandOutcome::Started { from, to },
            None => CommandOutcome::Ignored,
        }
    }

    fn showing(&self) -> usize {
        match self.driver.phase() {
            Phase::Animating { to, .. } => to,
            Phase::Idle => self.current_index(),
        }
    }

    pub fn apply_command(&mut self, command: SlideCommand) -> CommandOutcome {
        let len = self.layers.len();
        match command {
            SlideCommand::Next | SlideCommand::Previous if len == 0 => CommandOutcome::Ignored,
            SlideCommand::Next => self.navigate((self.showing() + 1) % len),
            SlideCommand::Previous => self.navigate((self.showing() + len - 1) % len),
            SlideCommand::GoTo(index) => self.navigate(index),
            SlideCommand::Resize(rect) => {
                self.resize_to(rect);
                CommandOutcome::Resized
            }
            SlideCommand::Activity => CommandOutcome::Activity {
                shown: self.set_indicator_hidden(false),
            },
        }
    }

    /// Returns true when the indicator's visibility changed.
    pub fn set_indicator_hidden(&mut self, hidden: bool) -> bool {
        match self.indicator.as_mut() {
            Some(indicator) => indicator.set_hidden(&mut self.document, hidden),
            None => false,
        }
    }

    fn indicator_hidden(&self) -> bool {
        self.indicator.as_ref().is_some_and(Indicator::is_hidden)
    }

    fn hides_on_idle(&self) -> bool {
        self.indicator.is_some() && self.config.indicator.hide_on_idle
    }

    /// Drives the carousel on tokio timers until `cancel` fires.
    ///
    /// Dwell and tick periods come from the configuration; navigation and
    /// resize requests arrive on `commands`. Every transition start and end
    /// is published on `events`, so the receiver must be drained.
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<SlideCommand>,
        events: mpsc::Sender<SlideEvent>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let dwell_period = self.config.interval();
        let idle_threshold = self.config.idle_threshold();
        let frame_period = self.config.frame_period().max(Duration::from_micros(1));

        let dwell = sleep(dwell_period);
        tokio::pin!(dwell);
        let mut ticker = interval(frame_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut idle_deadline = Instant::now() + idle_threshold;
        let mut commands_open = true;

        if self.layers.is_empty() {
            warn!("no images configured; carousel will stay idle");
        }
        info!(
            layers = self.layers.len(),
            mode = %self.config.mode,
            interval_ms = self.config.interval_ms,
            frame_ms = self.config.frame_ms,
            "carousel running"
        );

        loop {
            let animating = self.driver.is_animating();
            let watch_idle = self.hides_on_idle() && !self.indicator_hidden();

            tokio::select! {
                _ = cancel.cancelled() => break,

                received = commands.recv(), if commands_open => {
                    let Some(command) = received else {
                        debug!("command channel closed");
                        commands_open = false;
                        continue;
                    };
                    if command == SlideCommand::Activity {
                        idle_deadline = Instant::now() + idle_threshold;
                    }
                    match self.apply_command(command) {
                        CommandOutcome::Started { from, to } => {
                            ticker.reset();
                            publish(&events, SlideEvent::TransitionStarted { from, to }).await?;
                        }
                        CommandOutcome::Activity { shown: true } => {
                            publish(&events, SlideEvent::IndicatorShown).await?;
                        }
                        _ => {}
                    }
                }

                _ = &mut dwell, if !animating => {
                    match self.begin_transition() {
                        Some((from, to)) => {
                            ticker.reset();
                            publish(&events, SlideEvent::TransitionStarted { from, to }).await?;
                        }
                        None => dwell.as_mut().reset(Instant::now() + dwell_period),
                    }
                }

                _ = ticker.tick(), if animating => {
                    if let Tick::Finished { to, .. } = self.tick() {
                        publish(&events, SlideEvent::TransitionFinished { index: to }).await?;
                        let queued = if self.driver.pending().is_some() {
                            self.begin_transition()
                        } else {
                            None
                        };
                        match queued {
                            Some((from, to)) => {
                                ticker.reset();
                                publish(&events, SlideEvent::TransitionStarted { from, to }).await?;
                            }
                            None => dwell.as_mut().reset(Instant::now() + dwell_period),
                        }
                    }
                }

                _ = sleep_until(idle_deadline), if watch_idle => {
                    if self.set_indicator_hidden(true) {
                        publish(&events, SlideEvent::IndicatorHidden).await?;
                    }
                }
            }
        }

        info!(showing = self.current_index(), "carousel stopped");
        Ok(())
    }
}

async fn publish(events: &mpsc::Sender<SlideEvent>, event: SlideEvent) -> anyhow::Result<()> {
    events
        .send(event)
        .await
        .with_context(|| format!("failed to publish carousel event {event:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransitionMode;
    use crate::dom::Length;

    fn config(images: usize) -> Configuration {
        Configuration {
            images: (0..images).map(|i| format!("img-{i}.jpg")).collect(),
            ..Configuration::default()
        }
    }

    #[test]
    fn mounts_into_selector() {
        let mut doc = Document::new(Rect::new(1000.0, 500.0));
        let hero = doc.create_element_with_id("div", "hero");
        doc.set_rect(hero, Rect::new(640.0, 360.0));
        let body = doc.body();
        doc.append_child(body, hero).unwrap();

        let slidery = Slidery::new(doc, "#hero", config(3)).unwrap();
        assert_eq!(slidery.container(), hero);
        assert_eq!(slidery.layers().len(), 3);
        let container = slidery.document().style(hero);
        assert!(container.overflow_hidden);
        assert_eq!(container.position, Position::Relative);
        let layer = slidery.document().style(slidery.layers()[0]);
        assert_eq!(layer.width, Some(Length::Px(640.0)));
    }

    #[test]
    fn keeps_non_static_container_position() {
        let mut doc = Document::new(Rect::new(100.0, 100.0));
        let body = doc.body();
        doc.style_mut(body).position = Position::Absolute;
        let slidery = Slidery::new(doc, body, config(2)).unwrap();
        assert_eq!(
            slidery.document().style(body).position,
            Position::Absolute
        );
    }

    #[test]
    fn rejects_missing_and_malformed_containers() {
        let doc = Document::new(Rect::default());
        assert!(matches!(
            Slidery::new(doc.clone(), "#nope", config(1)),
            Err(Error::MissingContainer(sel)) if sel == "#nope"
        ));
        assert!(matches!(
            Slidery::new(doc.clone(), ".class", config(1)),
            Err(Error::InvalidSelector(_))
        ));
        let mut other = Document::new(Rect::default());
        let foreign = (0..5).map(|_| other.create_element("div")).last().unwrap();
        assert!(matches!(
            Slidery::new(doc, foreign, config(1)),
            Err(Error::UnknownElement(_))
        ));
    }

    #[test]
    fn resize_refits_layers() {
        let doc = Document::new(Rect::new(800.0, 600.0));
        let mut slidery = Slidery::from_config(doc, config(2)).unwrap();
        slidery.resize_to(Rect::new(1024.0, 768.0));
        for id in slidery.layers() {
            let style = slidery.document().style(*id);
            assert_eq!(style.width, Some(Length::Px(1024.0)));
            assert_eq!(style.height, Some(Length::Px(768.0)));
        }
        let arrows = *slidery.indicator().unwrap().arrows().unwrap();
        assert_eq!(
            slidery.document().style(arrows.left_area).height,
            Some(Length::Px(768.0))
        );
        assert_eq!(slidery.rect(), Rect::new(1024.0, 768.0));
    }

    #[test]
    fn navigation_commands() {
        let doc = Document::new(Rect::new(800.0, 600.0));
        let cfg = Configuration {
            mode: TransitionMode::Fade,
            ..config(4)
        };
        let mut slidery = Slidery::from_config(doc, cfg).unwrap();

        assert_eq!(
            slidery.apply_command(SlideCommand::Previous),
            CommandOutcome::Started { from: 0, to: 3 }
        );
        assert_eq!(
            slidery.apply_command(SlideCommand::Next),
            CommandOutcome::Queued
        );
        while !matches!(slidery.tick(), Tick::Finished { .. }) {}
        assert_eq!(slidery.current_index(), 3);
        assert_eq!(slidery.begin_transition(), Some((3, 0)));
        while !matches!(slidery.tick(), Tick::Finished { .. }) {}
        assert_eq!(slidery.current_index(), 0);

        assert_eq!(
            slidery.apply_command(SlideCommand::GoTo(0)),
            CommandOutcome::Ignored
        );
        assert_eq!(
            slidery.apply_command(SlideCommand::GoTo(2)),
            CommandOutcome::Started { from: 0, to: 2 }
        );
    }

    #[test]
    fn finished_transition_moves_highlight() {
        let doc = Document::new(Rect::new(800.0, 600.0));
        let mut slidery = Slidery::from_config(doc, config(3)).unwrap();
        slidery.begin_transition();
        while !matches!(slidery.tick(), Tick::Finished { .. }) {}
        let dots = slidery.indicator().unwrap().dot_strip().unwrap().dots.clone();
        assert_eq!(slidery.document().style(dots[1]).opacity, Some(1.0));
        assert_eq!(slidery.document().style(dots[0]).opacity, Some(0.5));
    }
}
