use std::time::Duration;

use slidery::config::{Configuration, TransitionMode};
use slidery::transition::Phase;
use slidery::{Document, Rect, SlideCommand, SlideEvent, Slidery};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout};
use tokio_util::sync::CancellationToken;

fn carousel(images: usize, tweak: impl FnOnce(&mut Configuration)) -> Slidery {
    let mut cfg = Configuration {
        images: (0..images).map(|i| format!("photo-{i}.jpg")).collect(),
        interval_ms: 100.0,
        frame_ms: 1.0,
        ..Configuration::default()
    };
    cfg.indicator.show = false;
    tweak(&mut cfg);
    Slidery::from_config(Document::new(Rect::new(640.0, 480.0)), cfg).expect("valid carousel")
}

struct Running {
    commands: mpsc::Sender<SlideCommand>,
    events: mpsc::Receiver<SlideEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<(Slidery, anyhow::Result<()>)>,
}

fn spawn(mut slidery: Slidery) -> Running {
    let (commands, command_rx) = mpsc::channel(8);
    let (event_tx, events) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let handle = tokio::spawn(async move {
        let result = slidery.run(command_rx, event_tx, token).await;
        (slidery, result)
    });
    Running {
        commands,
        events,
        cancel,
        handle,
    }
}

async fn next_event(events: &mut mpsc::Receiver<SlideEvent>) -> SlideEvent {
    timeout(Duration::from_secs(60), events.recv())
        .await
        .expect("expected a carousel event")
        .expect("event channel closed unexpectedly")
}

impl Running {
    async fn stop(self) -> Slidery {
        self.cancel.cancel();
        let (slidery, result) = self.handle.await.expect("carousel task panicked");
        result.expect("carousel run failed");
        slidery
    }
}

#[tokio::test(start_paused = true)]
async fn transitions_follow_dwell_in_order() {
    let start = Instant::now();
    let mut running = spawn(carousel(3, |_| {}));

    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionStarted { from: 0, to: 1 }
    );
    assert!(
        start.elapsed() >= Duration::from_millis(100),
        "transition started before the dwell elapsed: {:?}",
        start.elapsed()
    );
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionFinished { index: 1 }
    );
    // 100 ticks of 1ms each at full speed
    assert!(start.elapsed() >= Duration::from_millis(199));

    let expected = [
        SlideEvent::TransitionStarted { from: 1, to: 2 },
        SlideEvent::TransitionFinished { index: 2 },
        SlideEvent::TransitionStarted { from: 2, to: 0 },
        SlideEvent::TransitionFinished { index: 0 },
    ];
    for event in expected {
        assert_eq!(next_event(&mut running.events).await, event);
    }

    let slidery = running.stop().await;
    assert_eq!(slidery.current_index(), 0);
    assert_eq!(slidery.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn fade_leaves_only_current_visible() {
    let mut running = spawn(carousel(3, |cfg| {
        cfg.mode = TransitionMode::Fade;
        cfg.speed = 0.5;
    }));
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionStarted { from: 0, to: 1 }
    );
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionFinished { index: 1 }
    );

    let slidery = running.stop().await;
    let doc = slidery.document();
    let layers = slidery.layers();
    assert_eq!(doc.style(layers[1]).effective_opacity(), 1.0);
    assert_eq!(doc.style(layers[0]).effective_opacity(), 0.0);
    let z: Vec<_> = layers.iter().map(|id| doc.style(*id).z_index).collect();
    assert_eq!(z, vec![Some(0), Some(2), Some(1)]);
}

#[tokio::test(start_paused = true)]
async fn commands_jump_ahead_of_the_dwell() {
    let mut running = spawn(carousel(5, |cfg| cfg.interval_ms = 60_000.0));

    running.commands.send(SlideCommand::GoTo(3)).await.unwrap();
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionStarted { from: 0, to: 3 }
    );
    running.commands.send(SlideCommand::Previous).await.unwrap();
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionFinished { index: 3 }
    );
    // queued while animating, served right after
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionStarted { from: 3, to: 2 }
    );
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionFinished { index: 2 }
    );

    running.commands.send(SlideCommand::GoTo(2)).await.unwrap();
    running.commands.send(SlideCommand::GoTo(42)).await.unwrap();
    running.commands.send(SlideCommand::Next).await.unwrap();
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::TransitionStarted { from: 2, to: 3 }
    );

    running.stop().await;
}

#[tokio::test(start_paused = true)]
async fn resize_command_refits_layers() {
    let running = spawn(carousel(2, |cfg| cfg.interval_ms = 60_000.0));
    running
        .commands
        .send(SlideCommand::Resize(Rect::new(300.0, 200.0)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let slidery = running.stop().await;
    assert_eq!(slidery.rect(), Rect::new(300.0, 200.0));
    let width = slidery.document().style(slidery.layers()[1]).width;
    assert_eq!(width.map(|w| w.value()), Some(300.0));
}

#[tokio::test(start_paused = true)]
async fn indicator_hides_when_idle_and_wakes_on_activity() {
    let mut running = spawn(carousel(2, |cfg| {
        cfg.interval_ms = 60_000.0;
        cfg.indicator.show = true;
        cfg.indicator.idle_threshold_ms = 50;
    }));
    let start = Instant::now();

    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::IndicatorHidden
    );
    assert!(start.elapsed() >= Duration::from_millis(50));

    running.commands.send(SlideCommand::Activity).await.unwrap();
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::IndicatorShown
    );
    assert_eq!(
        next_event(&mut running.events).await,
        SlideEvent::IndicatorHidden
    );

    let slidery = running.stop().await;
    let indicator = slidery.indicator().expect("indicator enabled");
    assert!(indicator.is_hidden());
    let strip = indicator.dot_strip().expect("dots enabled").container;
    assert_eq!(slidery.document().style(strip).effective_opacity(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn empty_carousel_idles_until_cancelled() {
    let mut running = spawn(carousel(0, |_| {}));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(running.events.try_recv().is_err());

    running.commands.send(SlideCommand::Next).await.unwrap();
    let slidery = running.stop().await;
    assert!(slidery.layers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropped_event_receiver_stops_the_run() {
    let running = spawn(carousel(2, |_| {}));
    drop(running.events);

    let (_, result) = timeout(Duration::from_secs(60), running.handle)
        .await
        .expect("run should end once events cannot be published")
        .expect("carousel task panicked");
    let err = result.expect_err("publishing to a closed channel must fail");
    assert!(err.to_string().contains("TransitionStarted"), "{err}");
}
