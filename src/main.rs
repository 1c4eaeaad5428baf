//! Command-line runner for the carousel.
//!
//! Mounts the configured carousel into an in-memory document of the given
//! size and logs every transition. On a terminal, `n`, `p`, an index or an
//! empty line (pointer activity) can be typed to drive it.

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use slidery::{Configuration, Document, Rect, SlideCommand, SlideEvent, Slidery};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "slidery", version, about = "Headless image carousel runner")]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Container width in px
    #[arg(long, default_value_t = 1280.0)]
    width: f64,
    /// Container height in px
    #[arg(long, default_value_t = 720.0)]
    height: f64,
    /// Stop after this many completed transitions
    #[arg(long, value_name = "N")]
    cycles: Option<usize>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if verbosity > 0 {
        let level = if verbosity == 1 {
            Level::DEBUG
        } else {
            Level::TRACE
        };
        filter = filter.add_directive(
            format!("slidery={level}")
                .parse()
                .context("invalid log directive")?,
        );
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();
    Ok(())
}

/// Creates the container element an `#id` selector expects, sized like the
/// viewport.
fn build_document(cfg: &Configuration, viewport: Rect) -> Result<Document> {
    let mut doc = Document::new(viewport);
    if let Some(html_id) = cfg.container.as_deref().and_then(|s| s.strip_prefix('#')) {
        let body = doc.body();
        let container = doc.create_element_with_id("div", html_id);
        doc.set_rect(container, viewport);
        doc.append_child(body, container)?;
    }
    Ok(doc)
}

fn parse_command(line: &str) -> Option<SlideCommand> {
    match line.trim() {
        "" => Some(SlideCommand::Activity),
        "n" | "next" => Some(SlideCommand::Next),
        "p" | "prev" | "previous" => Some(SlideCommand::Previous),
        other => other.parse().ok().map(SlideCommand::GoTo),
    }
}

fn spawn_stdin_commands(control: mpsc::Sender<SlideCommand>) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if control.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("unrecognized command: {line:?}"),
            }
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let Args {
        config,
        width,
        height,
        cycles,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?;
    let viewport = Rect::new(width, height);
    let document = build_document(&cfg, viewport)?;
    let mut slidery = Slidery::from_config(document, cfg).context("failed to mount carousel")?;

    let (command_tx, command_rx) = mpsc::channel::<SlideCommand>(16);
    let (event_tx, mut event_rx) = mpsc::channel::<SlideEvent>(64);
    let cancel = CancellationToken::new();

    if io::stdin().is_terminal() {
        spawn_stdin_commands(command_tx.clone());
    } else {
        debug!("stdin is not a terminal; interactive commands disabled");
    }
    drop(command_tx);

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; stopping carousel");
            cancel.cancel();
        });
    }

    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            let mut finished = 0usize;
            while let Some(event) = event_rx.recv().await {
                match event {
                    SlideEvent::TransitionStarted { from, to } => {
                        info!(from, to, "transition started");
                    }
                    SlideEvent::TransitionFinished { index } => {
                        finished += 1;
                        info!(index, finished, "showing image");
                        if cycles.is_some_and(|limit| finished >= limit) {
                            cancel.cancel();
                        }
                    }
                    SlideEvent::IndicatorHidden => info!("indicator hidden"),
                    SlideEvent::IndicatorShown => info!("indicator shown"),
                }
            }
        }
    });

    slidery
        .run(command_rx, event_tx, cancel)
        .await
        .context("carousel failed")?;
    if let Err(err) = watcher.await {
        warn!("event watcher failed: {err}");
    }

    for (index, id) in slidery.layers().iter().enumerate() {
        let style = slidery.document().style(*id);
        debug!(
            index,
            z_index = ?style.z_index,
            opacity = style.effective_opacity(),
            left = ?style.left.map(|l| l.to_string()),
            top = ?style.top.map(|l| l.to_string()),
            "final layer state"
        );
    }
    info!(showing = slidery.current_index(), "done");
    Ok(())
}
