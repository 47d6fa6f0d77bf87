use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use turning_point::config::Config;
use turning_point::pose::ReplaySource;
use turning_point::render::{JsonLinesSurface, RenderSurface, Renderer, Scene};
use turning_point::scheduler::{SamplingScheduler, SessionEvent};

const CONFIG_PATH: &str = "config.toml";

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = "turning_point=info".parse() {
        filter = filter.add_directive(d);
    }
    // stdout はフレーム出力に使うのでログは stderr へ
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn open_surface(config: &Config) -> Result<Box<dyn RenderSurface>> {
    let writer: Box<dyn Write + Send> = match &config.render.output {
        Some(path) => Box::new(BufWriter::new(
            std::fs::File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(io::stdout()),
    };
    Ok(Box::new(JsonLinesSurface::new(writer)))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)?;

    let source = ReplaySource::from_config(&config.source)?;
    info!(path = %config.source.path, frames = source.len(), looping = config.source.looping, "pose recording loaded");

    let (tx, mut rx) = mpsc::channel::<SessionEvent>(4);
    let cancel = CancellationToken::new();
    let scheduler = SamplingScheduler::from_config(&config, Arc::new(source), tx)?;
    let session = tokio::spawn(scheduler.run(cancel.clone()));

    let mut renderer = Renderer::new(Scene::from_config(&config), open_surface(&config)?);
    let stop_after_game_over = config.session.stop_after_game_over;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                cancel.cancel();
                break;
            }
            event = rx.recv() => {
                let Some(event) = event else { break };
                if let Err(e) = renderer.handle(&event) {
                    error!(error = %e, "failed to present frame");
                }
                if stop_after_game_over {
                    if let SessionEvent::Tick(report) = &event {
                        if report.game.is_terminal() {
                            cancel.cancel();
                            break;
                        }
                    }
                }
            }
        }
    }

    // 送信待ちのスケジューラを解放する
    drop(rx);
    let summary = session.await.context("Sampling task panicked")?;
    info!(
        tokens = summary.game.len(),
        game_over = summary.game.is_terminal(),
        ticks = summary.stats.ticks,
        applied = summary.stats.applied,
        dropped = summary.stats.dropped,
        not_ready = summary.stats.not_ready,
        failed = summary.stats.failed,
        "session finished"
    );
    Ok(())
}
